//! On-disk voice database header: 64 bytes, little-endian, C-packed.
//!
//! Grounded on the teacher's `npz.rs` explicit little-endian field decoding
//! (`read_u32_le` style helpers over a byte slice) — re-derived here for this
//! format's fixed header layout instead of the teacher's NPZ archive.

use crate::error::{Error, Result};

pub const MAGIC: u32 = 0x5354_5443;
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub version: u32,
    pub unit_count: u32,
    pub sample_rate: u32,
    pub bits_per_sample: u32,
    pub index_offset: u32,
    pub strings_offset: u32,
    pub audio_offset: u32,
    pub total_samples: u32,
    pub max_unit_chars: u32,
    pub hash_table_size: u32,
    pub hash_table_offset: u32,
}

impl Header {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        let fields: [u32; 12] = [
            self.magic,
            self.version,
            self.unit_count,
            self.sample_rate,
            self.bits_per_sample,
            self.index_offset,
            self.strings_offset,
            self.audio_offset,
            self.total_samples,
            self.max_unit_chars,
            self.hash_table_size,
            self.hash_table_offset,
        ];
        for (i, field) in fields.iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&field.to_le_bytes());
        }
        // Last 16 bytes are reserved and already zeroed.
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Header> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::InvalidFormat(format!(
                "header truncated: {} bytes, need {HEADER_LEN}",
                bytes.len()
            )));
        }
        let u32_at = |off: usize| -> u32 {
            u32::from_le_bytes(bytes[off..off + 4].try_into().unwrap())
        };
        let header = Header {
            magic: u32_at(0),
            version: u32_at(4),
            unit_count: u32_at(8),
            sample_rate: u32_at(12),
            bits_per_sample: u32_at(16),
            index_offset: u32_at(20),
            strings_offset: u32_at(24),
            audio_offset: u32_at(28),
            total_samples: u32_at(32),
            max_unit_chars: u32_at(36),
            hash_table_size: u32_at(40),
            hash_table_offset: u32_at(44),
        };
        if header.magic != MAGIC {
            return Err(Error::InvalidFormat(format!(
                "bad magic: 0x{:08x}",
                header.magic
            )));
        }
        if header.version != VERSION {
            return Err(Error::VersionMismatch(header.version));
        }
        Ok(header)
    }
}
