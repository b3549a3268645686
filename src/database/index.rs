//! On-disk index entry: 32 bytes, little-endian, C-packed.

pub const INDEX_ENTRY_LEN: usize = 32;
pub const SENTINEL: u32 = 0xFFFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub hash: u32,
    pub string_offset: u32,
    pub string_len: u16,
    pub char_count: u16,
    pub audio_offset: u32,
    pub sample_count: u32,
    pub flags: u32,
    pub next_hash: u32,
}

impl IndexEntry {
    pub fn encode(&self) -> [u8; INDEX_ENTRY_LEN] {
        let mut buf = [0u8; INDEX_ENTRY_LEN];
        buf[0..4].copy_from_slice(&self.hash.to_le_bytes());
        buf[4..8].copy_from_slice(&self.string_offset.to_le_bytes());
        buf[8..10].copy_from_slice(&self.string_len.to_le_bytes());
        buf[10..12].copy_from_slice(&self.char_count.to_le_bytes());
        buf[12..16].copy_from_slice(&self.audio_offset.to_le_bytes());
        buf[16..20].copy_from_slice(&self.sample_count.to_le_bytes());
        buf[20..24].copy_from_slice(&self.flags.to_le_bytes());
        buf[24..28].copy_from_slice(&self.next_hash.to_le_bytes());
        // bytes[28..32] reserved, zeroed.
        buf
    }

    pub fn decode(bytes: &[u8]) -> Option<IndexEntry> {
        if bytes.len() < INDEX_ENTRY_LEN {
            return None;
        }
        let u32_at = |off: usize| u32::from_le_bytes(bytes[off..off + 4].try_into().unwrap());
        let u16_at = |off: usize| u16::from_le_bytes(bytes[off..off + 2].try_into().unwrap());
        Some(IndexEntry {
            hash: u32_at(0),
            string_offset: u32_at(4),
            string_len: u16_at(8),
            char_count: u16_at(10),
            audio_offset: u32_at(12),
            sample_count: u32_at(16),
            flags: u32_at(20),
            next_hash: u32_at(24),
        })
    }
}
