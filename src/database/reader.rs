//! Memory-mapped read path: open a voice database, validate it, and look
//! units up by text.
//!
//! Grounded on the teacher's `npz.rs` array-header validation (magic check,
//! bounds-checked section offsets before trusting any byte range) —
//! re-derived for `memmap2` instead of an in-memory `Vec<u8>`.

use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

use super::header::{Header, HEADER_LEN};
use super::index::{IndexEntry, INDEX_ENTRY_LEN, SENTINEL};
use crate::error::{Error, Result};
use crate::hash::fnv1a;

/// A unit found by [`Database::lookup`]: how many UTF-8 bytes/code points it
/// consumed, and its PCM samples.
///
/// `samples` is decoded into an owned `Vec<i16>` rather than borrowed
/// straight out of the mapping: the audio pool is packed at arbitrary byte
/// offsets (`align(1)`), so a reinterpret cast to `&[i16]` would not
/// generally satisfy `i16`'s alignment requirement on every platform.
pub struct UnitMatch {
    pub byte_len: usize,
    pub char_count: u32,
    pub samples: Vec<i16>,
}

pub struct Database {
    mmap: Mmap,
    header: Header,
}

fn u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|s| u32::from_le_bytes(s.try_into().unwrap()))
        .ok_or_else(|| Error::InvalidFormat(format!("offset {offset} out of range")))
}

impl Database {
    pub fn open(path: &Path) -> Result<Database> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::FileRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        if mmap.len() < HEADER_LEN {
            return Err(Error::InvalidFormat("file shorter than header".to_string()));
        }
        let header = Header::decode(&mmap)?;

        let index_end =
            header.index_offset as usize + header.unit_count as usize * INDEX_ENTRY_LEN;
        let hash_table_end =
            header.hash_table_offset as usize + header.hash_table_size as usize * 4;
        if index_end > mmap.len()
            || hash_table_end > mmap.len()
            || header.strings_offset as usize > mmap.len()
            || header.audio_offset as usize > mmap.len()
        {
            return Err(Error::InvalidFormat(
                "section offsets exceed file length".to_string(),
            ));
        }
        if !header.hash_table_size.is_power_of_two() {
            return Err(Error::InvalidFormat(
                "hash_table_size is not a power of two".to_string(),
            ));
        }

        Ok(Database { mmap, header })
    }

    pub fn max_unit_chars(&self) -> u32 {
        self.header.max_unit_chars
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn unit_count(&self) -> u32 {
        self.header.unit_count
    }

    fn entry_at(&self, index: u32) -> Result<IndexEntry> {
        let offset = self.header.index_offset as usize + index as usize * INDEX_ENTRY_LEN;
        let bytes = self
            .mmap
            .get(offset..offset + INDEX_ENTRY_LEN)
            .ok_or_else(|| Error::InvalidFormat(format!("index entry {index} out of range")))?;
        IndexEntry::decode(bytes)
            .ok_or_else(|| Error::InvalidFormat(format!("index entry {index} truncated")))
    }

    fn hash_bucket(&self, hash: u32) -> Result<u32> {
        let slot = (hash % self.header.hash_table_size) as usize;
        let offset = self.header.hash_table_offset as usize + slot * 4;
        u32_le(&self.mmap, offset)
    }

    fn entry_text<'a>(&'a self, entry: &IndexEntry) -> &'a [u8] {
        let start = self.header.strings_offset as usize + entry.string_offset as usize;
        &self.mmap[start..start + entry.string_len as usize]
    }

    fn entry_samples(&self, entry: &IndexEntry) -> Vec<i16> {
        let start = self.header.audio_offset as usize + entry.audio_offset as usize * 2;
        let byte_len = entry.sample_count as usize * 2;
        let bytes = &self.mmap[start..start + byte_len];
        bytes
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect()
    }

    /// Hash `text`'s UTF-8 bytes, walk the matching chain, and return the
    /// match whose bytes compare equal, scanning from `max_unit_chars` (or
    /// the text's own length if shorter) down to a single code point is the
    /// caller's job (`crate::selector`); this only resolves one exact span.
    pub fn lookup(&self, text: &str) -> Result<Option<UnitMatch>> {
        let bytes = text.as_bytes();
        let hash = fnv1a(bytes);
        let char_count = text.chars().count() as u32;
        let mut index = self.hash_bucket(hash)?;
        loop {
            if index == SENTINEL {
                return Ok(None);
            }
            let entry = self.entry_at(index)?;
            if entry.hash == hash
                && entry.string_len as usize == bytes.len()
                && self.entry_text(&entry) == bytes
            {
                return Ok(Some(UnitMatch {
                    byte_len: bytes.len(),
                    char_count,
                    samples: self.entry_samples(&entry),
                }));
            }
            index = entry.next_hash;
        }
    }
}
