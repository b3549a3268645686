//! Dataset directory → `.db` file writer.
//!
//! Grounded on the teacher's `npz.rs` archive writer (compute section sizes
//! up front, then write header, then each section in order) — re-derived for
//! this format's header/index/hash-table/string-pool/audio-pool layout.

use std::path::Path;

use super::header::{Header, HEADER_LEN, MAGIC, VERSION};
use super::index::{IndexEntry, INDEX_ENTRY_LEN, SENTINEL};
use crate::error::{Error, Result};
use crate::hash::fnv1a;
use crate::text::lowercase::lowercase;
use crate::wav::read_wav_mono;
use crate::SAMPLE_RATE;

struct RawUnit {
    text: String,
    samples: Vec<i16>,
}

/// Parse an index file of lines `filename|text|display`. `#`-prefixed and
/// blank lines are skipped.
fn load_index_file(path: &Path) -> Result<Vec<(String, String)>> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut entries = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.splitn(3, '|');
        let (Some(filename), Some(text)) = (fields.next(), fields.next()) else {
            return Err(Error::InvalidFormat(format!(
                "malformed index line in {}: {line}",
                path.display()
            )));
        };
        entries.push((filename.to_string(), text.to_string()));
    }
    Ok(entries)
}

fn load_units(wavs_dir: &Path, index_file: &Path) -> Result<Vec<RawUnit>> {
    let mut units = Vec::new();
    for (filename, text) in load_index_file(index_file)? {
        let wav_path = wavs_dir.join(&filename);
        let samples = read_wav_mono(&wav_path)?;
        units.push(RawUnit {
            text: lowercase(&text),
            samples,
        });
    }
    Ok(units)
}

fn next_power_of_two_at_least(n: usize) -> u32 {
    let min = ((n as f64) / 0.7).ceil() as u32;
    min.max(1).next_power_of_two()
}

/// Build a voice database from a dataset directory containing
/// `letters/wavs`, `letters/letters.txt`, `syllables/wavs`,
/// `syllables/sillabes.txt`, writing the result to `output_path`.
pub fn build_database(dataset_dir: &Path, output_path: &Path) -> Result<()> {
    let mut units = load_units(
        &dataset_dir.join("letters").join("wavs"),
        &dataset_dir.join("letters").join("letters.txt"),
    )?;
    units.extend(load_units(
        &dataset_dir.join("syllables").join("wavs"),
        &dataset_dir.join("syllables").join("sillabes.txt"),
    )?);

    // Sorted by character count descending, ties broken lexicographically,
    // so the selector's greedy longest-match scan is consistent with the
    // on-disk index order.
    units.sort_by(|a, b| {
        let a_chars = a.text.chars().count();
        let b_chars = b.text.chars().count();
        b_chars.cmp(&a_chars).then_with(|| a.text.cmp(&b.text))
    });

    let unit_count = units.len() as u32;
    let max_unit_chars = units
        .iter()
        .map(|u| u.text.chars().count() as u32)
        .max()
        .unwrap_or(0);
    let hash_table_size = next_power_of_two_at_least(units.len());

    let index_offset = HEADER_LEN as u32;
    let hash_table_offset = index_offset + unit_count * INDEX_ENTRY_LEN as u32;
    let strings_offset = hash_table_offset + hash_table_size * 4;

    let mut string_offsets = Vec::with_capacity(units.len());
    let mut string_pool = Vec::new();
    for unit in &units {
        string_offsets.push(string_pool.len() as u32);
        string_pool.extend_from_slice(unit.text.as_bytes());
        string_pool.push(0);
    }

    let audio_offset = strings_offset + string_pool.len() as u32;
    let mut audio_pool: Vec<u8> = Vec::new();
    let mut audio_offsets = Vec::with_capacity(units.len());
    let mut total_samples: u64 = 0;
    for unit in &units {
        audio_offsets.push(total_samples as u32);
        for &sample in &unit.samples {
            audio_pool.extend_from_slice(&sample.to_le_bytes());
        }
        total_samples += unit.samples.len() as u64;
    }
    if total_samples > u32::MAX as u64 {
        return Err(Error::OutOfMemory(
            "total sample count exceeds u32 range".to_string(),
        ));
    }

    // Hash table + chains, built with open-addressing-by-bucket and
    // separate chaining through `next_hash`.
    let mut hash_table = vec![SENTINEL; hash_table_size as usize];
    let mut next_hash = vec![SENTINEL; units.len()];
    let mut hashes = Vec::with_capacity(units.len());
    for (i, unit) in units.iter().enumerate() {
        let hash = fnv1a(unit.text.as_bytes());
        hashes.push(hash);
        let slot = (hash % hash_table_size) as usize;
        if hash_table[slot] == SENTINEL {
            hash_table[slot] = i as u32;
        } else {
            let mut tail = hash_table[slot];
            loop {
                let next = next_hash[tail as usize];
                if next == SENTINEL {
                    break;
                }
                tail = next;
            }
            next_hash[tail as usize] = i as u32;
        }
    }

    let header = Header {
        magic: MAGIC,
        version: VERSION,
        unit_count,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        index_offset,
        strings_offset,
        audio_offset,
        total_samples: total_samples as u32,
        max_unit_chars,
        hash_table_size,
        hash_table_offset,
    };

    let mut out = Vec::new();
    out.extend_from_slice(&header.encode());
    for (i, unit) in units.iter().enumerate() {
        let entry = IndexEntry {
            hash: hashes[i],
            string_offset: string_offsets[i],
            string_len: unit.text.len() as u16,
            char_count: unit.text.chars().count() as u16,
            audio_offset: audio_offsets[i],
            sample_count: unit.samples.len() as u32,
            flags: 0,
            next_hash: next_hash[i],
        };
        out.extend_from_slice(&entry.encode());
    }
    for &slot in &hash_table {
        out.extend_from_slice(&slot.to_le_bytes());
    }
    out.extend_from_slice(&string_pool);
    out.extend_from_slice(&audio_pool);

    std::fs::write(output_path, &out).map_err(|source| Error::FileWrite {
        path: output_path.to_path_buf(),
        source,
    })
}
