//! Unit selector (C5): greedy longest-match segmentation with one-step
//! look-ahead and phonotactic scoring.
//!
//! Grounded on `goxviet-ime`'s layered phonotactic validation style (reject,
//! then score, then rank candidates) combined with `glottisdale`'s
//! look-ahead-aware segment picking in `collage/process.rs`.

use crate::database::{Database, UnitMatch};
use crate::error::Result;
use crate::phonotactics::{reject_single_char, syllable_score};

const MAX_CANDIDATES: usize = 64;

/// A selected unit: how many bytes/code points of input it consumed, and the
/// matched unit's audio.
pub struct Selected {
    pub byte_len: usize,
    pub char_count: u32,
    pub unit: UnitMatch,
}

struct Candidate {
    byte_len: usize,
    char_count: u32,
    score: i32,
    next_match_chars: u32,
    unit: UnitMatch,
}

fn nth_char_boundary(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// The longest database match starting at the head of `text`, scanning from
/// `min(max_chars, text.len())` code points down to 1. No phonotactic
/// filtering — used only for look-ahead scoring.
fn longest_match_chars(db: &Database, text: &str, max_chars: usize) -> Result<u32> {
    let total_chars = text.chars().count();
    let cap = max_chars.min(total_chars);
    for span_chars in (1..=cap).rev() {
        let byte_len = nth_char_boundary(text, span_chars);
        if db.lookup(&text[..byte_len])?.is_some() {
            return Ok(span_chars as u32);
        }
    }
    Ok(0)
}

/// Select the next unit at the head of `remaining` (the rest of the current
/// word). `lookahead` is the next word's text (already preprocessed), used
/// only when a candidate span consumes all of `remaining`.
pub fn select_unit(
    db: &Database,
    remaining: &str,
    lookahead: &str,
    at_word_start: bool,
) -> Result<Option<Selected>> {
    let max_chars = db.max_unit_chars() as usize;
    let total_chars = remaining.chars().count();
    let cap = max_chars.min(total_chars);

    let mut candidates: Vec<Candidate> = Vec::new();
    for span_chars in (1..=cap).rev() {
        if candidates.len() >= MAX_CANDIDATES {
            break;
        }
        let byte_len = nth_char_boundary(remaining, span_chars);
        let span_text = &remaining[..byte_len];

        let Some(unit) = db.lookup(span_text)? else {
            continue;
        };

        let next_char = remaining[byte_len..].chars().next();
        if reject_single_char(span_text, at_word_start, next_char) {
            continue;
        }

        let score = syllable_score(span_text, span_chars, at_word_start);

        let rest = &remaining[byte_len..];
        let next_match_chars = if !rest.is_empty() {
            longest_match_chars(db, rest, max_chars)?
        } else {
            longest_match_chars(db, lookahead, max_chars)?
        };

        candidates.push(Candidate {
            byte_len,
            char_count: span_chars as u32,
            score,
            next_match_chars,
            unit,
        });
    }

    if candidates.is_empty() {
        return Ok(None);
    }

    let mut best_idx = 0;
    for i in 1..candidates.len() {
        if is_better(&candidates[i], &candidates[best_idx]) {
            best_idx = i;
        }
    }

    let winner = candidates.swap_remove(best_idx);
    Ok(Some(Selected {
        byte_len: winner.byte_len,
        char_count: winner.char_count,
        unit: winner.unit,
    }))
}

/// `true` iff `challenger` should replace `winner` under the §4.4 tie-break
/// order: higher score, then higher `char_count + next_match_chars`, then
/// the end-of-word / span-length / look-ahead tie-breaks.
fn is_better(challenger: &Candidate, winner: &Candidate) -> bool {
    if challenger.score != winner.score {
        return challenger.score > winner.score;
    }
    let challenger_sum = challenger.char_count + challenger.next_match_chars;
    let winner_sum = winner.char_count + winner.next_match_chars;
    if challenger_sum != winner_sum {
        return challenger_sum > winner_sum;
    }

    let winner_ends_word = winner.next_match_chars == 0;
    let challenger_ends_word = challenger.next_match_chars == 0;
    match (winner_ends_word, challenger_ends_word) {
        (true, false) => false,
        (false, true) => true,
        (true, true) => challenger.char_count > winner.char_count,
        (false, false) => challenger.next_match_chars > winner.next_match_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::build_database;
    use crate::wav::write_wav;
    use std::path::Path;

    fn build_test_db(path: &Path) {
        let dataset = tempfile::tempdir().unwrap();
        for kind in ["letters", "syllables"] {
            std::fs::create_dir_all(dataset.path().join(kind).join("wavs")).unwrap();
        }
        for name in ["a", "o", "l"] {
            write_wav(
                &dataset.path().join("letters").join("wavs").join(format!("{name}.wav")),
                &[100, -100, 100, -100, 100],
            )
            .unwrap();
        }
        std::fs::write(
            dataset.path().join("letters").join("letters.txt"),
            "a.wav|a|A\no.wav|o|O\nl.wav|l|L\n",
        )
        .unwrap();
        for (name, text) in [("mun", "mun"), ("do", "do"), ("ola", "ola")] {
            let _ = text;
            write_wav(
                &dataset
                    .path()
                    .join("syllables")
                    .join("wavs")
                    .join(format!("{name}.wav")),
                &[50, -50, 50, -50, 50, -50],
            )
            .unwrap();
        }
        std::fs::write(
            dataset.path().join("syllables").join("sillabes.txt"),
            "mun.wav|mun|MUN\ndo.wav|do|DO\nola.wav|ola|OLA\n",
        )
        .unwrap();
        build_database(dataset.path(), path).unwrap();
    }

    #[test]
    fn prefers_longer_syllable_over_letters() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("voice.db");
        build_test_db(&db_path);
        let db = Database::open(&db_path).unwrap();

        let selected = select_unit(&db, "ola", "", true).unwrap().unwrap();
        assert_eq!(selected.char_count, 3);
        assert_eq!(selected.byte_len, 3);
    }

    #[test]
    fn no_match_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("voice.db");
        build_test_db(&db_path);
        let db = Database::open(&db_path).unwrap();

        assert!(select_unit(&db, "xyz", "", true).unwrap().is_none());
    }

    #[test]
    fn single_consonant_rejected_at_word_start() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("voice.db");
        build_test_db(&db_path);
        let db = Database::open(&db_path).unwrap();

        // "l" alone at word start is rejected; falls through to no match
        // since there's no other unit covering "l" here.
        assert!(select_unit(&db, "l", "", true).unwrap().is_none());
    }
}
