//! Synthesis driver (C11): orchestrates preprocessing, selection,
//! concatenation, prosody, and optional stretching for one input string.
//!
//! Grounded on the teacher's `model.rs` `KittenTtsOnnx` (a struct owning
//! every resource the pipeline needs, with one `generate`-style entry point)
//! — re-derived here around a memory-mapped database instead of an ONNX
//! session, with the rewrite ruleset as an explicit `OnceCell` field instead
//! of the teacher's hidden-global phonemizer state.

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::concatenator::Concatenator;
use crate::config::{self, Config};
use crate::database::Database;
use crate::error::Result;
use crate::prosody::ProsodyContext;
use crate::selector;
use crate::stretch;
use crate::text::{self, CompiledRuleset};

const SEPARATOR_CHARS: &[char] = &[
    ',', ';', ':', '.', '!', '?', '-', '(', ')', '[', ']', '"', '\'', '`',
];
const PAUSE_CHARS: &[char] = &[',', ';', ':', '.', '!', '?'];

fn is_separator(c: char) -> bool {
    c.is_whitespace() || SEPARATOR_CHARS.contains(&c)
}

/// Byte offset of the next separator character at or after `pos`, or the
/// string's length if none remains.
fn next_separator(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|&(_, c)| is_separator(c))
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// The next word's text for look-ahead purposes: skip whitespace starting at
/// `from`, then take the run of non-separator characters that follows (empty
/// if the next non-whitespace character is itself a separator).
fn lookahead_word(text: &str, from: usize) -> &str {
    let mut pos = from;
    for (i, c) in text[from..].char_indices() {
        if !c.is_whitespace() {
            pos = from + i;
            break;
        }
        pos = from + i + c.len_utf8();
    }
    if pos >= text.len() || is_separator(text[pos..].chars().next().unwrap_or(' ')) {
        return "";
    }
    let end = next_separator(text, pos);
    &text[pos..end]
}

/// Open a voice database read-only and build an engine around it.
pub fn open(db_path: &Path) -> Result<Engine> {
    let db = Database::open(db_path)?;
    Ok(Engine {
        db,
        config: Config::default(),
        rewrite_path: None,
        ruleset: OnceCell::new(),
        units_found: 0,
        units_missing: 0,
    })
}

/// Owns the mapped database, the configuration record, and the lazily
/// compiled rewrite ruleset for one voice. Not safe for concurrent
/// synthesis calls on the same instance (see module docs).
pub struct Engine {
    db: Database,
    config: Config,
    rewrite_path: Option<PathBuf>,
    ruleset: OnceCell<CompiledRuleset>,
    units_found: u32,
    units_missing: u32,
}

impl Engine {
    /// Apply a configuration file on top of the default [`Config`].
    pub fn load_config(&mut self, path: &Path) -> Result<()> {
        self.config = config::load_config(path)?;
        Ok(())
    }

    /// Record a rewrite-rules CSV to compile on the first [`Self::synthesize`]
    /// call. Has no effect if called after the ruleset has already been
    /// lazily initialised.
    pub fn set_rewrite_path(&mut self, path: PathBuf) {
        self.rewrite_path = Some(path);
    }

    /// The speed to use when the caller doesn't supply one explicitly, per
    /// the current configuration (`Config::default_speed`, 1.0 unless a
    /// loaded config file overrides it).
    pub fn default_speed(&self) -> f32 {
        self.config.default_speed
    }

    pub fn units_found(&self) -> u32 {
        self.units_found
    }

    pub fn units_missing(&self) -> u32 {
        self.units_missing
    }

    fn ruleset(&self) -> Result<&CompiledRuleset> {
        self.ruleset.get_or_try_init(|| match &self.rewrite_path {
            Some(path) => text::load_ruleset(path),
            None => Ok(CompiledRuleset::empty()),
        })
    }

    /// Synthesize `text` at `speed` (clamped to the configured bounds).
    pub fn synthesize(&mut self, text: &str, speed: f32) -> Result<Vec<i16>> {
        let synth_start = Instant::now();
        let ctx = ProsodyContext::analyze(text);

        let preprocess_start = Instant::now();
        let ruleset = self.ruleset()?;
        let processed = text::preprocess(text, ruleset);
        if self.config.print_timing {
            tracing::info!(elapsed_ms = preprocess_start.elapsed().as_secs_f64() * 1000.0, "preprocess");
        }

        let speed = speed.clamp(self.config.min_speed, self.config.max_speed);

        let mut units_found = 0u32;
        let mut units_missing = 0u32;
        let mut cat = Concatenator::new();

        let selection_start = Instant::now();
        let mut pos = 0usize;
        let mut at_word_start = true;
        while pos < processed.len() {
            let c = processed[pos..].chars().next().unwrap();

            if c.is_whitespace() {
                cat.word_pause(&self.config, &ctx);
                pos += c.len_utf8();
                at_word_start = true;
                continue;
            }
            if PAUSE_CHARS.contains(&c) {
                cat.punctuation_pause(c, &self.config, &ctx);
                pos += c.len_utf8();
                at_word_start = true;
                continue;
            }
            if SEPARATOR_CHARS.contains(&c) {
                // soft hyphen / ignorable bracket-like characters: consumed
                // without emitting silence and without resetting word-start.
                pos += c.len_utf8();
                continue;
            }

            let word_end = next_separator(&processed, pos);
            let remaining = &processed[pos..word_end];
            let lookahead = lookahead_word(&processed, word_end);

            match selector::select_unit(&self.db, remaining, lookahead, at_word_start)? {
                Some(selected) => {
                    let span_text = &processed[pos..pos + selected.byte_len];
                    if self.config.print_units {
                        tracing::debug!(unit = span_text, "selected unit");
                    }
                    cat.append_unit(span_text, &selected.unit.samples, &self.config);
                    units_found += 1;
                    pos += selected.byte_len;
                    at_word_start = false;
                }
                None => {
                    if self.config.print_units {
                        tracing::debug!(char = %c, "no match, inserting silence");
                    }
                    cat.unknown_gap(&self.config);
                    units_missing += 1;
                    pos += c.len_utf8();
                    at_word_start = false;
                }
            }
        }
        if self.config.print_timing {
            tracing::info!(elapsed_ms = selection_start.elapsed().as_secs_f64() * 1000.0, "selection+concatenation");
        }

        let mut buffer = cat.finalize(&self.config, &ctx);

        if (speed - 1.0).abs() > f32::EPSILON {
            let stretch_start = Instant::now();
            buffer = stretch::time_stretch(&buffer, speed, self.config.min_speed, self.config.max_speed);
            if self.config.print_timing {
                tracing::info!(elapsed_ms = stretch_start.elapsed().as_secs_f64() * 1000.0, "stretch");
            }
        }

        self.units_found = units_found;
        self.units_missing = units_missing;
        if self.config.print_timing {
            tracing::info!(elapsed_ms = synth_start.elapsed().as_secs_f64() * 1000.0, "synthesize total");
        }
        Ok(buffer)
    }
}
