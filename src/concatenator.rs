//! Concatenator (C7): phoneme-adaptive crossfade, boundary energy match,
//! pitch smoothing, word/punctuation pauses.
//!
//! Grounded on `glottisdale`'s `speak/assembler.rs` (`crossfade_ms`,
//! `TimingPlan`, RMS-normalise-then-mix per clip) — re-derived with this
//! spec's phoneme-class-adaptive crossfade length and explicit energy
//! matching step.

use std::f32::consts::PI;

use crate::config::Config;
use crate::phonotactics::is_vowel;
use crate::prosody::{self, ProsodyContext};
use crate::signal;
use crate::stretch::smooth_boundary_pitch;
use crate::SAMPLE_RATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonemeClass {
    Vowel,
    Plosive,
    Fricative,
    Nasal,
    Liquid,
    Other,
}

fn classify_char(c: char) -> PhonemeClass {
    if is_vowel(c) {
        return PhonemeClass::Vowel;
    }
    match c.to_ascii_lowercase() {
        'p' | 't' | 'k' | 'b' | 'd' | 'g' => PhonemeClass::Plosive,
        'f' | 'v' | 's' | 'z' | 'x' | 'j' => PhonemeClass::Fricative,
        'm' | 'n' => PhonemeClass::Nasal,
        'l' | 'r' => PhonemeClass::Liquid,
        _ => PhonemeClass::Other,
    }
}

fn classify_first(text: &str) -> PhonemeClass {
    text.chars().next().map(classify_char).unwrap_or(PhonemeClass::Other)
}

fn classify_last(text: &str) -> PhonemeClass {
    let lower = text.to_lowercase();
    if lower.ends_with("ch") {
        return PhonemeClass::Fricative;
    }
    if lower.ends_with("nh") {
        return PhonemeClass::Nasal;
    }
    if lower.ends_with("lh") {
        return PhonemeClass::Liquid;
    }
    text.chars().last().map(classify_char).unwrap_or(PhonemeClass::Other)
}

fn adaptive_crossfade_ms(prev_end: PhonemeClass, next_start: PhonemeClass, config: &Config) -> f32 {
    use PhonemeClass::*;
    let base = config.crossfade_ms;
    if next_start == Plosive {
        0.2 * base
    } else if prev_end == Plosive {
        0.3 * base
    } else if prev_end == Fricative || next_start == Fricative {
        0.4 * base
    } else if prev_end == Vowel && next_start == Vowel {
        config.crossfade_vowel_ms
    } else if prev_end == Vowel && next_start != Vowel {
        base * config.vowel_to_consonant_factor
    } else if matches!(prev_end, Nasal | Liquid) || matches!(next_start, Nasal | Liquid) {
        0.7 * base
    } else {
        base
    }
}

fn ms_to_samples(ms: f32) -> usize {
    ((ms * SAMPLE_RATE as f32 / 1000.0).max(0.0)) as usize
}

/// Drives the growing sample buffer across a whole utterance.
pub struct Concatenator {
    buffer: Vec<i16>,
    prev_text: Option<String>,
    prev_class_last: Option<PhonemeClass>,
    word_start_sample: usize,
    previous_was_word_boundary: bool,
    word_index: u32,
}

impl Concatenator {
    pub fn new() -> Self {
        // 10 seconds of headroom, per §4.10.
        Concatenator {
            buffer: Vec::with_capacity(10 * SAMPLE_RATE as usize),
            prev_text: None,
            prev_class_last: None,
            word_start_sample: 0,
            previous_was_word_boundary: true,
            word_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Append one selected unit's audio, crossfading against the buffer's
    /// tail unless this is the first unit of a word.
    pub fn append_unit(&mut self, text: &str, unit_samples: &[i16], config: &Config) {
        let mut scratch = unit_samples.to_vec();
        if config.remove_dc_offset {
            signal::remove_dc_offset(&mut scratch);
        }
        signal::normalize_rms(&mut scratch, signal::RMS_TARGET);

        if !self.previous_was_word_boundary && !self.buffer.is_empty() {
            let next_start = classify_first(text);
            let prev_end = self.prev_class_last.unwrap_or(PhonemeClass::Other);
            let mut adaptive_ms = adaptive_crossfade_ms(prev_end, next_start, config);
            if let Some(prev_text) = &self.prev_text {
                if prev_text.to_lowercase().ends_with('s') {
                    adaptive_ms = adaptive_ms.min(config.crossfade_s_ending_ms);
                }
                if prev_text.to_lowercase().ends_with('r') {
                    adaptive_ms = adaptive_ms.min(config.crossfade_r_ending_ms);
                }
            }

            let n = ms_to_samples(adaptive_ms).min(self.buffer.len()).min(scratch.len());

            if n > 0 {
                let tail_start = self.buffer.len() - n;
                smooth_boundary_pitch(&self.buffer[tail_start..], &mut scratch, SAMPLE_RATE, n);

                let prev_rms = signal::rms(&self.buffer[tail_start..]);
                let next_rms = signal::rms(&scratch[..n]);
                if next_rms > 0.0 {
                    let ratio = (prev_rms / next_rms).clamp(0.5, 2.0);
                    for i in 0..n {
                        let t = i as f32 / n as f32;
                        let gain = ratio * (1.0 - t) + t;
                        scratch[i] =
                            ((scratch[i] as f32) * gain).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                    }
                }

                let buf_len = self.buffer.len();
                for i in 0..n {
                    let t = i as f32 / n as f32;
                    let prev_gain = 0.5 * (1.0 + (PI * t).cos());
                    let next_gain = 0.5 * (1.0 - (PI * t).cos());
                    let prev_sample = self.buffer[buf_len - n + i] as f32;
                    let next_sample = scratch[i] as f32;
                    let mixed = (prev_sample * prev_gain + next_sample * next_gain)
                        .clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                    self.buffer[buf_len - n + i] = mixed;
                }
            }
            self.buffer.extend_from_slice(&scratch[n..]);
        } else {
            let fade_n = ms_to_samples(config.fade_in_ms).min(scratch.len());
            signal::apply_fade_in(&mut scratch, fade_n);
            self.buffer.extend_from_slice(&scratch);
        }

        self.prev_text = Some(text.to_string());
        self.prev_class_last = Some(classify_last(text));
        self.previous_was_word_boundary = false;
    }

    fn trim_and_apply_prosody(&mut self, config: &Config, ctx: &ProsodyContext) {
        if config.remove_word_silence && self.word_start_sample < self.buffer.len() {
            let min_silence_samples = ms_to_samples(config.min_silence_ms);
            let trimmed =
                signal::trim_silence(&self.buffer[self.word_start_sample..], config.silence_threshold, min_silence_samples);
            self.buffer.truncate(self.word_start_sample);
            self.buffer.extend_from_slice(&trimmed);
        }
        if self.word_start_sample < self.buffer.len() {
            let start = self.word_start_sample;
            prosody::apply_word_prosody(&mut self.buffer[start..], ctx, self.word_index);
        }
    }

    /// Whitespace: finish the current word (trim, prosody, fade-out) and
    /// insert `word_pause_ms` of silence.
    pub fn word_pause(&mut self, config: &Config, ctx: &ProsodyContext) {
        self.trim_and_apply_prosody(config, ctx);
        let fade_n = ms_to_samples(config.fade_out_ms);
        signal::apply_fade_out(&mut self.buffer, fade_n);
        self.buffer.extend(std::iter::repeat(0i16).take(ms_to_samples(config.word_pause_ms)));
        self.word_start_sample = self.buffer.len();
        self.previous_was_word_boundary = true;
        self.word_index += 1;
        self.prev_text = None;
        self.prev_class_last = None;
    }

    /// Punctuation (`, ; : . ! ?`): like [`Self::word_pause`] but with a
    /// duration scaled per character; sentence-ending punctuation resets the
    /// per-sentence word index used by declination/question-rise.
    pub fn punctuation_pause(&mut self, c: char, config: &Config, ctx: &ProsodyContext) {
        self.trim_and_apply_prosody(config, ctx);
        let fade_n = ms_to_samples(config.fade_out_ms);
        signal::apply_fade_out(&mut self.buffer, fade_n);

        let multiplier = match c {
            ',' => 0.5,
            ';' => 0.7,
            ':' => 0.7,
            '.' => 1.2,
            '!' => 1.3,
            '?' => 1.2,
            _ => 1.0,
        };
        self.buffer
            .extend(std::iter::repeat(0i16).take(ms_to_samples(config.word_pause_ms * multiplier)));
        self.word_start_sample = self.buffer.len();
        self.previous_was_word_boundary = true;
        self.prev_text = None;
        self.prev_class_last = None;
        if matches!(c, '.' | '!' | '?') {
            self.word_index = 0;
        } else {
            self.word_index += 1;
        }
    }

    /// No-match gap: `unknown_silence_ms` of zero samples, without
    /// disturbing the word-boundary/previous-unit tracking beyond resetting
    /// the previous-unit pointer (§4.4).
    pub fn unknown_gap(&mut self, config: &Config) {
        self.buffer
            .extend(std::iter::repeat(0i16).take(ms_to_samples(config.unknown_silence_ms)));
        self.prev_text = None;
        self.prev_class_last = None;
    }

    /// Finish the trailing word and apply the utterance's final fade-out.
    pub fn finalize(mut self, config: &Config, ctx: &ProsodyContext) -> Vec<i16> {
        self.trim_and_apply_prosody(config, ctx);
        let fade_n = ms_to_samples(config.fade_out_ms);
        signal::apply_fade_out(&mut self.buffer, fade_n);
        self.buffer
    }
}

impl Default for Concatenator {
    fn default() -> Self {
        Self::new()
    }
}
