//! Configuration loader (C12): line-oriented `key: value` files.
//!
//! Grounded on the teacher's lightweight model-config shape (a flat record
//! of tunables with defaults baked into `Default`) — the file format itself
//! is new here, modelled directly on §4.11/§6 of this project's design.

use std::path::Path;

use crate::error::{Error, Result};

/// The engine's tunable parameters, all with defaults matching §3.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub crossfade_ms: f32,
    pub crossfade_vowel_ms: f32,
    pub crossfade_s_ending_ms: f32,
    pub crossfade_r_ending_ms: f32,
    pub vowel_to_consonant_factor: f32,
    pub word_pause_ms: f32,
    pub unknown_silence_ms: f32,
    pub fade_in_ms: f32,
    pub fade_out_ms: f32,
    pub remove_word_silence: bool,
    pub silence_threshold: f32,
    pub min_silence_ms: f32,
    pub remove_dc_offset: bool,
    pub default_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub print_units: bool,
    pub print_timing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            crossfade_ms: 20.0,
            crossfade_vowel_ms: 45.0,
            crossfade_s_ending_ms: 30.0,
            crossfade_r_ending_ms: 30.0,
            vowel_to_consonant_factor: 0.5,
            word_pause_ms: 120.0,
            unknown_silence_ms: 30.0,
            fade_in_ms: 3.0,
            fade_out_ms: 3.0,
            remove_word_silence: true,
            silence_threshold: 0.02,
            min_silence_ms: 15.0,
            remove_dc_offset: true,
            default_speed: 1.0,
            min_speed: 0.5,
            max_speed: 2.0,
            print_units: false,
            print_timing: false,
        }
    }
}

enum Value {
    F32,
    Bool,
}

impl Config {
    fn field_kind(key: &str) -> Option<Value> {
        match key {
            "crossfade_ms" | "crossfade_vowel_ms" | "crossfade_s_ending_ms"
            | "crossfade_r_ending_ms" | "vowel_to_consonant_factor" | "word_pause_ms"
            | "unknown_silence_ms" | "fade_in_ms" | "fade_out_ms" | "silence_threshold"
            | "min_silence_ms" | "default_speed" | "min_speed" | "max_speed" => Some(Value::F32),
            "remove_word_silence" | "remove_dc_offset" | "print_units" | "print_timing" => {
                Some(Value::Bool)
            }
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, raw_value: &str) {
        match key {
            "crossfade_ms" => self.crossfade_ms = parse_or_warn(key, raw_value, self.crossfade_ms),
            "crossfade_vowel_ms" => {
                self.crossfade_vowel_ms = parse_or_warn(key, raw_value, self.crossfade_vowel_ms)
            }
            "crossfade_s_ending_ms" => {
                self.crossfade_s_ending_ms =
                    parse_or_warn(key, raw_value, self.crossfade_s_ending_ms)
            }
            "crossfade_r_ending_ms" => {
                self.crossfade_r_ending_ms =
                    parse_or_warn(key, raw_value, self.crossfade_r_ending_ms)
            }
            "vowel_to_consonant_factor" => {
                self.vowel_to_consonant_factor =
                    parse_or_warn(key, raw_value, self.vowel_to_consonant_factor)
            }
            "word_pause_ms" => self.word_pause_ms = parse_or_warn(key, raw_value, self.word_pause_ms),
            "unknown_silence_ms" => {
                self.unknown_silence_ms = parse_or_warn(key, raw_value, self.unknown_silence_ms)
            }
            "fade_in_ms" => self.fade_in_ms = parse_or_warn(key, raw_value, self.fade_in_ms),
            "fade_out_ms" => self.fade_out_ms = parse_or_warn(key, raw_value, self.fade_out_ms),
            "remove_word_silence" => {
                self.remove_word_silence = parse_or_warn(key, raw_value, self.remove_word_silence)
            }
            "silence_threshold" => {
                self.silence_threshold = parse_or_warn(key, raw_value, self.silence_threshold)
            }
            "min_silence_ms" => self.min_silence_ms = parse_or_warn(key, raw_value, self.min_silence_ms),
            "remove_dc_offset" => {
                self.remove_dc_offset = parse_or_warn(key, raw_value, self.remove_dc_offset)
            }
            "default_speed" => self.default_speed = parse_or_warn(key, raw_value, self.default_speed),
            "min_speed" => self.min_speed = parse_or_warn(key, raw_value, self.min_speed),
            "max_speed" => self.max_speed = parse_or_warn(key, raw_value, self.max_speed),
            "print_units" => self.print_units = parse_or_warn(key, raw_value, self.print_units),
            "print_timing" => self.print_timing = parse_or_warn(key, raw_value, self.print_timing),
            _ => unreachable!("field_kind gates unknown keys before set_field is called"),
        }
    }
}

trait ConfigValue: Sized + Copy {
    fn parse(s: &str) -> Option<Self>;
}
impl ConfigValue for f32 {
    fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}
impl ConfigValue for bool {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

fn parse_or_warn<T: ConfigValue>(key: &str, raw_value: &str, default: T) -> T {
    match T::parse(raw_value.trim()) {
        Some(v) => v,
        None => {
            tracing::warn!(key, value = raw_value, "malformed config value, keeping default");
            default
        }
    }
}

/// Load a config file, applying recognised `key: value` lines onto a
/// default [`Config`]. Missing files are the caller's concern, not an error
/// here — §7 treats a missing config file as informational, not fatal.
pub fn load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = Config::default();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            continue; // decorative section header
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if Config::field_kind(key).is_some() {
            config.set_field(key, value);
        } else {
            tracing::warn!(key, "unrecognised config key, ignoring");
        }
    }
    Ok(config)
}
