//! Prosody overlay (C8): declination and question-rise gain contours,
//! acoustic stand-ins for real pitch shifting.
//!
//! Grounded on `glottisdale`'s `TimingPlan`/per-word gain shaping in
//! `speak/assembler.rs` — re-derived as pure sample-gain functions over
//! `i16` slices, driven by the word index/count the concatenator tracks.

/// Sentence-level context gathered once before synthesis: word count and
/// trailing-punctuation intonation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProsodyContext {
    pub word_count: u32,
    pub is_question: bool,
    pub is_exclamation: bool,
}

impl ProsodyContext {
    /// Scan `text`: count words (maximal runs of non-whitespace) and inspect
    /// the trailing non-whitespace character.
    pub fn analyze(text: &str) -> ProsodyContext {
        let word_count = text.split_whitespace().count() as u32;
        let last_char = text.chars().rev().find(|c| !c.is_whitespace());
        ProsodyContext {
            word_count,
            is_question: last_char == Some('?'),
            is_exclamation: last_char == Some('!'),
        }
    }
}

/// Declination gain: `1 - 0.05 * progress`, `progress = word_index /
/// max(1, word_count - 1)`.
pub fn declination_gain(word_index: u32, word_count: u32) -> f32 {
    let denom = (word_count.saturating_sub(1)).max(1) as f32;
    let progress = word_index as f32 / denom;
    1.0 - 0.05 * progress
}

/// Question-rise gain at sample `i` of `word_len` in the word at
/// `word_index`: only nonzero for one of the last two words of a question.
/// `delta = 0.15` for the very last word, `0.08` for the second-to-last.
pub fn question_rise_gain(ctx: &ProsodyContext, word_index: u32, i: usize, word_len: usize) -> f32 {
    if !ctx.is_question || ctx.word_count == 0 || word_len == 0 {
        return 1.0;
    }
    let last = ctx.word_count - 1;
    let delta = if word_index == last {
        0.15
    } else if word_index + 1 == last {
        0.08
    } else {
        return 1.0;
    };
    let t = i as f32 / word_len as f32;
    1.0 + delta * t * t
}

/// Apply declination (and, for question contexts, the question-rise
/// envelope) to a completed word's samples in place.
pub fn apply_word_prosody(samples: &mut [i16], ctx: &ProsodyContext, word_index: u32) {
    let declination = declination_gain(word_index, ctx.word_count);
    let word_len = samples.len();
    for (i, sample) in samples.iter_mut().enumerate() {
        let rise = question_rise_gain(ctx, word_index, i, word_len);
        let gain = declination * rise;
        *sample = ((*sample as f32) * gain).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
    }
}
