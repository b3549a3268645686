//! Time stretcher (C10): overlap-add time-scale modification with a Hann
//! window, plus the boundary pitch-smoothing helper used by the concatenator.
//!
//! Grounded on the `glottisdale` assembler's frame-based OLA loop
//! (`speak/assembler.rs`) — re-derived here with this spec's fixed frame
//! size and the weight-guarded normalisation division it calls for.

use std::f32::consts::PI;

use crate::pitch::estimate_f0;

pub const FRAME_SIZE: usize = 441;

fn hann_window(len: usize) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / (len as f32 - 1.0)).cos())
        .collect()
}

/// Overlap-add time-scale modification. `speed` is clamped to
/// `[min_speed, max_speed]` before use. Known limitation: this preserves
/// pitch only approximately and phase coherence not at all; acceptable for
/// factors in `[0.5, 2.0]`.
pub fn time_stretch(samples: &[i16], speed: f32, min_speed: f32, max_speed: f32) -> Vec<i16> {
    let speed = speed.clamp(min_speed, max_speed);
    if samples.len() < FRAME_SIZE {
        return samples.to_vec();
    }

    let analysis_hop = FRAME_SIZE / 4;
    let synthesis_hop = ((analysis_hop as f32) / speed).round().max(1.0) as usize;
    let num_frames = (samples.len() - FRAME_SIZE) / analysis_hop + 1;
    let out_len = num_frames * synthesis_hop + FRAME_SIZE;

    let window = hann_window(FRAME_SIZE);
    let mut accum = vec![0.0f32; out_len];
    let mut weight = vec![0.0f32; out_len];

    for frame in 0..num_frames {
        let analysis_pos = frame * analysis_hop;
        let synthesis_pos = frame * synthesis_hop;
        for i in 0..FRAME_SIZE {
            let w = window[i];
            accum[synthesis_pos + i] += samples[analysis_pos + i] as f32 * w;
            weight[synthesis_pos + i] += w;
        }
    }

    let mut out: Vec<i16> = accum
        .iter()
        .zip(weight.iter())
        .map(|(&a, &w)| {
            let sample = if w > 0.01 { a / w } else { 0.0 };
            sample.clamp(i16::MIN as f32, i16::MAX as f32) as i16
        })
        .collect();

    while out.last() == Some(&0) {
        out.pop();
    }
    out
}

/// Linear-interpolation resample of `src`, reading source position `i *
/// factor` for each output index `i`. Output length equals `src.len()`.
fn resample_linear(src: &[i16], factor: f32) -> Vec<i16> {
    let n = src.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let pos = i as f32 * factor;
        let i0 = pos.floor() as usize;
        let frac = pos - i0 as f32;
        let s0 = *src.get(i0).unwrap_or(&0) as f32;
        let s1 = *src.get(i0 + 1).unwrap_or(&(s0 as i16)) as f32;
        out.push((s0 + (s1 - s0) * frac) as i16);
    }
    out
}

/// Smooth a pitch discontinuity across a unit boundary: if both the
/// previous buffer's tail and the new unit's head are voiced and their pitch
/// ratio falls outside `[0.85, 1.15]`, gently resample the head's leading
/// region toward a less extreme ratio and blend it with the original over a
/// linear ramp. `crossfade_n` is the planned crossfade length in samples.
pub fn smooth_boundary_pitch(prev_tail: &[i16], next_samples: &mut [i16], sample_rate: u32, crossfade_n: usize) {
    if next_samples.is_empty() {
        return;
    }
    let prev_pitch = estimate_f0(prev_tail, sample_rate);
    let next_pitch = estimate_f0(next_samples, sample_rate);
    if prev_pitch <= 0.0 || next_pitch <= 0.0 {
        return;
    }
    let r = next_pitch / prev_pitch;
    if r >= 0.85 && r <= 1.15 {
        return;
    }

    let target = 1.0 + (r - 1.0) * 0.5;
    let factor = target / r;
    let region_len = crossfade_n.min(next_samples.len() / 4);
    if region_len == 0 {
        return;
    }

    let original = &next_samples[..region_len];
    let shifted = resample_linear(original, factor);
    for i in 0..region_len {
        let t = i as f32 / region_len as f32;
        let blended = shifted[i] as f32 * (1.0 - t) + next_samples[i] as f32 * t;
        next_samples[i] = blended.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, n: usize) -> Vec<i16> {
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (8000.0 * (2.0 * PI * freq * t).sin()) as i16
            })
            .collect()
    }

    #[test]
    fn identity_at_speed_one() {
        let samples = sine(200.0, 22_050, 2000);
        let stretched = time_stretch(&samples, 1.0, 0.5, 2.0);
        // Same hop on both sides at speed 1.0: length matches up to the
        // trailing-zero trim and frame boundary effects.
        assert!((stretched.len() as i64 - samples.len() as i64).unsigned_abs() <= FRAME_SIZE as u64);
    }

    #[test]
    fn slower_speed_lengthens_output() {
        let samples = sine(200.0, 22_050, 4000);
        let stretched = time_stretch(&samples, 0.5, 0.5, 2.0);
        assert!(stretched.len() > samples.len());
    }

    #[test]
    fn faster_speed_shortens_output() {
        let samples = sine(200.0, 22_050, 4000);
        let stretched = time_stretch(&samples, 2.0, 0.5, 2.0);
        assert!(stretched.len() < samples.len());
    }

    #[test]
    fn clamps_out_of_range_speed() {
        let samples = sine(200.0, 22_050, 2000);
        let clamped_low = time_stretch(&samples, 10.0, 0.5, 2.0);
        let at_max = time_stretch(&samples, 2.0, 0.5, 2.0);
        assert_eq!(clamped_low.len(), at_max.len());
    }

    #[test]
    fn no_smoothing_when_unvoiced() {
        let mut next = vec![0i16; 500];
        let prev = vec![0i16; 500];
        let before = next.clone();
        smooth_boundary_pitch(&prev, &mut next, 22_050, 50);
        assert_eq!(next, before);
    }
}
