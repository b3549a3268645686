//! WAV I/O (C13): ingest mono/stereo 16-bit PCM recordings at build time,
//! emit the final mono 16-bit PCM buffer at synth time.
//!
//! Grounded on the teacher's `model.rs` `write_wav`, which drives
//! `hound::WavWriter` over an `i16` buffer and clamps samples into range —
//! the read side is new here (the teacher never ingests WAV, only writes it).

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

use crate::error::{Error, Result};
use crate::SAMPLE_RATE;

/// Read a WAV file and return its samples as mono 16-bit PCM, averaging
/// stereo channels by widening to `i32` before dividing (Open Question 1:
/// avoids the narrower-type overflow a direct `i16` sum would risk).
pub fn read_wav_mono(path: &Path) -> Result<Vec<i16>> {
    let reader = WavReader::open(path).map_err(|err| Error::InvalidWav {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(Error::InvalidWav {
            path: path.to_path_buf(),
            reason: format!(
                "expected 16-bit PCM, got {:?} {} bits",
                spec.sample_format, spec.bits_per_sample
            ),
        });
    }
    match spec.channels {
        1 => {
            let samples: std::result::Result<Vec<i16>, _> = reader.into_samples::<i16>().collect();
            samples.map_err(|err| Error::InvalidWav {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
        }
        2 => {
            let raw: std::result::Result<Vec<i16>, _> = reader.into_samples::<i16>().collect();
            let raw = raw.map_err(|err| Error::InvalidWav {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
            Ok(raw
                .chunks_exact(2)
                .map(|pair| {
                    let sum = pair[0] as i32 + pair[1] as i32;
                    (sum / 2) as i16
                })
                .collect())
        }
        n => Err(Error::InvalidWav {
            path: path.to_path_buf(),
            reason: format!("unsupported channel count {n}"),
        }),
    }
}

/// Write `samples` as canonical mono 16-bit PCM at [`SAMPLE_RATE`].
pub fn write_wav(path: &Path, samples: &[i16]) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).map_err(|err| Error::FileWrite {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, err),
    })?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|err| Error::FileWrite {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, err),
            })?;
    }
    writer.finalize().map_err(|err| Error::FileWrite {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, err),
    })
}
