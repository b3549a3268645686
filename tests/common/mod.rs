//! Shared fixture builder for integration tests: a small voice database
//! covering the unit set named in the testable-properties scenarios
//! (`a, o, l, á, mu, mun, do, ol, lá, ca, sa, ç, rr`).

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use tts_pt_br::database::build_database;
use tts_pt_br::wav::write_wav;

const UNITS: &[(&str, &str)] = &[
    ("a", "a"),
    ("o", "o"),
    ("l_", "l"),
    ("a_acute", "á"),
    ("c_cedilha", "ç"),
    ("mu", "mu"),
    ("mun", "mun"),
    ("do", "do"),
    ("ol", "ol"),
    ("l_acute", "lá"),
    ("ca", "ca"),
    ("sa", "sa"),
    ("rr", "rr"),
];

fn sine(freq: f32, n: usize) -> Vec<i16> {
    (0..n)
        .map(|i| {
            let t = i as f32 / 22_050.0;
            (8000.0 * (2.0 * PI * freq * t).sin()) as i16
        })
        .collect()
}

/// Build a dataset directory under `dir` and compile it into `dir/voice.db`,
/// returning the database path.
pub fn build_test_database(dir: &Path) -> PathBuf {
    for kind in ["letters", "syllables"] {
        std::fs::create_dir_all(dir.join(kind).join("wavs")).unwrap();
    }

    let mut letters_txt = String::new();
    let mut syllables_txt = String::new();
    for (i, (filename, text)) in UNITS.iter().enumerate() {
        // ~50ms per unit: long enough for crossfades and fades to operate
        // over without degenerating to near-zero-length spans.
        let samples = sine(110.0 + i as f32 * 37.0, 1100);
        let is_letter = text.chars().count() == 1;
        let kind = if is_letter { "letters" } else { "syllables" };
        write_wav(
            &dir.join(kind).join("wavs").join(format!("{filename}.wav")),
            &samples,
        )
        .unwrap();
        let line = format!("{filename}.wav|{text}|{text}\n");
        if is_letter {
            letters_txt.push_str(&line);
        } else {
            syllables_txt.push_str(&line);
        }
    }
    std::fs::write(dir.join("letters").join("letters.txt"), letters_txt).unwrap();
    std::fs::write(dir.join("syllables").join("sillabes.txt"), syllables_txt).unwrap();

    let db_path = dir.join("voice.db");
    build_database(dir, &db_path).unwrap();
    db_path
}
