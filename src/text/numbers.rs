//! Portuguese cardinal number-to-words expansion (C3, part i).
//!
//! Grounded on the teacher's `preprocess.rs` number-expansion pipeline
//! (`number_to_words` / `three_digits_to_words` driving a `Lazy<Regex>`
//! digit-run replacement over the whole buffer) — re-derived here for
//! Brazilian Portuguese grouping, the `e` joiner, and the `cem` special case
//! instead of the teacher's English `ONES`/`TENS`/`SCALE` tables.

use fancy_regex::{Captures, Regex};
use once_cell::sync::Lazy;

const ONES: &[&str] = &[
    "", "um", "dois", "três", "quatro", "cinco", "seis", "sete", "oito", "nove", "dez", "onze",
    "doze", "treze", "quatorze", "quinze", "dezesseis", "dezessete", "dezoito", "dezenove",
];
const TENS: &[&str] = &[
    "", "", "vinte", "trinta", "quarenta", "cinquenta", "sessenta", "setenta", "oitenta",
    "noventa",
];
const HUNDREDS: &[&str] = &[
    "", "cento", "duzentos", "trezentos", "quatrocentos", "quinhentos", "seiscentos",
    "setecentos", "oitocentos", "novecentos",
];

/// A digit run matching a maximal run of ASCII decimal digits, optionally
/// preceded by a minus sign.
static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").unwrap());

fn tens_and_units(n: u32) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let t = n / 10;
    let u = n % 10;
    if u == 0 {
        TENS[t as usize].to_string()
    } else {
        format!("{} e {}", TENS[t as usize], ONES[u as usize])
    }
}

/// Read a single group of 0–999. Returns the empty string for 0.
fn three_digits_to_words(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    if n == 100 {
        return "cem".to_string();
    }
    let hundreds = n / 100;
    let rest = n % 100;
    let mut parts = Vec::new();
    if hundreds > 0 {
        parts.push(HUNDREDS[hundreds as usize].to_string());
    }
    if rest > 0 {
        parts.push(tens_and_units(rest));
    }
    parts.join(" e ")
}

/// `true` when `value` (a group's 0–999 reading) should be joined to the
/// previous word with "e" rather than a plain space: residues under 100 and
/// round hundreds both take the joiner in Brazilian Portuguese (e.g. "mil e
/// vinte", "mil e duzentos", but "mil cento e vinte" with no inter-group "e").
fn wants_e_joiner(value: u32) -> bool {
    value > 0 && (value < 100 || value % 100 == 0)
}

/// Scale words for groups of 1000, indexed 0 (units) .. 3 (billions), with
/// their plural forms.
const SCALE_SINGULAR: &[&str] = &["", "mil", "milhão", "bilhão"];
const SCALE_PLURAL: &[&str] = &["", "mil", "milhões", "bilhões"];

/// Convert a non-negative integer (up to the billions scale) to Portuguese words.
pub fn number_to_words(n: i64) -> String {
    if n < 0 {
        return format!("menos {}", number_to_words(-n));
    }
    if n == 0 {
        return "zero".to_string();
    }
    let mut n = n as u64;

    // Groups of 3 digits, least significant first: units, thousands, millions, billions.
    let mut groups = [0u32; 4];
    for g in groups.iter_mut() {
        *g = (n % 1000) as u32;
        n /= 1000;
    }
    // Anything beyond the billions scale is out of the spec's bound; fold it
    // into the billions group reading rather than silently dropping it.
    if n > 0 {
        groups[3] = groups[3].saturating_add((n % 1000) as u32);
    }

    let nonzero: Vec<(usize, u32)> = groups
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, &v)| v != 0)
        .map(|(i, &v)| (i, v))
        .collect();

    let mut words: Vec<String> = Vec::new();
    for &(idx, value) in &nonzero {
        if idx == 0 {
            words.push(three_digits_to_words(value));
        } else if value == 1 {
            // "mil" alone, but "um milhão" / "um bilhão" keep the "um".
            words.push(if idx == 1 {
                SCALE_SINGULAR[idx].to_string()
            } else {
                format!("um {}", SCALE_SINGULAR[idx])
            });
        } else {
            words.push(format!("{} {}", three_digits_to_words(value), SCALE_PLURAL[idx]));
        }
    }

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let is_last = i == words.len() - 1;
            let (_, last_value) = nonzero[i];
            if is_last && wants_e_joiner(last_value) {
                out.push_str(" e ");
            } else {
                out.push(' ');
            }
        }
        out.push_str(word);
    }
    out
}

/// Replace every maximal run of ASCII decimal digits in `text` with its
/// Portuguese cardinal reading.
pub fn expand_numbers(text: &str) -> String {
    RE_NUMBER
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            matched
                .parse::<i64>()
                .map(number_to_words)
                .unwrap_or_else(|_| matched.to_string())
        })
        .into_owned()
}
