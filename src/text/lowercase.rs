//! Brazilian Portuguese aware lowercasing — the final preprocessing step
//! before segmentation, run after rewrite rules and number expansion so unit
//! lookup always sees the database's canonical (lowercase) spellings.

const UPPER: &[char] = &['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'É', 'Ó', 'Ô', 'Ç'];
const LOWER: &[char] = &['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'é', 'ó', 'ô', 'ç'];

fn lower_char(c: char) -> char {
    match UPPER.iter().position(|&u| u == c) {
        Some(i) => LOWER[i],
        None => c,
    }
}

/// Lowercase `text`, folding ASCII `A-Z` plus `É Ó Ô Ç` to their lowercase
/// forms. Other already-accented letters pass through unchanged — the voice
/// database stores units pre-lowercased in their natural accented form.
pub fn lowercase(text: &str) -> String {
    text.chars().map(lower_char).collect()
}
