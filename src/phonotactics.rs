//! Brazilian Portuguese phonotactic oracle (C4).
//!
//! Classifies letters and scores candidate unit spans so the selector
//! (`crate::selector`) prefers segmentations that respect Portuguese syllable
//! structure over a bare longest-match.

/// `true` for the Portuguese vowels, including accented forms, in either case.
pub fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u'
            | 'A' | 'E' | 'I' | 'O' | 'U'
            | 'á' | 'à' | 'â' | 'ã' | 'é' | 'ê' | 'í' | 'ó' | 'ô' | 'õ' | 'ú' | 'ü'
            | 'Á' | 'À' | 'Â' | 'Ã' | 'É' | 'Ê' | 'Í' | 'Ó' | 'Ô' | 'Õ' | 'Ú' | 'Ü'
    )
}

/// `true` for any alphabetic, non-vowel code point, including `ç`/`Ç`.
pub fn is_consonant(c: char) -> bool {
    (c.is_alphabetic() || c == 'ç' || c == 'Ç') && !is_vowel(c)
}

/// Lowercase the first two ASCII letters of `s` for digraph/cluster checks.
/// Non-ASCII-letter characters are left as-is; callers only need this to
/// normalise case, not to fully fold accents.
fn ascii_lower2(s: &str) -> String {
    s.chars()
        .take(2)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// `true` iff `text` begins with one of the Portuguese digraphs
/// `ch, lh, nh, qu, gu`.
pub fn starts_with_digraph(text: &str) -> bool {
    let head = ascii_lower2(text);
    matches!(head.as_str(), "ch" | "lh" | "nh" | "qu" | "gu")
}

/// `true` iff `text` begins with a valid onset cluster: an obstruent
/// followed by a liquid (`pr, br, tr, dr, cr, gr, fr, vr, pl, bl, cl, gl, fl`).
pub fn starts_with_onset_cluster(text: &str) -> bool {
    let head = ascii_lower2(text);
    let mut chars = head.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return false;
    };
    match second {
        'r' => matches!(first, 'p' | 'b' | 't' | 'd' | 'c' | 'g' | 'f' | 'v'),
        'l' => matches!(first, 'p' | 'b' | 'c' | 'g' | 'f'),
        _ => false,
    }
}

/// Reject single-character spans that can't stand alone: a consonant at a
/// word start, or a consonant that is actually the first half of a digraph.
pub fn reject_single_char(text: &str, at_word_start: bool, next_char: Option<char>) -> bool {
    let Some(c) = text.chars().next() else {
        return true;
    };
    if text.chars().count() != 1 {
        return false;
    }
    if is_consonant(c) && at_word_start {
        return true;
    }
    if is_consonant(c) {
        if let Some(n) = next_char {
            let mut pair = String::new();
            pair.push(c);
            pair.push(n);
            if starts_with_digraph(&pair) {
                return true;
            }
        }
    }
    false
}

/// Score a candidate span per §4.3. `char_count`/`byte_len` describe the span
/// itself; `at_word_start` is whether the span begins a word.
pub fn syllable_score(text: &str, char_count: usize, at_word_start: bool) -> i32 {
    if char_count == 0 {
        return -1000;
    }
    let mut score = 10 * char_count as i32;

    if starts_with_digraph(text) {
        score += 20;
    }
    if starts_with_onset_cluster(text) {
        score += 15;
    }

    let mut chars = text.chars();
    let first = chars.next();
    let second = chars.next();

    if at_word_start {
        if let Some(f) = first {
            if is_consonant(f) {
                if char_count == 1 {
                    score -= 100;
                } else if let Some(s) = second {
                    if is_vowel(s) {
                        score += 25;
                    }
                }
            }
        }
    }

    if let Some(last) = text.chars().last() {
        if is_vowel(last) {
            score += 10;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vowels_and_consonants() {
        assert!(is_vowel('a'));
        assert!(is_vowel('õ'));
        assert!(!is_vowel('ç'));
        assert!(is_consonant('ç'));
        assert!(is_consonant('b'));
        assert!(!is_consonant('a'));
    }

    #[test]
    fn digraphs() {
        assert!(starts_with_digraph("chave"));
        assert!(starts_with_digraph("CHave"));
        assert!(starts_with_digraph("qui"));
        assert!(!starts_with_digraph("ca"));
    }

    #[test]
    fn onset_clusters() {
        assert!(starts_with_onset_cluster("tra"));
        assert!(starts_with_onset_cluster("bla"));
        assert!(!starts_with_onset_cluster("tla"));
        assert!(!starts_with_onset_cluster("a"));
    }

    #[test]
    fn rejects_lone_consonant_at_word_start() {
        assert!(reject_single_char("s", true, None));
        assert!(!reject_single_char("s", false, None));
    }

    #[test]
    fn rejects_consonant_splitting_digraph() {
        assert!(reject_single_char("c", false, Some('h')));
        assert!(!reject_single_char("c", false, Some('a')));
    }

    #[test]
    fn open_syllable_bonus() {
        let open = syllable_score("ca", 2, false);
        let closed = syllable_score("cas", 3, false);
        // "ca" gets +10 open-syllable bonus that "cas" doesn't.
        assert!(open - 20 > closed - 30);
    }

    #[test]
    fn word_start_cv_bonus() {
        let cv = syllable_score("ca", 2, true);
        let cc = syllable_score("ct", 2, true);
        assert!(cv > cc);
    }
}
