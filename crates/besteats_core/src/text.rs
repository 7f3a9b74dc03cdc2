//! Locale-aware text folding for favorites search.
//!
//! # Responsibility
//! - Fold names and queries into a comparable form: case-insensitive,
//!   diacritic-insensitive and width-insensitive.
//!
//! # Invariants
//! - Latin letters with diacritics and fullwidth ASCII forms are
//!   transliterated through `deunicode`.
//! - Hangul, kana and CJK ideographs are kept as-is; transliterating them
//!   would let unrelated syllables match through their romanization.

use deunicode::deunicode_char;

/// Folds `value` into its search key.
pub fn fold_key(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii() {
            folded.push(ch.to_ascii_lowercase());
        } else if is_transliterable(ch) {
            match deunicode_char(ch) {
                Some(ascii) => folded.push_str(&ascii.to_lowercase()),
                None => folded.extend(ch.to_lowercase()),
            }
        } else {
            folded.extend(ch.to_lowercase());
        }
    }
    folded
}

fn is_transliterable(ch: char) -> bool {
    matches!(
        ch,
        // Latin-1 supplement letters, Latin Extended-A/B.
        '\u{00C0}'..='\u{024F}'
        // Latin Extended Additional (Vietnamese and friends).
        | '\u{1E00}'..='\u{1EFF}'
        // Fullwidth ASCII variants.
        | '\u{FF01}'..='\u{FF5E}'
    )
}
