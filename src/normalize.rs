//! Text canonicalization for accent- and case-insensitive matching.
//!
//! Every event field and every query goes through [`normalize`] before any
//! comparison happens, so "Maratón", "MARATÓN" and "maraton" all compare equal.

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block. Marks outside it are left alone.
const COMBINING_DIACRITICS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Canonicalize `text` for matching.
///
/// Lower-cases, strips Latin diacritics (á → a, ñ → n, ü → u), collapses
/// whitespace runs to a single space and trims both ends. Characters it does
/// not know about pass through unchanged: the text is recomposed after the
/// diacritics are dropped, so Hangul syllables and voiced kana survive.
///
/// The output is a fixed point: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Example
/// ```
/// use race_finder::normalize;
///
/// assert_eq!(normalize("  Maratón   de\tValència "), "maraton de valencia");
/// ```
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered
        .nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c))
        .map(fold_letter)
        .nfc()
    {
        if ch.is_whitespace() {
            // Leading whitespace never emits a separator
            pending_space = !result.is_empty();
            continue;
        }
        if pending_space {
            result.push(' ');
            pending_space = false;
        }
        result.push(ch);
    }

    result
}

/// Latin letters whose stroke is not a combining mark, so NFD leaves them intact.
fn fold_letter(ch: char) -> char {
    match ch {
        'ø' => 'o',
        'ł' => 'l',
        'đ' => 'd',
        'ħ' => 'h',
        _ => ch,
    }
}
