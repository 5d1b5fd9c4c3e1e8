//! Unicode-aware text normalization.
//!
//! Lengths and slices are measured in extended grapheme clusters so that a
//! user-perceived character such as `é` counts once regardless of how many
//! code points encode it.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Anything that is not a letter, a number or a plain space.
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N} ]").expect("valid non-word pattern"));

/// Lowercase `input`, drop punctuation and other non-word characters, and trim it.
///
/// ```
/// use autocomplete_index::text::normalize;
///
/// assert_eq!(normalize("  Café, Zürich! "), "café zürich");
/// ```
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    NON_WORD.replace_all(&lowered, "").trim().to_string()
}

/// Number of user-perceived characters in `input`.
pub fn length(input: &str) -> usize {
    input.graphemes(true).count()
}

/// Grapheme-indexed slice of `input`.
///
/// `len` of `None` takes everything from `start` to the end. A `start` past
/// the end yields an empty string.
pub fn substring(input: &str, start: usize, len: Option<usize>) -> String {
    let rest = input.graphemes(true).skip(start);
    match len {
        Some(n) => rest.take(n).collect(),
        None => rest.collect(),
    }
}
