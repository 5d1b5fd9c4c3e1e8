//! Prefix generation for autocomplete indexing.

use super::normalizer::{length, normalize};
use std::collections::{BTreeSet, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Words that never contribute prefixes.
///
/// Entries are normalized on the way in, so configuration may list them in
/// any case or with punctuation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            words
                .into_iter()
                .map(|word| normalize(word.as_ref()))
                .filter(|word| !word.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Every prefix of every non-stop word in `phrase`, from `min_complete`
/// graphemes up to the whole word.
///
/// Words shorter than `min_complete` contribute nothing. A `min_complete` of
/// zero behaves like one. The set's ordering carries no meaning.
///
/// ```
/// use autocomplete_index::text::{prefixes_for_phrase, StopWords};
///
/// let stop_words = StopWords::new(["the"]);
/// let prefixes = prefixes_for_phrase("The Cat", 2, &stop_words);
/// assert_eq!(prefixes.into_iter().collect::<Vec<_>>(), vec!["ca", "cat"]);
/// ```
pub fn prefixes_for_phrase(
    phrase: &str,
    min_complete: usize,
    stop_words: &StopWords,
) -> BTreeSet<String> {
    let min_complete = min_complete.max(1);
    let normalized = normalize(phrase);

    let mut prefixes = BTreeSet::new();
    for word in normalized.split(' ') {
        if stop_words.contains(word) || length(word) < min_complete {
            continue;
        }
        let mut prefix = String::with_capacity(word.len());
        for (position, grapheme) in word.graphemes(true).enumerate() {
            prefix.push_str(grapheme);
            if position + 1 >= min_complete {
                prefixes.insert(prefix.clone());
            }
        }
    }
    prefixes
}
