//! Shared tokenization for all scorers.
//!
//! BLEU, ROUGE and METEOR must see identical token streams for their
//! numbers to be comparable, so the normalization policy is fixed here:
//! Unicode-aware lowercasing, whitespace splitting, and stripping of
//! leading/trailing non-alphanumeric characters from each token. Tokens
//! that are pure punctuation are dropped.

/// Tokenize text into lowercase word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|raw| {
            let stripped = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if stripped.is_empty() {
                None
            } else {
                Some(stripped.to_lowercase())
            }
        })
        .collect()
}

/// Split text into sentences for ROUGE-Lsum.
///
/// Boundaries are newlines and terminal `.`, `!`, `?`. Blank segments are
/// discarded; text without any boundary comes back as a single sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        match c {
            '.' | '!' | '?' | '\n' => {
                if !current.trim().is_empty() {
                    sentences.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }

    sentences
}

/// Extract n-grams with multiplicity from a token sequence.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<Vec<String>> {
    if n == 0 || tokens.len() < n {
        return vec![];
    }
    tokens.windows(n).map(|window| window.to_vec()).collect()
}
