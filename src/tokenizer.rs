//! Free-text normalization for rights and flag specifications.
//!
//! User input arrives as argv-style tokens that may contain embedded commas,
//! underscores, mixed case, and multi-word names split across tokens. The
//! tokenizer maps all of that onto a vocabulary of canonical names, which
//! makes it possible to copy+paste rights from a pretty-printed ACL directly
//! into a command line without quoting, escaping, or removing commas.

use std::collections::HashMap;

/// Diagnostic for input that could not be matched against the vocabulary.
///
/// Carries the first unmatched word and the full original input; the dialect
/// adapter maps it onto [`AdminError::BadRights`](crate::AdminError::BadRights)
/// or [`AdminError::BadFlags`](crate::AdminError::BadFlags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unmatched {
    /// The first word that could not be folded into any vocabulary name.
    pub(crate) token: String,
    /// The original tokens, space-joined, exactly as supplied.
    pub(crate) input: String,
}

/// Map free-form tokens onto vocabulary values.
///
/// `vocab` maps a lowercase space-separated name to the value it stands
/// for; names may be several words long and may share prefixes ("read" the
/// bundle vs. "read contents" the right).
///
/// The input is lowercased, space-joined, and split on any run of commas,
/// underscores, or whitespace. Words are then greedily reassembled into the
/// longest known names, with exactly one word of lookahead: after each word,
/// if appending the *next* word would still form a known name, keep
/// accumulating; otherwise emit the accumulated name if it is known. The
/// lookahead resolves the ambiguity between e.g. `["read", "execute"]`
/// (two names) and `["read", "contents"]` (one).
///
/// A non-empty accumulator left over at the end means some words matched
/// nothing, which is reported as [`Unmatched`] naming the first of them.
pub(crate) fn normalize<V: Copy>(
    raw: &[String],
    vocab: &HashMap<String, V>,
) -> Result<Vec<V>, Unmatched> {
    let joined = raw.join(" ").to_lowercase();
    let words: Vec<&str> = joined
        .split(|c: char| c == ',' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect();

    let mut accumulator: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for (i, word) in words.iter().enumerate() {
        accumulator.push(word);
        let phrase = accumulator.join(" ");

        // One word of lookahead: prefer the longer name when it exists.
        if let Some(next) = words.get(i + 1) {
            if vocab.contains_key(&format!("{phrase} {next}")) {
                continue;
            }
        }

        if let Some(&value) = vocab.get(&phrase) {
            out.push(value);
            accumulator.clear();
        }
    }

    if let Some(first) = accumulator.first() {
        return Err(Unmatched {
            token: (*first).to_string(),
            input: raw.join(" "),
        });
    }

    Ok(out)
}
