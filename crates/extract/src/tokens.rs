//! Free-text to search token conversion.

use std::collections::BTreeSet;

use crate::consts::{MIN_SEARCH_TEXT_LENGTH, STRIPPED_PUNCTUATION_REGEX, WORD_CHARACTER_REGEX, WORD_SEPARATOR_REGEX};

/// Splits free text into an ordered sequence of normalized search tokens.
///
/// Words are split on whitespace and underscores and lowercased. Words that
/// contain a word character also lose any `(`, `)`, `:` and `,` and have
/// typographic apostrophes replaced with ASCII ones; words that don't (pure
/// emoticons such as `:)`) are kept as-is. Order is preserved, and the last
/// token is the one a search will treat as a prefix.
///
/// ```
/// use emojidb_extract::extract_tokens;
///
/// assert_eq!(extract_tokens("Grinning_Face"), vec!["grinning", "face"]);
/// assert_eq!(extract_tokens("(smile) :)"), vec!["smile", ":)"]);
/// assert!(extract_tokens("   ").is_empty());
/// ```
pub fn extract_tokens(text: &str) -> Vec<String> {
    WORD_SEPARATOR_REGEX
        .split(text)
        .map(|word| match WORD_CHARACTER_REGEX.is_match(word) {
            true => STRIPPED_PUNCTUATION_REGEX.replace_all(word, "").replace('’', "'").to_lowercase(),
            false => word.to_lowercase(),
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Splits a search query into the tokens to look up in the token index.
///
/// Like [`extract_tokens()`], but tokens that can never be in the index (too
/// short to be stored) are dropped, unless they're the last one: that one is
/// matched as a prefix, so even a single character narrows the search.
///
/// ```
/// use emojidb_extract::query_tokens;
///
/// assert_eq!(query_tokens("t_rex"), vec!["rex"]);
/// assert_eq!(query_tokens("face g"), vec!["face", "g"]);
/// ```
pub fn query_tokens(query: &str) -> Vec<String> {
    let mut tokens = extract_tokens(query);
    let last = tokens.pop();
    tokens.retain(|token| token.chars().count() >= MIN_SEARCH_TEXT_LENGTH);
    tokens.extend(last);
    tokens
}

/// Normalizes a collection of candidate tokens into the set stored in the
/// token index: lowercased, de-duplicated, sorted, and without anything
/// shorter than two characters.
pub fn normalize_tokens<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|token| token.as_ref().to_lowercase())
        .filter(|token| token.chars().count() >= MIN_SEARCH_TEXT_LENGTH)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("grinning face", &["grinning", "face"])]
    #[case("grinning_face", &["grinning", "face"])]
    #[case("  leading   and trailing ", &["leading", "and", "trailing"])]
    #[case("Face With Tears Of Joy", &["face", "with", "tears", "of", "joy"])]
    #[case("flag: United States", &["flag", "united", "states"])]
    #[case("man’s shoe", &["man's", "shoe"])]
    #[case(":) :-(", &[":)", ":-("])]
    #[case("", &[])]
    fn test_extract_tokens(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(extract_tokens(input), expected);
    }

    #[test]
    fn test_extract_tokens_strips_punctuation_only_from_words() {
        assert_eq!(extract_tokens(":D (:"), vec!["d", "(:"]);
    }

    #[rstest]
    #[case("t_rex", &["rex"])]
    #[case("t rex", &["rex"])]
    #[case("a b c", &["c"])]
    #[case("face g", &["face", "g"])]
    #[case("x", &["x"])]
    #[case("tears of j", &["tears", "of", "j"])]
    #[case("", &[])]
    fn test_query_tokens_drop_unindexable_words(#[case] query: &str, #[case] expected: &[&str]) {
        assert_eq!(query_tokens(query), expected);
    }

    #[test]
    fn test_normalize_tokens() {
        let tokens = normalize_tokens(["Smile", "a", "smile", "face", ":)", "x"]);
        assert_eq!(tokens, vec![":)", "face", "smile"]);
    }
}
