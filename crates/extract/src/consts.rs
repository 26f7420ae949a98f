use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Tokens shorter than this are never written to the token index. They can
/// still be *searched* for, since the final query token is a prefix match.
pub(crate) const MIN_SEARCH_TEXT_LENGTH: usize = 2;

// Words are separated by whitespace or underscores (`grinning_face`).
regex!(WORD_SEPARATOR_REGEX, r"[\s_]+");
// Punctuation stripped from words that contain at least one word character.
regex!(STRIPPED_PUNCTUATION_REGEX, r"[)(:,]");
// Plain ASCII word character, as opposed to an emoticon like `:)` or `</3`.
regex!(WORD_CHARACTER_REGEX, r"[A-Za-z0-9_]");
