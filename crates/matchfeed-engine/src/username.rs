use std::sync::LazyLock;

use regex::Regex;

/// Substrings rejected in Instagram/Telegram usernames shown on profiles
pub const BANNED_WORDS: &[&str] = &[
    "sex", "porn", "sels", "gay", "gaysex", "penis", "xyi", "pizda", "blyat", "suka", "mudak",
];

static USERNAME_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._]+$").expect("valid username regex"));

/// Case-insensitive substring match against [`BANNED_WORDS`]
pub fn contains_banned_word(value: &str) -> bool {
    let lower = value.to_lowercase();
    BANNED_WORDS.iter().any(|word| lower.contains(word))
}

/// Latin letters, digits, dots and underscores only; empty is invalid
pub fn is_valid_username_format(value: &str) -> bool {
    USERNAME_FORMAT.is_match(value)
}
