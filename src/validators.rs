//! Input validation and mention markup
//!
//! Mentions travel inside post text as `\x01{uid}-{nickname}\x01`; the
//! functions here turn them into links or plain `@nickname` text.
//!
//! # Examples
//!
//! ```
//! use forumkit::validators::{is_valid_nickname, strip_mentions};
//!
//! assert!(is_valid_nickname("rustacean42"));
//! assert_eq!(strip_mentions("hi \x01a1-bob\x01!"), "hi @bob!");
//! ```

use regex::Regex;
use std::sync::LazyLock;

static ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]+$").unwrap());

// `\w` is spelled out: the regex crate's `\w` is Unicode-aware
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9A-Za-z_]+((-[0-9A-Za-z_]+)|(\.[0-9A-Za-z_]+))*@[A-Za-z0-9]+((\.|-)[A-Za-z0-9]+)*\.[A-Za-z0-9]+$",
    )
    .unwrap()
});

static NICKNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\x{4e00}-\x{9fa5}a-zA-Z][\x{4e00}-\x{9fa5}a-zA-Z0-9]+$").unwrap()
});

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x01([a-zA-Z0-9]+)-(.+?)\x01").unwrap());

/// Hex object id
pub fn is_valid_id(input: &str) -> bool {
    ID.is_match(input)
}

pub fn is_valid_email(input: &str) -> bool {
    EMAIL.is_match(input)
}

/// Starts with a CJK ideograph or a letter, followed by at least one more
/// ideograph, letter or digit
pub fn is_valid_nickname(input: &str) -> bool {
    NICKNAME.is_match(input)
}

/// Replaces mention markers with links opening the user's page
pub fn render_mentions(text: &str) -> String {
    MENTION
        .replace_all(text, r#"<a href="javascript:userPage('${1}', '${2}')">@${2}</a>"#)
        .into_owned()
}

/// Replaces mention markers with plain `@nickname`
pub fn strip_mentions(text: &str) -> String {
    MENTION.replace_all(text, "@${2}").into_owned()
}
