//! 占位符还原
//!
//! 邮件投递接口使用 `{NAME}` 形式的占位符做逐收件人替换。
//! HTML/URL 处理会把属性值（通常是链接）中的花括号编码为 `%7B`/`%7D`，
//! 这里把这些片段解码回字面量。

use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

// A span never contains another encoded opening brace, so for `%7Ba%7Bb%7D`
// only the innermost pair is restored. A run of `%` inside a span must be
// followed by something other than `7B`, otherwise `%%7B` would slip through.
const ENCODED_PLACEHOLDER_PATTERN: &str =
    r"%7[Bb](?:[^%\n]|%+(?:[^%7\n]|7[^Bb%\n]))*?%7[Dd]";

fn encoded_placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ENCODED_PLACEHOLDER_PATTERN).unwrap())
}

/// Decodes every percent-encoded `{...}` span back to its literal form
///
/// Only the matched spans are decoded; percent-encoding elsewhere in the
/// document is left as is. Unterminated `%7B` and stray `%7D` stay encoded.
pub fn restore_placeholders(html: &str) -> String {
    encoded_placeholder_regex()
        .replace_all(html, |caps: &Captures| {
            let span = &caps[0];
            match percent_decode_str(span).decode_utf8() {
                Ok(decoded) => decoded.into_owned(),
                // Not valid UTF-8 once decoded, keep the span untouched
                Err(_) => span.to_string(),
            }
        })
        .into_owned()
}

/// Returns true if the document contains anything the restorer would touch
pub fn has_encoded_placeholders(html: &str) -> bool {
    encoded_placeholder_regex().is_match(html)
}
