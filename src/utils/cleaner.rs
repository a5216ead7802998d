//! 内容清理
//!
//! 投递接口对多余空白敏感（载荷体积、部分客户端出现可见空隙），
//! 因此在输出前折叠标签之间的空白。

use std::sync::OnceLock;

use regex::Regex;

use crate::parsers::html::utils::WHITESPACES;

fn inter_tag_whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">[ \n\r\x0C]+<").unwrap())
}

/// Replaces tabs with spaces, drops whitespace between tags and trims the document
///
/// Only whitespace strictly between a `>` and the next `<` is removed, text
/// nodes and attribute values keep theirs.
///
/// ```
/// use newsletter_render::utils::clean_content;
///
/// assert_eq!(
///     clean_content("<p>\tHello</p>  \n  <p>World</p>"),
///     "<p> Hello</p><p>World</p>"
/// );
/// ```
pub fn clean_content(html: &str) -> String {
    let html = html.replace('\t', " ");
    let html = inter_tag_whitespace_regex().replace_all(&html, "><");

    html.trim_matches(WHITESPACES).to_string()
}
