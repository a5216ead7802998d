//! CSS 解析器模块
//!
//! 此模块把样式表拆分为可内联的样式规则和需要保留的 CSS，并解析声明块。
//! 该模块使用 cssparser 库做词法分析，因此字符串、`url()` 和嵌套块中的
//! `;`、`,`、`{` 不会被误判为分隔符。
//!
//! # 主要功能
//!
//! - **规则拆分**: 按选择器拆分样式规则，记录源码顺序
//! - **保留规则**: at-rule（`@media`、`@font-face` 等）以及依赖浏览器运行时状态的
//!   选择器（`:hover`、`::before` 等）原样保留，不做内联
//! - **声明解析**: 解析 `property: value !important` 形式的声明

use std::collections::HashSet;

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

/// 可以在静态文档上求值的伪类
///
/// 其他伪类（`:hover`、`:focus`、`:visited` ...）依赖浏览器运行时状态，
/// 含有它们的选择器会被保留到 `<style>` 中而不是内联。
const INLINABLE_PSEUDO_CLASSES: &[&str] = &[
    "empty",
    "first-child",
    "first-of-type",
    "last-child",
    "last-of-type",
    "not",
    "nth-child",
    "nth-last-child",
    "nth-last-of-type",
    "nth-of-type",
    "only-child",
    "only-of-type",
    "root",
];

/// A single `property: value` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    /// Builds a declaration from a raw value, splitting off `!important`
    ///
    /// Returns `None` for an empty value.
    pub fn new(property: &str, raw_value: &str) -> Option<Declaration> {
        let (value, important) = split_important(raw_value);

        if value.is_empty() || property.is_empty() {
            return None;
        }

        Some(Declaration {
            property: property.to_ascii_lowercase(),
            value,
            important,
        })
    }

    /// Serializes the declaration the way it ends up in a `style` attribute
    pub fn to_css(&self) -> String {
        format!("{}: {};", self.property, self.value)
    }
}

/// A style rule with exactly one inlinable selector
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    /// Position in the combined stylesheet, later rules win on equal specificity
    pub order: usize,
}

/// Result of splitting a stylesheet
#[derive(Debug, Clone, Default)]
pub struct ParsedStylesheet {
    pub rules: Vec<StyleRule>,
    /// CSS that cannot be inlined, in source order
    pub retained: Vec<String>,
}

impl ParsedStylesheet {
    pub fn retained_css(&self) -> String {
        self.retained.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.retained.is_empty()
    }
}

/// 把样式表拆分为可内联规则与保留的 CSS
///
/// `@charset` is dropped, every other at-rule is retained verbatim. A rule
/// whose selector list mixes inlinable and non-inlinable selectors is split:
/// the former become [`StyleRule`]s, the latter are retained with the same
/// declaration block.
pub fn parse_stylesheet(css: &str) -> ParsedStylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut sheet = ParsedStylesheet::default();

    let mut prelude_start = parser.position();
    let mut at_rule: Option<String> = None;
    let mut has_prelude = false;
    let mut order = 0;

    loop {
        let token_start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) | Token::Comment(_) | Token::CDO | Token::CDC if !has_prelude => {
                prelude_start = parser.position();
            }
            Token::AtKeyword(ref name) if !has_prelude => {
                at_rule = Some(name.to_ascii_lowercase());
                has_prelude = true;
            }
            Token::Semicolon => {
                // Statement at-rules such as @import
                if let Some(name) = at_rule.take() {
                    if name != "charset" {
                        let statement = parser.slice(prelude_start..parser.position());
                        sheet.retained.push(statement.trim().to_string());
                    }
                }
                has_prelude = false;
                prelude_start = parser.position();
            }
            Token::CurlyBracketBlock => {
                let prelude = parser.slice(prelude_start..token_start).trim().to_string();
                let body = consume_block(&mut parser);

                match at_rule.take() {
                    Some(name) => {
                        if name != "charset" {
                            let rule = parser.slice_from(prelude_start);
                            sheet.retained.push(rule.trim().to_string());
                        }
                    }
                    None => {
                        let declarations = parse_declarations(&body);

                        for selector in split_selector_list(&prelude) {
                            if is_inlinable_selector(&selector) {
                                sheet.rules.push(StyleRule {
                                    selector,
                                    declarations: declarations.clone(),
                                    order,
                                });
                                order += 1;
                            } else {
                                sheet
                                    .retained
                                    .push(format!("{} {{{}}}", selector, body.trim_end()));
                            }
                        }
                    }
                }

                has_prelude = false;
                prelude_start = parser.position();
            }
            token => {
                if opens_block(&token) {
                    consume_block(&mut parser);
                }
                has_prelude = true;
            }
        }
    }

    sheet
}

/// 解析声明块（样式规则主体或 `style` 属性）
///
/// Invalid declarations are skipped, the rest of the block is still parsed.
pub fn parse_declarations(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();

    while !parser.is_exhausted() {
        let result = parser.parse_until_after(Delimiter::Semicolon, |input| {
            let property = input.expect_ident()?.to_string();
            input.expect_colon()?;

            let start = input.position();
            while input.next_including_whitespace_and_comments().is_ok() {}

            Ok::<_, ParseError<'_, ()>>((property, input.slice_from(start).to_string()))
        });

        if let Ok((property, value)) = result {
            if let Some(declaration) = Declaration::new(&property, &value) {
                declarations.push(declaration);
            }
        }
    }

    declarations
}

/// Splits a selector list at its top-level commas
///
/// Commas inside functional pseudo-classes and attribute selectors are kept.
/// Empty entries are returned as empty strings so that callers can reject them.
pub fn split_selector_list(prelude: &str) -> Vec<String> {
    let mut input = ParserInput::new(prelude);
    let mut parser = Parser::new(&mut input);
    let mut selectors = Vec::new();
    let mut start = parser.position();

    loop {
        let before = parser.position();
        let token = parser.next_including_whitespace_and_comments().ok().cloned();

        match token {
            Some(Token::Comma) => {
                selectors.push(parser.slice(start..before).trim().to_string());
                start = parser.position();
            }
            Some(token) => {
                if opens_block(&token) {
                    consume_block(&mut parser);
                }
            }
            None => {
                selectors.push(parser.slice_from(start).trim().to_string());
                break;
            }
        }
    }

    selectors
}

/// 判断选择器能否在静态文档上求值
///
/// Pseudo-elements and pseudo-classes that need live browser state make a
/// selector non-inlinable. Such selectors are never reported as errors.
pub fn is_inlinable_selector(selector: &str) -> bool {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut previous_was_colon = false;

    loop {
        let token = parser.next_including_whitespace_and_comments().ok().cloned();

        match token {
            None => return true,
            Some(Token::Colon) => {
                if previous_was_colon {
                    // ::pseudo-element
                    return false;
                }
                previous_was_colon = true;
                continue;
            }
            Some(Token::Ident(ref name)) | Some(Token::Function(ref name))
                if previous_was_colon =>
            {
                if !INLINABLE_PSEUDO_CLASSES
                    .iter()
                    .any(|pseudo| name.eq_ignore_ascii_case(pseudo))
                {
                    return false;
                }
            }
            _ => {}
        }

        previous_was_colon = false;
    }
}

/// Collects the class names used by class selectors in `css`
///
/// Only a `.` delimiter directly followed by an identifier counts, so dots in
/// quoted attribute values, numbers and `url()` are ignored. Functional
/// pseudo-classes and rule bodies are searched as well.
pub fn class_selector_names(css: &str) -> HashSet<String> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut names = HashSet::new();

    collect_class_names(&mut parser, &mut names);

    names
}

fn collect_class_names<'i>(parser: &mut Parser<'i, '_>, names: &mut HashSet<String>) {
    let mut after_dot = false;

    while let Ok(token) = parser.next_including_whitespace_and_comments() {
        let token = token.clone();

        match token {
            Token::Ident(ref name) if after_dot => {
                names.insert(name.to_string());
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::CurlyBracketBlock => {
                let _ = parser.parse_nested_block(|block| {
                    collect_class_names(block, names);
                    Ok::<_, ParseError<'i, ()>>(())
                });
            }
            // Attribute selectors never name a class
            _ => {}
        }

        after_dot = matches!(token, Token::Delim('.'));
    }
}

/// Whether the token opens a `[...]`, `(...)`, `{...}` or function block
///
/// The parser skips such a block lazily on the next call, so positions read
/// before the block is consumed point just after the opening bracket.
fn opens_block(token: &Token) -> bool {
    matches!(
        token,
        Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock
    )
}

/// Consumes the block whose opening token was just returned and yields its raw content
fn consume_block<'i>(parser: &mut Parser<'i, '_>) -> String {
    parser
        .parse_nested_block(|block| {
            let start = block.position();
            while block.next_including_whitespace_and_comments().is_ok() {}
            Ok::<_, ParseError<'i, ()>>(block.slice_from(start).to_string())
        })
        .unwrap_or_default()
}

fn split_important(raw_value: &str) -> (String, bool) {
    let value = raw_value.trim();

    if let Some(split_at) = value.len().checked_sub("important".len()) {
        let is_important = value
            .get(split_at..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case("important"));

        if is_important {
            if let Some(rest) = value[..split_at].trim_end().strip_suffix('!') {
                return (rest.trim_end().to_string(), true);
            }
        }
    }

    (value.to_string(), false)
}
