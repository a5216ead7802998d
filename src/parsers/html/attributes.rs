//! CSS 到 HTML 视觉属性的转换
//!
//! 一些老旧的邮件客户端忽略 `style` 属性，但仍然识别 `bgcolor`、`align`、
//! `cellspacing` 等 HTML 属性。这里根据内联后的声明补充这些属性。

use kuchiki::traits::*;
use kuchiki::NodeRef;

use crate::parsers::css::{parse_declarations, Declaration};

use super::dom::{get_node_name, set_node_attr};
use super::utils::WHITESPACES;

const BGCOLOR_NODES: &[&str] = &["body", "table", "tr", "td", "th"];
const TEXT_ALIGN_NODES: &[&str] = &["p", "div", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6"];
const TEXT_ALIGN_VALUES: &[&str] = &["left", "right", "center", "justify"];
const FLOAT_NODES: &[&str] = &["table", "img"];
const FLOAT_VALUES: &[&str] = &["left", "right"];
const DIMENSION_NODES: &[&str] = &["table", "img", "td"];
const BORDER_NODES: &[&str] = &["table", "img"];

/// Adds visual HTML attributes for every element with an inline style
///
/// Returns the number of attributes written.
pub fn convert_css_to_visual_attributes(document: &NodeRef) -> usize {
    let mut written = 0;

    for element in document.inclusive_descendants().elements() {
        let style = match element.attributes.borrow().get("style") {
            Some(style) => style.to_string(),
            None => continue,
        };

        let node = element.as_node();
        let node_name = match get_node_name(node) {
            Some(name) => name,
            None => continue,
        };

        for declaration in parse_declarations(&style) {
            if let Some((attr_name, attr_value)) = visual_attribute(&node_name, &declaration) {
                set_node_attr(node, attr_name, Some(attr_value));
                written += 1;
            }
        }
    }

    written
}

/// Maps one declaration on one element to an HTML attribute, if there is one
pub fn visual_attribute(node_name: &str, declaration: &Declaration) -> Option<(&'static str, String)> {
    let value = declaration.value.trim();
    let lowercased = value.to_ascii_lowercase();

    match declaration.property.as_str() {
        "background-color" if BGCOLOR_NODES.contains(&node_name) => {
            Some(("bgcolor", value.to_string()))
        }
        "background" if BGCOLOR_NODES.contains(&node_name) => value
            .split(WHITESPACES)
            .find(|part| looks_like_color(part))
            .map(|color| ("bgcolor", color.to_string())),
        "text-align"
            if TEXT_ALIGN_NODES.contains(&node_name)
                && TEXT_ALIGN_VALUES.contains(&lowercased.as_str()) =>
        {
            Some(("align", lowercased))
        }
        "float"
            if FLOAT_NODES.contains(&node_name) && FLOAT_VALUES.contains(&lowercased.as_str()) =>
        {
            Some(("align", lowercased))
        }
        "border-spacing" if node_name == "table" => {
            strip_px(&lowercased).map(|spacing| ("cellspacing", spacing))
        }
        "width" | "height" if DIMENSION_NODES.contains(&node_name) => {
            let attr_name = if declaration.property == "width" {
                "width"
            } else {
                "height"
            };
            if lowercased.ends_with('%') {
                Some((attr_name, lowercased))
            } else {
                strip_px(&lowercased).map(|size| (attr_name, size))
            }
        }
        "margin" if node_name == "table" && has_auto_horizontal_margin(&lowercased) => {
            Some(("align", "center".to_string()))
        }
        "border"
            if BORDER_NODES.contains(&node_name)
                && matches!(lowercased.as_str(), "none" | "0" | "0px") =>
        {
            Some(("border", "0".to_string()))
        }
        _ => None,
    }
}

fn looks_like_color(value: &str) -> bool {
    let value = value.to_ascii_lowercase();

    (value.starts_with('#') && value.len() > 1)
        || value.starts_with("rgb(")
        || value.starts_with("rgba(")
        || (!value.is_empty()
            && value.chars().all(|c| c.is_ascii_alphabetic())
            && !matches!(
                value.as_str(),
                "none" | "repeat" | "no-repeat" | "repeat-x" | "repeat-y" | "fixed" | "scroll"
                    | "left" | "right" | "top" | "bottom" | "center" | "inherit" | "initial"
            ))
}

/// `12px` → `12`; anything that is not a plain pixel number is rejected
fn strip_px(value: &str) -> Option<String> {
    let number = value.strip_suffix("px").unwrap_or(value).trim();

    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        Some(number.to_string())
    } else {
        None
    }
}

fn has_auto_horizontal_margin(margin: &str) -> bool {
    let parts: Vec<&str> = margin.split(WHITESPACES).filter(|p| !p.is_empty()).collect();

    match parts.as_slice() {
        [all] => *all == "auto",
        [_, horizontal] | [_, horizontal, _] => *horizontal == "auto",
        [_, right, _, left] => *right == "auto" && *left == "auto",
        _ => false,
    }
}
