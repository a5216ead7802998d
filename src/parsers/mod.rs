//! # 解析器模块
//!
//! - `html` - HTML 文档解析、CSS 内联与 DOM 修剪
//! - `css` - 样式表拆分与声明解析

pub mod css;
pub mod html;

pub use css::{parse_declarations, parse_stylesheet, Declaration, ParsedStylesheet, StyleRule};
pub use html::{html_to_dom, inline_css, prune, serialize_document};
