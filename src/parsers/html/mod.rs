//! HTML 处理模块
//!
//! - `dom`: 解析、规范化与基础 DOM 操作
//! - `inliner`: CSS 内联
//! - `pruner`: 隐藏元素与多余 class 的清理
//! - `attributes`: CSS 到 HTML 视觉属性的转换
//! - `images`: 图片嵌入
//! - `serializer`: 序列化功能
//! - `utils`: 基础工具函数和常量

pub mod attributes;
pub mod dom;
pub mod images;
pub mod inliner;
pub mod pruner;
pub mod serializer;
pub mod utils;

pub use attributes::convert_css_to_visual_attributes;
pub use dom::{create_element, get_node_attr, get_node_name, html_to_dom, set_node_attr};
pub use images::embed_images;
pub use inliner::{inline_css, InlinedDocument};
pub use pruner::{prune, remove_elements_with_display_none, remove_redundant_classes};
pub use serializer::serialize_document;
pub use utils::WHITESPACES;
