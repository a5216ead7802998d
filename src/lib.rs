//! # Newsletter Render
//!
//! 把 CMS 页面渲染为可直接交给邮件群发接口的 HTML：抓取页面，内联样式表，
//! 删除隐藏元素与多余的 class，还原被编码的 `{占位符}`，并压缩标签间的空白。
//!
//! ## 模块组织
//!
//! - `core` - 渲染流水线
//! - `config` - 渲染配置（TOML 文件与环境变量）
//! - `env` - 类型安全的环境变量
//! - `error` - 错误类型
//! - `network` - 页面抓取与页面地址生成
//! - `parsers` - HTML 与 CSS 处理
//! - `stylesheets` - 样式表来源
//! - `utils` - 占位符还原、空白清理与 URL 工具

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod network;
pub mod parsers;
pub mod stylesheets;
pub mod utils;

// Re-export commonly used items for convenience
pub use crate::core::{NewsletterRenderer, RenderOptions, RenderStage};
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use network::{PageFetcher, PageReference, PageUriGenerator, Session, SiteRouter};
pub use stylesheets::{load_stylesheets, StylesheetFiles, StylesheetProvider};
pub use utils::{clean_content, restore_placeholders};
