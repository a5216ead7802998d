//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - 占位符还原（`%7B...%7D` → `{...}`）
//! - 标签间空白清理
//! - URL解析与数据URL创建
//!
//! # 模块组织
//!
//! - `placeholder` - 还原被百分号编码的邮件合并占位符
//! - `cleaner` - 制表符替换、标签间空白折叠
//! - `url` - URL处理、数据URL等工具函数

pub mod cleaner;
pub mod placeholder;
pub mod url;

// Re-export commonly used items for convenience
pub use cleaner::clean_content;
pub use placeholder::restore_placeholders;
pub use url::{create_data_url, is_data_url, resolve_url, Url};
