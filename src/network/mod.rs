//! # 网络模块
//!
//! - `session` - 页面与资源抓取（`PageFetcher` 及其 HTTP 实现）
//! - `router` - 页面地址生成（`PageUriGenerator` 及站点路由）

pub mod router;
pub mod session;

pub use router::{PageReference, PageUriGenerator, SiteRouter, NEWSLETTER_VIEW_TYPE};
pub use session::{PageFetcher, Session};
