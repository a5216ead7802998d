//! 渲染流水线统一错误处理
//!
//! 所有错误对当前调用都是终止性的：流水线内部不重试、不吞掉错误，
//! 由调用方决定如何提示用户以及是否重试。

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering a newsletter
#[derive(Error, Debug)]
pub enum RenderError {
    /// Bad status, network failure or timeout while fetching a page or asset
    #[error("Failed to load {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A CSS selector that could not be compiled
    #[error("Invalid CSS selector: {selector}")]
    SelectorParse { selector: String },

    /// URL generation produced an unusable address
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No site language is configured for the requested locale
    #[error("No site configured for page {page_id} and locale {locale}")]
    SiteNotFound { page_id: String, locale: String },

    /// A configured stylesheet exists but could not be read
    #[error("Failed to read stylesheet {}: {source}", path.display())]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RenderError {
    pub fn fetch(url: impl ToString, reason: impl ToString) -> Self {
        RenderError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_url(url: impl ToString, reason: impl ToString) -> Self {
        RenderError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
