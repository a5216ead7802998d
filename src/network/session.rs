//! HTTP 会话：抓取待渲染的页面以及需要嵌入的图片

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use url::Url;

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};

/// Redirects followed before a fetch is given up
pub const MAX_REDIRECTS: usize = 10;

/// 远程内容获取接口
///
/// The pipeline only ever talks to this trait, so tests and embedders can
/// serve pages from memory instead of the network.
pub trait PageFetcher {
    /// Fetches a page and returns its body as text
    fn fetch_page(&self, url: &Url) -> RenderResult<String>;

    /// Fetches a binary asset and returns its bytes and media type
    fn fetch_asset(&self, url: &Url) -> RenderResult<(Vec<u8>, String)>;
}

/// Blocking HTTP session
///
/// Every request carries `Cache-Control: no-cache` so that the CMS renders
/// the page afresh instead of handing out a cached variant.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new(user_agent: &str, timeout: Duration) -> RenderResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| {
                RenderError::Config(format!("Invalid User-Agent {:?}: {}", user_agent, e))
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| RenderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Session { client })
    }

    pub fn from_config(config: &RenderConfig) -> RenderResult<Self> {
        Self::new(&config.user_agent, config.fetch_timeout())
    }

    fn get(&self, url: &Url) -> RenderResult<Response> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| RenderError::fetch(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RenderError::fetch(url, format!("HTTP status {}", status)));
        }

        Ok(response)
    }
}

impl PageFetcher for Session {
    fn fetch_page(&self, url: &Url) -> RenderResult<String> {
        let body = self
            .get(url)?
            .text()
            .map_err(|e| RenderError::fetch(url, e))?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    fn fetch_asset(&self, url: &Url) -> RenderResult<(Vec<u8>, String)> {
        let response = self.get(url)?;

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| parse_content_type(value).0)
            .filter(|media_type| !media_type.is_empty())
            .unwrap_or_else(|| detect_media_type_by_file_name(url.path()));

        let data = response
            .bytes()
            .map_err(|e| RenderError::fetch(url, e))?
            .to_vec();

        Ok((data, media_type))
    }
}

/// Splits a `Content-Type` value into media type and charset
pub fn parse_content_type(content_type: &str) -> (String, Option<String>) {
    let mut parts = content_type.split(';');
    let media_type = parts.next().unwrap_or("").trim().to_lowercase();

    let charset = parts.find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    });

    (media_type, charset)
}

/// Guesses an image media type from the file extension
pub fn detect_media_type_by_file_name(filename: &str) -> String {
    let filename_lowercased = filename.to_lowercase();
    let extension = filename_lowercased.rsplit('.').next().unwrap_or("");

    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
    .to_string()
}
