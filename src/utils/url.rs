use base64::{prelude::BASE64_STANDARD, Engine};
pub use url::Url;

use crate::error::{RenderError, RenderResult};

/// Checks whether the given attribute value already is a data URL
pub fn is_data_url(value: &str) -> bool {
    value.trim_start().to_ascii_lowercase().starts_with("data:")
}

/// Resolves `to` against `from`, absolute URLs are returned as they are
pub fn resolve_url(from: &Url, to: &str) -> RenderResult<Url> {
    match Url::parse(to.trim()) {
        Ok(parsed_url) => Ok(parsed_url),
        Err(_) => from
            .join(to.trim())
            .map_err(|e| RenderError::invalid_url(to, e)),
    }
}

/// Builds a `data:` URL carrying the given payload as base64
pub fn create_data_url(media_type: &str, data: &[u8]) -> String {
    let media_type = media_type.split(';').next().unwrap_or("").trim();
    let media_type = if media_type.is_empty() {
        "application/octet-stream"
    } else {
        media_type
    };

    format!("data:{};base64,{}", media_type, BASE64_STANDARD.encode(data))
}
