//! 渲染配置
//!
//! 支持 TOML 文件配置、环境变量覆盖和默认值

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RenderError, RenderResult};

/// Default `User-Agent` sent with every page request
pub const DEFAULT_USER_AGENT: &str = concat!("newsletter-render/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Configuration options for newsletter rendering
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Stylesheets to inline, in configured order (earlier files win)
    pub css_files: Vec<PathBuf>,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Site base URL, used for page URLs and for resolving relative images
    pub base_url: Option<String>,
    /// Per-locale site base URLs, keyed by locale (`[languages]` table)
    pub languages: HashMap<String, String>,
    pub embed_images: bool,
    pub convert_visual_attributes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            css_files: Vec::new(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: None,
            languages: HashMap::new(),
            embed_images: false,
            convert_visual_attributes: true,
        }
    }
}

impl RenderConfig {
    /// 从指定 TOML 文件加载配置
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> RenderResult<Self> {
        toml::from_str(content)
            .map_err(|e| RenderError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// 应用环境变量覆盖
    ///
    /// An explicitly set variable that fails to parse is a configuration error.
    pub fn apply_env_overrides(&mut self) -> RenderResult<()> {
        use crate::env::{render, EnvVar};

        if is_set(render::CssFiles::NAME) {
            self.css_files = render::CssFiles::get().map_err(env_error)?;
        }

        if is_set(render::FetchTimeout::NAME) {
            self.fetch_timeout_secs = render::FetchTimeout::get().map_err(env_error)?.as_secs();
        }

        if is_set(render::UserAgent::NAME) {
            self.user_agent = render::UserAgent::get().map_err(env_error)?;
        }

        if is_set(render::BaseUrl::NAME) {
            let base_url = render::BaseUrl::get().map_err(env_error)?;
            tracing::info!("Base URL overridden from environment: {}", base_url);
            self.base_url = Some(base_url);
        }

        if is_set(render::EmbedImages::NAME) {
            self.embed_images = render::EmbedImages::get().map_err(env_error)?;
        }

        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> RenderResult<()> {
        if self.fetch_timeout_secs == 0 {
            return Err(RenderError::Config(
                "Fetch timeout must be greater than 0".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(RenderError::Config("User-Agent cannot be empty".to_string()));
        }

        if let Some(base_url) = &self.base_url {
            Url::parse(base_url)
                .map_err(|e| RenderError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        } else if !self.languages.is_empty() {
            return Err(RenderError::Config(
                "Language base URLs require a default base_url".to_string(),
            ));
        }

        self.language_base_urls()?;

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn base_url(&self) -> Option<Url> {
        self.base_url.as_deref().and_then(|url| Url::parse(url).ok())
    }

    /// Parses the `[languages]` table into per-locale base URLs
    pub fn language_base_urls(&self) -> RenderResult<Vec<(String, Url)>> {
        self.languages
            .iter()
            .map(|(locale, url)| {
                Url::parse(url)
                    .map(|parsed| (locale.clone(), parsed))
                    .map_err(|e| {
                        RenderError::Config(format!(
                            "Invalid base URL {} for language {}: {}",
                            url, locale, e
                        ))
                    })
            })
            .collect()
    }
}

fn is_set(name: &str) -> bool {
    std::env::var_os(name).is_some()
}

fn env_error(error: crate::env::EnvError) -> RenderError {
    RenderError::Config(error.to_string())
}
