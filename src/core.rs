//! 新闻邮件渲染流水线
//!
//! 抓取 → 规范化 → 内联 → 修剪 → 序列化 → 还原占位符 → 清理。
//! 各阶段严格线性执行，任何一步失败都会中止整个渲染并返回错误，
//! 不会返回部分结果。

use std::fmt;

use url::Url;

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::network::router::{PageReference, PageUriGenerator, SiteRouter, NEWSLETTER_VIEW_TYPE};
use crate::network::session::{PageFetcher, Session};
use crate::parsers::html::{
    convert_css_to_visual_attributes, embed_images, html_to_dom, inline_css, prune,
    serialize_document,
};
use crate::stylesheets::{load_stylesheets, StylesheetFiles, StylesheetProvider};
use crate::utils::{clean_content, restore_placeholders};

/// Stages of one render, in the order they are passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderStage {
    Fetched,
    Normalized,
    Inlined,
    Pruned,
    Serialized,
    PlaceholdersRestored,
    Cleaned,
    Done,
}

impl RenderStage {
    pub fn name(&self) -> &'static str {
        match self {
            RenderStage::Fetched => "fetched",
            RenderStage::Normalized => "normalized",
            RenderStage::Inlined => "inlined",
            RenderStage::Pruned => "pruned",
            RenderStage::Serialized => "serialized",
            RenderStage::PlaceholdersRestored => "placeholders-restored",
            RenderStage::Cleaned => "cleaned",
            RenderStage::Done => "done",
        }
    }

    /// The stage that follows, `None` once the render is done
    pub fn next(&self) -> Option<RenderStage> {
        match self {
            RenderStage::Fetched => Some(RenderStage::Normalized),
            RenderStage::Normalized => Some(RenderStage::Inlined),
            RenderStage::Inlined => Some(RenderStage::Pruned),
            RenderStage::Pruned => Some(RenderStage::Serialized),
            RenderStage::Serialized => Some(RenderStage::PlaceholdersRestored),
            RenderStage::PlaceholdersRestored => Some(RenderStage::Cleaned),
            RenderStage::Cleaned => Some(RenderStage::Done),
            RenderStage::Done => None,
        }
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional stages and the fallback base URL
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub convert_visual_attributes: bool,
    pub embed_images: bool,
    /// Used for relative image sources when the page URL is unknown
    pub base_url: Option<Url>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            convert_visual_attributes: true,
            embed_images: false,
            base_url: None,
        }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        RenderOptions {
            convert_visual_attributes: config.convert_visual_attributes,
            embed_images: config.embed_images,
            base_url: config.base_url(),
        }
    }
}

/// 渲染器：持有抓取、路由和样式表来源，渲染之间不共享可变状态
pub struct NewsletterRenderer {
    fetcher: Box<dyn PageFetcher + Send + Sync>,
    router: Option<Box<dyn PageUriGenerator + Send + Sync>>,
    stylesheets: Box<dyn StylesheetProvider + Send + Sync>,
    options: RenderOptions,
}

impl NewsletterRenderer {
    pub fn new<F, S>(fetcher: F, stylesheets: S) -> Self
    where
        F: PageFetcher + Send + Sync + 'static,
        S: StylesheetProvider + Send + Sync + 'static,
    {
        NewsletterRenderer {
            fetcher: Box::new(fetcher),
            router: None,
            stylesheets: Box::new(stylesheets),
            options: RenderOptions::default(),
        }
    }

    pub fn with_router<R>(mut self, router: R) -> Self
    where
        R: PageUriGenerator + Send + Sync + 'static,
    {
        self.router = Some(Box::new(router));
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// 根据配置创建渲染器（HTTP 会话、样式表列表，以及配置了根地址时的站点路由和各语言根地址）
    pub fn from_config(config: &RenderConfig) -> RenderResult<Self> {
        config.validate()?;

        let renderer = NewsletterRenderer::new(
            Session::from_config(config)?,
            StylesheetFiles::new(config.css_files.clone()),
        )
        .with_options(RenderOptions::from(config));

        let base_url = match config.base_url() {
            Some(base_url) => base_url,
            None => return Ok(renderer),
        };

        let router = config
            .language_base_urls()?
            .into_iter()
            .fold(SiteRouter::new(base_url), |router, (locale, url)| {
                router.with_language(locale, url)
            });

        Ok(renderer.with_router(router))
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Generates the page URL, fetches it and renders the result
    pub fn render_page(&self, page: &PageReference) -> RenderResult<String> {
        let router = self.router.as_ref().ok_or_else(|| {
            RenderError::Config(format!("Cannot render {}: no site router configured", page))
        })?;

        let url = router.generate_uri(page, NEWSLETTER_VIEW_TYPE)?;
        self.render_url(&url)
    }

    /// Fetches `url` and renders the result
    pub fn render_url(&self, url: &Url) -> RenderResult<String> {
        tracing::info!("Rendering newsletter from {}", url);

        let html = self.fetcher.fetch_page(url)?;
        self.run_pipeline(&html, Some(url))
    }

    /// Renders markup that was fetched already
    ///
    /// `page_url` is used for resolving relative image sources.
    pub fn render_html(&self, html: &str, page_url: Option<&Url>) -> RenderResult<String> {
        tracing::info!("Rendering newsletter from {} bytes of markup", html.len());

        self.run_pipeline(html, page_url)
    }

    fn run_pipeline(&self, html: &str, page_url: Option<&Url>) -> RenderResult<String> {
        let mut stage = RenderStage::Fetched;
        enter(stage);

        let stylesheet_paths = self.stylesheets.stylesheet_paths();

        let markup = if stylesheet_paths.is_empty() && !self.options.embed_images {
            tracing::debug!("No stylesheets configured, skipping DOM stages");
            html.to_string()
        } else {
            let css = load_stylesheets(&stylesheet_paths)?;
            self.transform_document(html, &css, !stylesheet_paths.is_empty(), page_url, &mut stage)?
        };

        stage = advance_to(stage, RenderStage::PlaceholdersRestored);
        let markup = restore_placeholders(&markup);

        stage = advance_to(stage, RenderStage::Cleaned);
        let markup = clean_content(&markup);

        advance_to(stage, RenderStage::Done);
        tracing::info!("Rendered newsletter ({} bytes)", markup.len());

        Ok(markup)
    }

    /// Runs the DOM stages and returns the serialized document
    fn transform_document(
        &self,
        html: &str,
        css: &str,
        inline: bool,
        page_url: Option<&Url>,
        stage: &mut RenderStage,
    ) -> RenderResult<String> {
        let document = html_to_dom(html);
        *stage = advance_to(*stage, RenderStage::Normalized);

        let document = if inline {
            let inlined = inline_css(document, css)?;
            *stage = advance_to(*stage, RenderStage::Inlined);

            let document = prune(inlined);
            *stage = advance_to(*stage, RenderStage::Pruned);

            if self.options.convert_visual_attributes {
                let converted = convert_css_to_visual_attributes(&document);
                tracing::debug!("Added {} visual attributes", converted);
            }

            document
        } else {
            document
        };

        if self.options.embed_images {
            let base_url = page_url.or(self.options.base_url.as_ref());
            embed_images(&document, base_url, self.fetcher.as_ref())?;
        }

        let markup = serialize_document(&document)?;
        *stage = advance_to(*stage, RenderStage::Serialized);

        Ok(markup)
    }
}

fn enter(stage: RenderStage) {
    tracing::debug!("Render stage: {}", stage);
}

/// Moves on to `target`, logging every stage passed on the way
///
/// Stages before `target` were skipped by the pipeline and are logged as such.
fn advance_to(stage: RenderStage, target: RenderStage) -> RenderStage {
    let passed = stages_between(stage, target);

    let reached = match passed.split_last() {
        Some((reached, skipped)) => {
            for skipped_stage in skipped {
                tracing::debug!("Render stage skipped: {}", skipped_stage);
            }
            *reached
        }
        None => stage,
    };

    enter(reached);
    reached
}

/// Stages after `from` up to and including `to`
fn stages_between(from: RenderStage, to: RenderStage) -> Vec<RenderStage> {
    let mut stages = Vec::new();
    let mut stage = from;

    while stage < to {
        match stage.next() {
            Some(next) => {
                stages.push(next);
                stage = next;
            }
            None => break,
        }
    }

    stages
}
