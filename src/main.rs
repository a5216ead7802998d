use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use newsletter_render::config::RenderConfig;
use newsletter_render::core::NewsletterRenderer;
use newsletter_render::env::{core::LogLevel, EnvVar};
use newsletter_render::error::{RenderError, RenderResult};
use newsletter_render::network::PageReference;
use newsletter_render::utils::Url;

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(
    name = "newsletter-render",
    version,
    about = "Render a CMS page into email-ready newsletter HTML"
)]
struct Cli {
    /// URL or local HTML file to render
    #[arg(required_unless_present = "page", conflicts_with = "page")]
    target: Option<String>,

    /// Page id to render through the site router (requires a base URL)
    #[arg(long)]
    page: Option<String>,

    /// Page locale, falls back to the default language when the site has none
    #[arg(long, requires = "page")]
    locale: Option<String>,

    /// Render the preview variant of the page
    #[arg(long, requires = "page")]
    preview: bool,

    /// Stylesheet to inline, repeatable; earlier files win
    #[arg(long = "css", value_name = "PATH")]
    css_files: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    #[arg(long)]
    user_agent: Option<String>,

    /// Site base URL, used for page URLs and relative images
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Embed images as data URLs
    #[arg(long)]
    embed_images: bool,

    /// Do not mirror inlined CSS into HTML attributes
    #[arg(long)]
    no_visual_attributes: bool,

    /// Only log errors
    #[arg(long, short)]
    silent: bool,

    /// Write the result to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.silent);

    if let Err(e) = run(&cli) {
        print_error_message(&e.to_string());
        process::exit(1);
    }
}

fn init_logging(silent: bool) {
    let level = if silent {
        "error".to_string()
    } else {
        LogLevel::get_or_default("info".to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> RenderResult<()> {
    let config = build_config(cli)?;
    let renderer = NewsletterRenderer::from_config(&config)?;

    let html = match (&cli.page, &cli.target) {
        (Some(page_id), _) => render_page(&renderer, cli, page_id)?,
        (None, Some(target)) if target.starts_with("http://") || target.starts_with("https://") => {
            let url = Url::parse(target).map_err(|e| RenderError::invalid_url(target, e))?;
            renderer.render_url(&url)?
        }
        (None, Some(target)) => {
            let markup = fs::read_to_string(Path::new(target))?;
            renderer.render_html(&markup, None)?
        }
        (None, None) => return Err(RenderError::Config("Nothing to render".to_string())),
    };

    match &cli.output {
        Some(path) => fs::write(path, html)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// Configuration file, then environment, then flags
fn build_config(cli: &Cli) -> RenderResult<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    config.apply_env_overrides()?;

    if !cli.css_files.is_empty() {
        config.css_files = cli.css_files.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.fetch_timeout_secs = timeout;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = Some(base_url.clone());
    }
    if cli.embed_images {
        config.embed_images = true;
    }
    if cli.no_visual_attributes {
        config.convert_visual_attributes = false;
    }

    config.validate()?;
    Ok(config)
}

fn render_page(renderer: &NewsletterRenderer, cli: &Cli, page_id: &str) -> RenderResult<String> {
    let mut page = PageReference::new(page_id);
    if let Some(locale) = &cli.locale {
        page = page.with_locale(locale);
    }
    if cli.preview {
        page = page.preview();
    }

    match renderer.render_page(&page) {
        Err(RenderError::SiteNotFound { locale, .. }) => {
            tracing::warn!("No site for locale {}, using the default language", locale);
            renderer.render_page(&page.without_locale())
        }
        result => result,
    }
}

fn print_error_message(msg: &str) {
    eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
}
