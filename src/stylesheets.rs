//! 样式表来源
//!
//! 样式表按配置顺序给出，但以**相反**顺序拼接：后配置的文件先出现，
//! 因此在选择器优先级相同时，先配置的文件中的规则胜出。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, RenderResult};

/// Supplies the stylesheet paths to inline, in configured order
pub trait StylesheetProvider {
    fn stylesheet_paths(&self) -> Vec<PathBuf>;
}

/// A fixed list of stylesheet files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylesheetFiles {
    paths: Vec<PathBuf>,
}

impl StylesheetFiles {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        StylesheetFiles {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl StylesheetProvider for StylesheetFiles {
    fn stylesheet_paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

/// 读取并拼接样式表
///
/// Missing files are skipped with a warning. A file that exists but cannot
/// be read fails with [`RenderError::Stylesheet`].
pub fn load_stylesheets(paths: &[PathBuf]) -> RenderResult<String> {
    let mut sheets: Vec<String> = Vec::with_capacity(paths.len());

    for path in paths.iter().rev() {
        if let Some(css) = read_stylesheet(path)? {
            sheets.push(css);
        }
    }

    Ok(sheets.join("\n"))
}

fn read_stylesheet(path: &Path) -> RenderResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(css) => {
            tracing::debug!("Loaded stylesheet {} ({} bytes)", path.display(), css.len());
            Ok(Some(css))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("Skipping missing stylesheet {}", path.display());
            Ok(None)
        }
        Err(source) => Err(RenderError::Stylesheet {
            path: path.to_path_buf(),
            source,
        }),
    }
}
