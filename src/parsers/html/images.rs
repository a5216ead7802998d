//! 图片嵌入
//!
//! 把 `<img src>` 指向的远程图片下载下来，替换为 data URL，
//! 这样邮件不依赖收件人加载外部图片。

use kuchiki::traits::*;
use kuchiki::NodeRef;
use url::Url;

use crate::error::{RenderError, RenderResult};
use crate::network::session::PageFetcher;
use crate::utils::url::{create_data_url, is_data_url, resolve_url};

use super::dom::{get_node_attr, set_node_attr};

/// Replaces every remote `<img src>` with a data URL, returns how many were embedded
///
/// Relative sources are resolved against `base_url`; without one only
/// absolute sources can be embedded. The first failed download aborts the
/// whole operation.
pub fn embed_images(
    document: &NodeRef,
    base_url: Option<&Url>,
    fetcher: &dyn PageFetcher,
) -> RenderResult<usize> {
    let images: Vec<NodeRef> = document
        .inclusive_descendants()
        .elements()
        .filter(|element| &*element.name.local == "img")
        .map(|element| element.as_node().clone())
        .collect();

    let mut embedded = 0;

    for image in images {
        let src = match get_node_attr(&image, "src") {
            Some(src) if !src.trim().is_empty() && !is_data_url(&src) => src,
            _ => continue,
        };

        let image_url = match base_url {
            Some(base_url) => resolve_url(base_url, &src)?,
            None => Url::parse(src.trim()).map_err(|e| RenderError::invalid_url(&src, e))?,
        };
        let (data, media_type) = fetcher.fetch_asset(&image_url)?;

        set_node_attr(&image, "src", Some(create_data_url(&media_type, &data)));
        embedded += 1;
    }

    tracing::debug!("Embedded {} images", embedded);

    Ok(embedded)
}
