//! DOM 修剪
//!
//! 内联之后：删除 `display: none` 的元素（部分邮件客户端会无视隐藏样式而显示它们），
//! 并移除只为提供已内联声明而存在的 class。

use std::collections::HashSet;

use kuchiki::traits::*;
use kuchiki::NodeRef;

use crate::parsers::css::{class_selector_names, parse_declarations};

use super::dom::{get_node_attr, set_node_attr};
use super::inliner::InlinedDocument;
use super::utils::split_classes;

/// Runs both pruning passes and hands back the document
pub fn prune(inlined: InlinedDocument) -> NodeRef {
    let InlinedDocument {
        document,
        inlined_selectors,
        retained_css,
    } = inlined;

    let removed = remove_elements_with_display_none(&document);
    let cleaned = remove_redundant_classes(&document, &inlined_selectors, &retained_css);

    tracing::debug!(
        "Removed {} hidden elements and {} redundant classes",
        removed,
        cleaned
    );

    document
}

/// Whether the element's inline style ends up hiding it
pub fn is_display_none(style: &str) -> bool {
    parse_declarations(style)
        .iter()
        .filter(|declaration| declaration.property == "display")
        .last()
        .is_some_and(|declaration| declaration.value.eq_ignore_ascii_case("none"))
}

/// 删除所有内联样式为 `display: none` 的元素，返回删除的数量
pub fn remove_elements_with_display_none(document: &NodeRef) -> usize {
    let hidden: Vec<NodeRef> = document
        .inclusive_descendants()
        .elements()
        .filter(|element| {
            element
                .attributes
                .borrow()
                .get("style")
                .is_some_and(is_display_none)
        })
        .map(|element| element.as_node().clone())
        .collect();

    for node in &hidden {
        node.detach();
    }

    hidden.len()
}

/// 移除被内联选择器消费、且保留的 CSS 中不再引用的 class，返回移除的数量
///
/// Classes that no stylesheet mentions are author classes and stay.
pub fn remove_redundant_classes(
    document: &NodeRef,
    inlined_selectors: &[String],
    retained_css: &str,
) -> usize {
    let still_needed = class_selector_names(retained_css);
    let redundant: HashSet<String> = inlined_selectors
        .iter()
        .flat_map(|selector| class_selector_names(selector))
        .filter(|class_name| !still_needed.contains(class_name))
        .collect();

    if redundant.is_empty() {
        return 0;
    }

    let mut removed = 0;

    for element in document.inclusive_descendants().elements() {
        let node = element.as_node();
        let class_attr = match get_node_attr(node, "class") {
            Some(class_attr) => class_attr,
            None => continue,
        };

        let kept: Vec<&str> = split_classes(&class_attr)
            .filter(|class_name| !redundant.contains(*class_name))
            .collect();
        let total = split_classes(&class_attr).count();

        if kept.len() == total {
            continue;
        }

        removed += total - kept.len();
        if kept.is_empty() {
            set_node_attr(node, "class", None);
        } else {
            set_node_attr(node, "class", Some(kept.join(" ")));
        }
    }

    removed
}
