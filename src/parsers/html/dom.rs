//! HTML 规范化与基础 DOM 操作
//!
//! 解析是宽松的：任何输入都能得到一棵 HTML5 规则修复过的树，
//! 因此这里没有错误路径。

use html5ever::{namespace_url, ns, LocalName, QualName};
use kuchiki::traits::*;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

/// 将 HTML 字符串解析为规范化的 DOM
///
/// Besides the `<html>`/`<head>`/`<body>` skeleton that tree construction
/// always creates, the document gets an HTML5 doctype and a UTF-8
/// `Content-Type` meta element when it declares no charset itself.
pub fn html_to_dom(html: &str) -> NodeRef {
    let document = kuchiki::parse_html().one(html);

    ensure_doctype(&document);
    ensure_content_type(&document);

    document
}

fn ensure_doctype(document: &NodeRef) {
    if !document.children().any(|child| child.as_doctype().is_some()) {
        document.prepend(NodeRef::new_doctype("html", "", ""));
    }
}

fn ensure_content_type(document: &NodeRef) {
    let head = match document.select_first("head") {
        Ok(head) => head,
        Err(()) => return,
    };

    let declares_charset = head.as_node().descendants().elements().any(|meta| {
        if &*meta.name.local != "meta" {
            return false;
        }
        let attrs = meta.attributes.borrow();
        attrs.contains("charset")
            || attrs
                .get("http-equiv")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("content-type"))
    });

    if !declares_charset {
        let meta = create_element("meta");
        set_node_attr(&meta, "http-equiv", Some("Content-Type".to_string()));
        set_node_attr(&meta, "content", Some("text/html; charset=utf-8".to_string()));
        head.as_node().prepend(meta);
    }
}

/// 创建一个 HTML 命名空间中的空元素
pub fn create_element(name: &str) -> NodeRef {
    NodeRef::new_element(
        QualName::new(None, ns!(html), LocalName::from(name)),
        Vec::new(),
    )
}

/// 获取节点属性值
pub fn get_node_attr(node: &NodeRef, attr_name: &str) -> Option<String> {
    node.as_element()
        .and_then(|element| element.attributes.borrow().get(attr_name).map(String::from))
}

/// 设置节点属性，`None` 表示删除该属性
pub fn set_node_attr(node: &NodeRef, attr_name: &str, attr_value: Option<String>) {
    if let Some(element) = node.as_element() {
        let mut attrs = element.attributes.borrow_mut();

        match attr_value {
            Some(value) => {
                attrs.insert(attr_name, value);
            }
            None => {
                attrs.remove(attr_name);
            }
        }
    }
}

/// 获取节点名称
pub fn get_node_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

/// `<body>` 及其所有后代元素（文档顺序）
pub fn body_elements(document: &NodeRef) -> Vec<NodeDataRef<ElementData>> {
    match document.select_first("body") {
        Ok(body) => body.as_node().inclusive_descendants().elements().collect(),
        Err(()) => Vec::new(),
    }
}
