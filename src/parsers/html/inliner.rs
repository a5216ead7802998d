//! CSS 内联器
//!
//! 将样式表规则转换为元素的 `style` 属性，以便在不支持样式表的邮件客户端中
//! 正确显示。选择器匹配与优先级（specificity）计算由 kuchiki/selectors 完成。
//!
//! # 层叠规则
//!
//! 从低到高：
//!
//! 1. 样式表中的普通声明（按 specificity、再按源码顺序）
//! 2. 元素原有的内联普通声明
//! 3. 样式表中的 `!important` 声明
//! 4. 元素原有的内联 `!important` 声明
//!
//! 输出到 `style` 属性时去掉 `!important` 标记。

use kuchiki::{NodeRef, Selector, Selectors, Specificity};

use crate::error::{RenderError, RenderResult};
use crate::parsers::css::{parse_declarations, parse_stylesheet, Declaration, StyleRule};

use super::dom::{body_elements, create_element, get_node_attr, set_node_attr};

/// A document after inlining, together with what the pruner needs to know
pub struct InlinedDocument {
    pub document: NodeRef,
    /// Selectors that matched at least one element
    pub inlined_selectors: Vec<String>,
    /// CSS that could not be inlined and now lives in a `<style>` element
    pub retained_css: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Origin {
    Stylesheet,
    Inline,
}

#[derive(Debug)]
struct CascadedDeclaration {
    declaration: Declaration,
    origin: Origin,
}

impl CascadedDeclaration {
    fn precedence(&self) -> (bool, Origin) {
        (self.declaration.important, self.origin)
    }
}

/// Declarations applied to one element, in the order they end up in `style`
#[derive(Debug, Default)]
struct Cascade {
    entries: Vec<CascadedDeclaration>,
}

impl Cascade {
    fn apply(&mut self, declaration: &Declaration, origin: Origin) {
        let incoming = CascadedDeclaration {
            declaration: declaration.clone(),
            origin,
        };

        if let Some(position) = self
            .entries
            .iter()
            .position(|entry| entry.declaration.property == declaration.property)
        {
            if incoming.precedence() < self.entries[position].precedence() {
                return;
            }
            // Move to the end so a later shorthand/longhand keeps its relative order
            self.entries.remove(position);
        }

        self.entries.push(incoming);
    }

    fn to_style(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.declaration.to_css())
            .collect::<Vec<String>>()
            .join(" ")
    }
}

struct CompiledRule<'a> {
    selector: Selector,
    specificity: Specificity,
    rule: &'a StyleRule,
}

/// 将 `css` 与文档中 `<style>` 元素的 CSS 内联到 `<body>` 内的元素上
///
/// All selectors are compiled before the document is touched, so a malformed
/// selector leaves nothing half-inlined.
pub fn inline_css(document: NodeRef, css: &str) -> RenderResult<InlinedDocument> {
    let mut combined_css = css.to_string();
    for style_css in take_style_elements(&document)? {
        combined_css.push('\n');
        combined_css.push_str(&style_css);
    }

    let stylesheet = parse_stylesheet(&combined_css);
    let compiled = compile_rules(&stylesheet.rules)?;
    let mut used = vec![false; compiled.len()];

    for element in body_elements(&document) {
        let mut matched: Vec<(Specificity, usize, usize)> = compiled
            .iter()
            .enumerate()
            .filter(|(_, compiled_rule)| compiled_rule.selector.matches(&element))
            .map(|(index, compiled_rule)| {
                (compiled_rule.specificity, compiled_rule.rule.order, index)
            })
            .collect();

        if matched.is_empty() {
            continue;
        }

        matched.sort();

        let mut cascade = Cascade::default();
        for (_, _, index) in matched {
            used[index] = true;
            for declaration in &compiled[index].rule.declarations {
                cascade.apply(declaration, Origin::Stylesheet);
            }
        }

        let node = element.as_node();
        if let Some(style) = get_node_attr(node, "style") {
            for declaration in parse_declarations(&style) {
                cascade.apply(&declaration, Origin::Inline);
            }
        }

        if !cascade.entries.is_empty() {
            set_node_attr(node, "style", Some(cascade.to_style()));
        }
    }

    let inlined_selectors: Vec<String> = compiled
        .iter()
        .zip(used)
        .filter(|(_, used)| *used)
        .map(|(compiled_rule, _)| compiled_rule.rule.selector.clone())
        .collect();

    let retained_css = stylesheet.retained_css();
    if !retained_css.is_empty() {
        append_style_element(&document, &retained_css);
    }

    tracing::debug!(
        "Inlined {} of {} selectors, retained {} bytes of CSS",
        inlined_selectors.len(),
        compiled.len(),
        retained_css.len()
    );

    Ok(InlinedDocument {
        document,
        inlined_selectors,
        retained_css,
    })
}

fn compile_rules(rules: &[StyleRule]) -> RenderResult<Vec<CompiledRule<'_>>> {
    let mut compiled = Vec::with_capacity(rules.len());

    for rule in rules {
        let selectors =
            Selectors::compile(&rule.selector).map_err(|()| RenderError::SelectorParse {
                selector: rule.selector.clone(),
            })?;

        for selector in selectors.0 {
            compiled.push(CompiledRule {
                specificity: selector.specificity(),
                selector,
                rule,
            });
        }
    }

    Ok(compiled)
}

/// Detaches every `<style>` element and returns their CSS in document order
fn take_style_elements(document: &NodeRef) -> RenderResult<Vec<String>> {
    let style_elements: Vec<NodeRef> = document
        .select("style")
        .map_err(|()| RenderError::SelectorParse {
            selector: "style".to_string(),
        })?
        .map(|style| style.as_node().clone())
        .collect();

    Ok(style_elements
        .into_iter()
        .map(|style| {
            let css = style.text_contents();
            style.detach();
            css
        })
        .collect())
}

fn append_style_element(document: &NodeRef, css: &str) {
    let style = create_element("style");
    set_node_attr(&style, "type", Some("text/css".to_string()));
    style.append(NodeRef::new_text(css));

    match document.select_first("head") {
        Ok(head) => head.as_node().append(style),
        Err(()) => document.append(style),
    }
}
