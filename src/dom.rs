//! DOM seam: document creation and the tree primitives the HTML engine needs
//!
//! Trees are [`kuchikiki::NodeRef`] handles. Mutation (`append`,
//! `insert_before`, `detach`) and CSS-style lookup (`select`) come from
//! kuchikiki; this module adds what it lacks: deep copies, document-order
//! comparison and XPath-like `normalize-space`.

use crate::error::{ExtractError, Result};
use kuchikiki::NodeRef;
use kuchikiki::iter::NodeEdge;
use kuchikiki::traits::TendrilSink;
use std::cmp::Ordering;
use tracing::debug;

/// Elements that never have content of their own
const VOID_ELEMENTS: [&str; 18] = [
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Turns markup into a document tree
///
/// The HTML engine only needs a parser; everything else is done on the
/// returned tree.
pub trait DomProvider {
    /// Parse `markup` as a complete HTML document
    fn parse_document(&self, markup: &str) -> NodeRef;
}

/// Default provider backed by html5ever through kuchikiki
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Ever;

impl DomProvider for Html5Ever {
    fn parse_document(&self, markup: &str) -> NodeRef {
        kuchikiki::parse_html().one(markup)
    }
}

/// An email body parsed into a document, with `<head>` removed
#[derive(Debug)]
pub struct EmailDocument {
    document: NodeRef,
    html: NodeRef,
    body: NodeRef,
}

impl EmailDocument {
    /// Parse an email body with `provider`
    ///
    /// html5ever synthesizes `<html>` and `<body>` when they are missing; a
    /// provider that does not is reported as [`ExtractError::MissingElement`].
    pub fn parse(markup: &str, provider: &dyn DomProvider) -> Result<Self> {
        let document = provider.parse_document(markup.trim());
        let html = first_child_element(&document, "html")
            .ok_or(ExtractError::MissingElement("html"))?;

        if let Some(head) = first_child_element(&html, "head") {
            head.detach();
        }

        let body =
            first_child_element(&html, "body").ok_or(ExtractError::MissingElement("body"))?;

        Ok(Self {
            document,
            html,
            body,
        })
    }

    #[must_use]
    pub const fn document(&self) -> &NodeRef {
        &self.document
    }

    #[must_use]
    pub const fn html(&self) -> &NodeRef {
        &self.html
    }

    #[must_use]
    pub const fn body(&self) -> &NodeRef {
        &self.body
    }

    /// Independent copy of the whole document
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let document = deep_clone(&self.document);
        let html = first_child_element(&document, "html").unwrap_or_else(|| document.clone());
        let body = first_child_element(&html, "body").unwrap_or_else(|| html.clone());
        Self {
            document,
            html,
            body,
        }
    }

    /// Markup of the `<html>` element
    pub fn serialize(&self) -> Result<String> {
        let mut out = Vec::new();
        self.html.serialize(&mut out)?;
        Ok(String::from_utf8(out)?)
    }

    /// All elements matching a CSS selector, in document order
    #[must_use]
    pub fn select_all(&self, selector: &str) -> Vec<NodeRef> {
        select_all(&self.document, selector)
    }
}

/// All inclusive descendants of `root` matching a CSS selector
///
/// An unparsable selector matches nothing.
#[must_use]
pub fn select_all(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    root.select(selector).map_or_else(
        |()| {
            debug!("Ignoring unparsable selector {selector}");
            Vec::new()
        },
        |found| found.map(|el| el.as_node().clone()).collect(),
    )
}

/// Deepest element nesting below `root`, counting `root` itself
///
/// Walks the tree without recursion, so it is safe on any input.
#[must_use]
pub fn nesting_depth(root: &NodeRef) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;

    for edge in root.traverse_inclusive() {
        match edge {
            NodeEdge::Start(node) if is_element(&node) => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            NodeEdge::End(node) if is_element(&node) => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

/// Recursively copy a node and its subtree
#[must_use]
pub fn deep_clone(node: &NodeRef) -> NodeRef {
    let copy = NodeRef::new(node.data().clone());
    for child in node.children() {
        copy.append(deep_clone(&child));
    }
    copy
}

/// Whether `node` is an element with the given (lowercase) tag name
#[must_use]
pub fn has_tag(node: &NodeRef, tag: &str) -> bool {
    node.as_element().is_some_and(|el| &*el.name.local == tag)
}

#[must_use]
pub fn is_void(node: &NodeRef) -> bool {
    node.as_element()
        .is_some_and(|el| VOID_ELEMENTS.contains(&&*el.name.local))
}

#[must_use]
pub fn is_element(node: &NodeRef) -> bool {
    node.as_element().is_some()
}

#[must_use]
pub fn is_text(node: &NodeRef) -> bool {
    node.as_text().is_some()
}

fn first_child_element(node: &NodeRef, tag: &str) -> Option<NodeRef> {
    node.children().find(|child| has_tag(child, tag))
}

/// The parent of `node` if it is an element
#[must_use]
pub fn parent_element(node: &NodeRef) -> Option<NodeRef> {
    node.parent().filter(is_element)
}

/// The element siblings following `node`
#[must_use]
pub fn following_element_siblings(node: &NodeRef) -> Vec<NodeRef> {
    node.following_siblings().filter(is_element).collect()
}

/// XPath `normalize-space()`: trim and collapse XML whitespace runs
#[must_use]
pub fn normalize_space(s: &str) -> String {
    s.split([' ', '\t', '\n', '\r'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Child indices from the root down to `node`
fn tree_path(node: &NodeRef) -> Vec<usize> {
    let mut path: Vec<usize> = node
        .inclusive_ancestors()
        .filter(|n| n.parent().is_some())
        .map(|n| n.preceding_siblings().count())
        .collect();
    path.reverse();
    path
}

/// Compare two nodes of the same tree by document (pre-order) position
///
/// An ancestor sorts before its descendants.
#[must_use]
pub fn compare_document_position(a: &NodeRef, b: &NodeRef) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    tree_path(a).cmp(&tree_path(b))
}
