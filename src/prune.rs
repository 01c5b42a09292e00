//! Removal of the tree nodes whose checkpoints fell inside a quotation

use crate::checkpoint::normalize_element;
use crate::dom::{is_element, is_void};
use kuchikiki::NodeRef;

/// Delete the quoted parts of the subtree rooted at `node`
///
/// `flags[id]` tells whether the text node with checkpoint `id` lies inside
/// the quotation. Text nodes are numbered in document order starting at
/// `counter`, after each element is normalized exactly as during annotation.
///
/// An element is fully quoted when all of its children are. Fully quoted
/// elements are left for their parent to remove as a whole; any other
/// element removes its fully quoted children and keeps the rest. Void
/// elements are never fully quoted, comments always are.
///
/// Returns the next checkpoint id and whether `node` is fully quoted.
pub fn delete_quotation_tags(node: &NodeRef, counter: usize, flags: &[bool]) -> (usize, bool) {
    if node.as_text().is_some() {
        let quoted = flags.get(counter).copied().unwrap_or(false);
        return (counter + 1, quoted);
    }

    if !is_element(node) {
        return (counter, true);
    }
    if is_void(node) {
        return (counter, false);
    }

    normalize_element(node);

    let children: Vec<NodeRef> = node.children().collect();
    let mut counter = counter;
    let mut fully_quoted = true;
    let mut quoted_children = Vec::new();

    for child in children {
        let (next, quoted) = delete_quotation_tags(&child, counter, flags);
        counter = next;
        fully_quoted &= quoted;
        if quoted {
            quoted_children.push(child);
        }
    }

    if !fully_quoted {
        for child in quoted_children {
            child.detach();
        }
    }

    (counter, fully_quoted)
}
