//! Checkpoint annotation: numbering the text nodes of a tree so that lines of
//! its flattened text can be traced back to the nodes they came from

use crate::dom::{has_tag, is_element, is_void};
use kuchikiki::{Node, NodeRef};
use std::collections::HashMap;
use tracing::debug;

/// Whitespace added at both ends of every non-body element
const PADDING: &str = "  ";

/// Reshape an element's children so text and element boundaries line up
///
/// Non-body elements get two spaces of padding at each end (merged into the
/// boundary text node when there is one), adjacent text children are merged,
/// and a single space is inserted between adjacent child elements. An element
/// left without children gets a single space. Void elements are untouched.
///
/// Both the annotated and the pruned tree go through this, which is what
/// keeps their checkpoint numbering identical.
pub fn normalize_element(element: &NodeRef) {
    if !is_element(element) || is_void(element) {
        return;
    }

    if !has_tag(element, "body") {
        pad(element);
    }
    merge_adjacent_text(element);
    separate_child_elements(element);
}

fn pad(element: &NodeRef) {
    let first = element.first_child();
    match first.as_ref().and_then(|node| node.as_text()) {
        Some(text) => text.borrow_mut().insert_str(0, PADDING),
        None => element.prepend(NodeRef::new_text(PADDING)),
    }

    let last = element.last_child();
    match last.as_ref().and_then(|node| node.as_text()) {
        Some(text) => text.borrow_mut().push_str(PADDING),
        None => element.append(NodeRef::new_text(PADDING)),
    }
}

fn merge_adjacent_text(element: &NodeRef) {
    let children: Vec<NodeRef> = element.children().collect();
    let mut previous: Option<NodeRef> = None;

    for child in children {
        let merged = match (previous.as_ref().and_then(|p| p.as_text()), child.as_text()) {
            (Some(into), Some(text)) => {
                into.borrow_mut().push_str(&text.borrow());
                true
            }
            _ => false,
        };

        if merged {
            child.detach();
        } else {
            previous = Some(child);
        }
    }
}

fn separate_child_elements(element: &NodeRef) {
    if element.first_child().is_none() {
        element.append(NodeRef::new_text(" "));
        return;
    }

    let children: Vec<NodeRef> = element.children().collect();
    for pair in children.windows(2) {
        if let [current, next] = pair
            && is_element(current)
            && is_element(next)
        {
            next.insert_before(NodeRef::new_text(" "));
        }
    }
}

/// Text nodes of an annotated tree, indexed by checkpoint id
///
/// Ids are assigned in document order starting at zero. Nodes are looked up
/// by identity, so the tree must not be rebuilt between annotation and
/// [`flatten`].
#[derive(Debug, Default)]
pub struct Checkpoints {
    nodes: Vec<NodeRef>,
    ids: HashMap<*const Node, usize>,
}

impl Checkpoints {
    /// Annotate the subtree rooted at `root` and collect its checkpoints
    #[must_use]
    pub fn annotate(root: &NodeRef) -> Self {
        let mut checkpoints = Self::default();
        let count = add_checkpoints(root, 0, &mut checkpoints);
        debug!("Added {count} checkpoint(s)");
        checkpoints
    }

    fn record(&mut self, node: &NodeRef, id: usize) {
        self.ids.insert(std::rc::Rc::as_ptr(&node.0), id);
        self.nodes.push(node.clone());
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Text node carrying checkpoint `id`
    #[must_use]
    pub fn node(&self, id: usize) -> Option<&NodeRef> {
        self.nodes.get(id)
    }

    /// Checkpoint id of a text node
    #[must_use]
    pub fn id_of(&self, node: &NodeRef) -> Option<usize> {
        self.ids.get(&std::rc::Rc::as_ptr(&node.0)).copied()
    }
}

/// Assign checkpoints to the text nodes under `node`, starting at `counter`
///
/// Every text node is trimmed and terminated with a newline; elements are
/// normalized with [`normalize_element`] before their children are visited.
/// Returns the next free id, which is also the number of checkpoints
/// assigned so far.
pub fn add_checkpoints(node: &NodeRef, counter: usize, checkpoints: &mut Checkpoints) -> usize {
    if let Some(text) = node.as_text() {
        let annotated = format!("{}\n", text.borrow().trim());
        *text.borrow_mut() = annotated;
        checkpoints.record(node, counter);
        return counter + 1;
    }

    if !is_element(node) || is_void(node) {
        return counter;
    }

    normalize_element(node);

    let children: Vec<NodeRef> = node.children().collect();
    children
        .iter()
        .fold(counter, |counter, child| add_checkpoints(child, counter, checkpoints))
}

/// Text content of an annotated tree, split into lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatText {
    /// The text, `<br>` rendered as a line break
    pub text: String,

    /// For each line, the checkpoints whose text ends on it
    pub checkpoints: Vec<Vec<usize>>,
}

impl FlatText {
    /// Checkpoints found on lines `first..=last`, `last` clamped to the
    /// final line
    #[must_use]
    pub fn checkpoints_on(&self, first: usize, last: usize) -> impl Iterator<Item = usize> + '_ {
        let last = last.min(self.checkpoints.len().saturating_sub(1));
        self.checkpoints
            .get(first..=last)
            .unwrap_or_default()
            .iter()
            .flatten()
            .copied()
    }
}

/// Flatten an annotated tree to text, keeping track of where each
/// checkpoint's text ends up
#[must_use]
pub fn flatten(root: &NodeRef, checkpoints: &Checkpoints) -> FlatText {
    let mut flattener = Flattener {
        checkpoints,
        text: String::new(),
        lines: vec![Vec::new()],
    };
    flattener.visit(root);

    FlatText {
        text: flattener.text,
        checkpoints: flattener.lines,
    }
}

struct Flattener<'a> {
    checkpoints: &'a Checkpoints,
    text: String,
    lines: Vec<Vec<usize>>,
}

impl Flattener<'_> {
    fn push(&mut self, s: &str) {
        for _ in s.matches('\n') {
            self.lines.push(Vec::new());
        }
        self.text.push_str(s);
    }

    fn visit(&mut self, node: &NodeRef) {
        if let Some(text) = node.as_text() {
            let text = text.borrow();
            let content = text.strip_suffix('\n').unwrap_or(text.as_str());
            self.push(content);

            if let (Some(id), Some(line)) = (self.checkpoints.id_of(node), self.lines.last_mut()) {
                line.push(id);
            }

            self.push(&text[content.len()..]);
            return;
        }

        if has_tag(node, "br") {
            self.push("\n");
            return;
        }

        for child in node.children() {
            self.visit(&child);
        }
    }
}
