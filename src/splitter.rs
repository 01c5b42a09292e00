//! Structural quote removal: vendor-specific quote containers and splitters
//! that can be cut from the tree before any text analysis

use crate::dom::{
    EmailDocument, compare_document_position, following_element_siblings, has_tag, is_element,
    is_text, normalize_space, parent_element,
};
use kuchikiki::NodeRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ids of elements that wrap a whole quoted message
const QUOTE_IDS: [&str; 1] = ["OLK_SRC_BODY_SECTION"];

/// Header lines that open a quoted message when no vendor markup is left
const HEADER_PREFIXES: [&str; 2] = ["From:", "Date:"];

/// Mail client whose splitter markup was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorKind {
    Outlook2007,
    OutlookForAndroid,
    WindowsMail,
    Outlook2003,
    Office365,
}

/// How a vendor splitter is located in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detector {
    /// Divider whose inline style also shows up once on its own: the second
    /// match is taken, or its parent when it opens that parent
    SecondMatch(&'static str),
    /// Fixed element chain; the splitter is the given number of levels
    /// above the first match
    Ancestor(&'static str, usize),
    /// Container id; the first match is the splitter
    FirstMatch(&'static str),
}

impl Detector {
    fn locate(self, document: &EmailDocument) -> Option<NodeRef> {
        match self {
            Self::SecondMatch(selector) => {
                let splitter = document.select_all(selector).into_iter().nth(1)?;
                let opens_parent = parent_element(&splitter)
                    .and_then(|parent| parent.children().find(is_element))
                    .is_some_and(|first| first == splitter);
                if opens_parent {
                    parent_element(&splitter)
                } else {
                    Some(splitter)
                }
            }
            Self::Ancestor(selector, levels) => {
                let found = document.select_all(selector).into_iter().next()?;
                found.ancestors().nth(levels.checked_sub(1)?)
            }
            Self::FirstMatch(selector) => document.select_all(selector).into_iter().next(),
        }
    }
}

/// A splitter detector tagged with the client it recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorDetector {
    pub kind: VendorKind,
    pub detector: Detector,
}

/// Microsoft splitter detectors, in discovery order
pub const MICROSOFT_DETECTORS: [VendorDetector; 5] = [
    VendorDetector {
        kind: VendorKind::Outlook2007,
        detector: Detector::SecondMatch(
            "div[style='border:none;border-top:solid #B5C4DF 1.0pt;padding:3.0pt 0cm 0cm 0cm']",
        ),
    },
    VendorDetector {
        kind: VendorKind::OutlookForAndroid,
        detector: Detector::SecondMatch(
            "div[style='border:none;border-top:solid #E1E1E1 1.0pt;padding:3.0pt 0cm 0cm 0cm']",
        ),
    },
    VendorDetector {
        kind: VendorKind::WindowsMail,
        detector: Detector::SecondMatch(
            "div[style='padding-top: 5px; border-top-color: rgb(229, 229, 229); border-top-width: 1px; border-top-style: solid;']",
        ),
    },
    VendorDetector {
        kind: VendorKind::Outlook2003,
        detector: Detector::Ancestor(
            "div > div[class='MsoNormal'][align='center'][style='text-align:center'] > font > span > hr[size='3'][width='100%'][align='center'][tabindex='-1']",
            4,
        ),
    },
    VendorDetector {
        kind: VendorKind::Office365,
        detector: Detector::FirstMatch("#divRplyFwdMsg"),
    },
];

/// A located splitter element
#[derive(Debug, Clone)]
pub struct SplitterCandidate {
    pub node: NodeRef,
    pub kind: VendorKind,
}

/// Find the Microsoft splitter that comes first in the document
///
/// Every detector runs; among the candidates the earliest in document order
/// wins, regardless of which detector found it.
#[must_use]
pub fn find_microsoft_splitter(document: &EmailDocument) -> Option<SplitterCandidate> {
    let mut candidates: Vec<SplitterCandidate> = MICROSOFT_DETECTORS
        .iter()
        .filter_map(|vendor| {
            vendor.detector.locate(document).map(|node| SplitterCandidate {
                node,
                kind: vendor.kind,
            })
        })
        .collect();

    candidates.sort_by(|a, b| compare_document_position(&a.node, &b.node));
    candidates.into_iter().next()
}

/// Which structural cut removed quoted content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteCut {
    /// `.gmail_quote` containers
    Gmail,
    /// The last top-level `<blockquote>`
    Blockquote,
    /// A Microsoft splitter and everything after it
    Microsoft(VendorKind),
    /// A quote container found by id
    QuoteId,
    /// A `From:` / `Date:` header block
    FromBlock,
}

type CutStrategy = fn(&EmailDocument) -> Option<QuoteCut>;

/// Structural cuts in priority order, the first one that removes anything
/// wins
const CUT_STRATEGIES: [(&str, CutStrategy); 5] = [
    ("gmail quote", cut_gmail_quote),
    ("blockquote", cut_blockquote),
    ("microsoft splitter", cut_microsoft_quote),
    ("quote id", cut_by_id),
    ("from block", cut_from_block),
];

/// Remove quoted content recognizable from the markup alone
///
/// Returns the cut that was applied, if any.
pub fn cut_vendor_quotes(document: &EmailDocument) -> Option<QuoteCut> {
    CUT_STRATEGIES.iter().find_map(|(name, strategy)| {
        let cut = strategy(document);
        if let Some(cut) = cut {
            debug!("Cut quotation by {name}: {cut:?}");
        }
        cut
    })
}

/// Remove every `.gmail_quote` element
pub fn cut_gmail_quote(document: &EmailDocument) -> Option<QuoteCut> {
    let quotes = document.select_all(".gmail_quote");
    if quotes.is_empty() {
        return None;
    }

    for quote in quotes.iter().rev() {
        quote.detach();
    }
    Some(QuoteCut::Gmail)
}

/// Remove the last blockquote that is not nested in another one
pub fn cut_blockquote(document: &EmailDocument) -> Option<QuoteCut> {
    let blockquote = document
        .select_all("blockquote")
        .into_iter()
        .rfind(|quote| !quote.ancestors().any(|a| has_tag(&a, "blockquote")))?;

    blockquote.detach();
    Some(QuoteCut::Blockquote)
}

/// Remove a Microsoft splitter along with the elements following it
pub fn cut_microsoft_quote(document: &EmailDocument) -> Option<QuoteCut> {
    let SplitterCandidate { node, kind } = find_microsoft_splitter(document)?;

    for sibling in following_element_siblings(&node) {
        sibling.detach();
    }
    node.detach();

    Some(QuoteCut::Microsoft(kind))
}

/// Remove containers known to hold the quoted message
pub fn cut_by_id(document: &EmailDocument) -> Option<QuoteCut> {
    let mut found = false;
    for id in QUOTE_IDS {
        if let Some(quote) = document.select_all(&format!("#{id}")).into_iter().next() {
            quote.detach();
            found = true;
        }
    }
    found.then_some(QuoteCut::QuoteId)
}

/// Remove a quoted block introduced by a `From:` or `Date:` header
///
/// The enclosing `<div>` of the last element starting with such a header is
/// removed, unless it holds the whole body. Failing that, a bare header text
/// node is removed together with the node before it (usually an `<hr>`) and
/// everything after it.
pub fn cut_from_block(document: &EmailDocument) -> Option<QuoteCut> {
    let last_block = document
        .document()
        .descendants()
        .rfind(|node| is_element(node) && starts_with_header(node));

    if let Some(div) = last_block.as_ref().and_then(enclosing_div)
        && !holds_whole_body(&div)
    {
        div.detach();
        return Some(QuoteCut::FromBlock);
    }

    let header = document
        .document()
        .descendants()
        .find(|node| is_text(node) && starts_with_header(node))?;

    // Headers wrapped in their own span are left to the text pass
    if is_sole_span_child(&header) {
        return None;
    }

    if let Some(splitter) = header.previous_sibling() {
        splitter.detach();
    }
    for sibling in header.following_siblings().collect::<Vec<_>>() {
        sibling.detach();
    }
    header.detach();

    Some(QuoteCut::FromBlock)
}

fn starts_with_header(node: &NodeRef) -> bool {
    let text = normalize_space(&node.text_contents());
    HEADER_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

fn enclosing_div(node: &NodeRef) -> Option<NodeRef> {
    node.inclusive_ancestors()
        .take_while(|n| parent_element(n).is_some())
        .find(|n| has_tag(n, "div"))
}

fn holds_whole_body(element: &NodeRef) -> bool {
    parent_element(element)
        .is_some_and(|parent| has_tag(&parent, "body") && parent.children().count() == 1)
}

fn is_sole_span_child(node: &NodeRef) -> bool {
    parent_element(node)
        .is_some_and(|parent| has_tag(&parent, "span") && parent.children().count() == 1)
}
