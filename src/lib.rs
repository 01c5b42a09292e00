// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Reply Extractor
//!
//! Strips quoted prior messages, reply headers and splitters from email
//! bodies, keeping only what the sender actually wrote.
//!
//! # Features
//!
//! - Plain-text bodies: every line is classified (text, quote, splitter,
//!   forward banner, blank) and the quoted line range is cut
//! - HTML bodies: vendor quote markup (Gmail, Outlook, Office 365, Windows
//!   Mail) is removed structurally, then the plain-text rules run on a
//!   flattened copy and the matching nodes are pruned from the tree
//! - Splitter patterns in English, French, German, Dutch, Polish, Swedish
//!   and Danish
//! - Raw MIME messages through [`extract_reply`]
//!
//! # Example
//!
//! ```rust
//! use email_reply_extract::{extract_from, extract_from_plain};
//!
//! let body = "Test reply\n\nOn 11-Apr-2011, at 6:54 PM, Roman <roman@example.com> wrote:\n\n> Test";
//! assert_eq!(extract_from_plain(body), "Test reply");
//!
//! let html = "Reply\n<blockquote>On 11-Apr-2011, at 6:54 PM, Bob wrote:<br>Test</blockquote>";
//! assert_eq!(extract_from(html, "text/html"), "<html><body>Reply\n</body></html>");
//! ```

mod checkpoint;
mod dom;
mod error;
mod extractor;
mod html;
mod markers;
mod message;
mod normalize;
mod options;
mod patterns;
mod prune;
mod quotation;
mod splitter;

pub use checkpoint::{Checkpoints, FlatText, add_checkpoints, flatten, normalize_element};
pub use dom::{DomProvider, EmailDocument, Html5Ever, compare_document_position, normalize_space};
pub use error::{ExtractError, Result};
pub use extractor::{
    ContentType, Extractor, extract_from, extract_from_html, extract_from_plain,
    mark_message_lines,
};
pub use markers::{Marker, Markers};
pub use message::{Reply, extract_reply};
pub use normalize::{get_delimiter, postprocess, preprocess};
pub use options::ExtractOptions;
pub use patterns::{PatternTable, SplitterKind, SplitterPattern};
pub use prune::delete_quotation_tags;
pub use quotation::{QuotationBoundary, Resolution, process_marked_lines};
pub use splitter::{
    Detector, MICROSOFT_DETECTORS, QuoteCut, SplitterCandidate, VendorDetector, VendorKind,
    cut_vendor_quotes, find_microsoft_splitter,
};

/// Re-exported so custom [`DomProvider`]s can build trees
pub use kuchikiki::NodeRef;
