//! Entry points and content-type dispatch

use crate::dom::{DomProvider, Html5Ever};
use crate::error::{ExtractError, Result};
use crate::html;
use crate::markers::{Markers, mark_lines};
use crate::normalize::{get_delimiter, postprocess, preprocess};
use crate::options::ExtractOptions;
use crate::patterns::PatternTable;
use crate::quotation::process_marked_lines;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Body formats the extractor understands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    #[serde(rename = "text/plain")]
    Plain,
    #[serde(rename = "text/html")]
    Html,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "text/plain",
            Self::Html => "text/html",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ExtractError;

    /// Parse a MIME type, ignoring case and any `; charset=...` parameters
    fn from_str(s: &str) -> Result<Self> {
        let mimetype = s.split(';').next().unwrap_or_default().trim();
        if mimetype.eq_ignore_ascii_case("text/plain") {
            Ok(Self::Plain)
        } else if mimetype.eq_ignore_ascii_case("text/html") {
            Ok(Self::Html)
        } else {
            Err(ExtractError::UnsupportedContentType(s.to_string()))
        }
    }
}

/// Reply extractor configured with limits and a pattern table
///
/// ```rust
/// use email_reply_extract::Extractor;
///
/// let extractor = Extractor::default();
/// let body = "Thanks!\n\nOn 11-Apr-2011, at 6:54 PM, Bob <bob@example.com> wrote:\n> Hi";
/// assert_eq!(extractor.extract_plain(body), "Thanks!");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
    patterns: PatternTable,
}

impl Extractor {
    #[must_use]
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            patterns: PatternTable::default(),
        }
    }

    /// Replace the built-in pattern table
    #[must_use]
    pub fn with_patterns(mut self, patterns: PatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &ExtractOptions {
        &self.options
    }

    #[must_use]
    pub const fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Classify each line, see [`Markers`]
    #[must_use]
    pub fn mark_lines<S: AsRef<str>>(&self, lines: &[S]) -> Markers {
        mark_lines(lines, &self.patterns, &self.options)
    }

    /// Strip quotations from a plain-text body
    ///
    /// The body is returned unchanged when nothing is cut or when it has
    /// more lines than allowed.
    #[must_use]
    pub fn extract_plain(&self, body: &str) -> String {
        let delimiter = get_delimiter(body, self.options.delimiter_chunk_size);
        let prepared = preprocess(
            body,
            delimiter,
            ContentType::Plain,
            &self.patterns,
            self.options.max_line_length,
        );

        let lines: Vec<&str> = prepared.split(delimiter).collect();
        if lines.len() > self.options.max_lines_count {
            debug!(
                "Body has {} lines, more than {}; leaving it as is",
                lines.len(),
                self.options.max_lines_count
            );
            return body.to_string();
        }

        let markers = self.mark_lines(&lines);
        debug!("Marked {} line(s): {markers}", lines.len());

        let resolution = process_marked_lines(&lines, &markers);
        if !resolution.were_lines_deleted() {
            return body.to_string();
        }

        postprocess(&resolution.apply(&lines).join(delimiter))
    }

    /// Strip quotations from an HTML body
    ///
    /// Without a DOM provider, or if the document cannot be processed, the
    /// body is returned unchanged.
    #[must_use]
    pub fn extract_html(&self, body: &str, dom: Option<&dyn DomProvider>) -> String {
        let Some(dom) = dom else {
            warn!("No DOM provider to parse HTML; leaving body as is");
            return body.to_string();
        };

        self.try_extract_html(body, dom).unwrap_or_else(|e| {
            warn!("HTML extraction failed, leaving body as is: {e}");
            body.to_string()
        })
    }

    /// Strip quotations from an HTML body, reporting DOM failures
    pub fn try_extract_html(&self, body: &str, dom: &dyn DomProvider) -> Result<String> {
        html::extract(body, dom, &self.options, &self.patterns)
    }

    /// Strip quotations from a body of the given MIME type
    ///
    /// HTML bodies are parsed with [`Html5Ever`]. Unsupported types are
    /// returned unchanged.
    #[must_use]
    pub fn extract(&self, body: &str, content_type: &str) -> String {
        let dom: &dyn DomProvider = &Html5Ever;
        match content_type.parse::<ContentType>() {
            Ok(ContentType::Plain) => self.extract_plain(body),
            Ok(ContentType::Html) => self.extract_html(body, Some(dom)),
            Err(e) => {
                warn!("{e}; leaving body as is");
                body.to_string()
            }
        }
    }
}

/// Strip quotations from a plain-text body with default settings
///
/// ```rust
/// use email_reply_extract::extract_from_plain;
///
/// assert_eq!(extract_from_plain("Oh, hai"), "Oh, hai");
/// ```
#[must_use]
pub fn extract_from_plain(body: &str) -> String {
    Extractor::default().extract_plain(body)
}

/// Strip quotations from an HTML body with default settings
#[must_use]
pub fn extract_from_html(body: &str, dom: Option<&dyn DomProvider>) -> String {
    Extractor::default().extract_html(body, dom)
}

/// Strip quotations from a `text/plain` or `text/html` body
#[must_use]
pub fn extract_from(body: &str, content_type: &str) -> String {
    Extractor::default().extract(body, content_type)
}

/// Classify message lines with the built-in patterns
#[must_use]
pub fn mark_message_lines(lines: &[&str]) -> Markers {
    Extractor::default().mark_lines(lines)
}
