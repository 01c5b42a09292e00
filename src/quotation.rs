//! Quotation boundary resolution over a marker string

use crate::markers::{Marker, Markers};
use crate::patterns::{
    EMPTY_QUOTATION, FORWARD_AT_START, PARENTHESIS_LINK, QUOTATION, REPEATED_QUOTES,
    TRAILING_AFTER_SPLITTER,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Half-open range of lines `[start, end)` holding quoted content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotationBoundary {
    pub start: usize,
    pub end: usize,
}

impl QuotationBoundary {
    /// Build a boundary, rejecting ranges that do not fit `line_count` lines
    #[must_use]
    pub const fn new(start: usize, end: usize, line_count: usize) -> Option<Self> {
        if start <= end && end <= line_count {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Number of lines covered
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Lines before and after the quotation, joined together
    #[must_use]
    pub fn splice<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> Vec<&'a str> {
        lines
            .iter()
            .enumerate()
            .filter(|(i, _)| !(self.start..self.end).contains(i))
            .map(|(_, line)| line.as_ref())
            .collect()
    }
}

/// Outcome of boundary resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Nothing is safe to delete
    Keep,
    /// Delete the lines inside the boundary
    Cut(QuotationBoundary),
}

impl Resolution {
    #[must_use]
    pub const fn boundary(&self) -> Option<QuotationBoundary> {
        match self {
            Self::Keep => None,
            Self::Cut(boundary) => Some(*boundary),
        }
    }

    #[must_use]
    pub const fn were_lines_deleted(&self) -> bool {
        matches!(self, Self::Cut(_))
    }

    /// Lines that remain once the quotation is removed
    #[must_use]
    pub fn apply<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> Vec<&'a str> {
        match self {
            Self::Keep => lines.iter().map(AsRef::as_ref).collect(),
            Self::Cut(boundary) => boundary.splice(lines),
        }
    }
}

type Rule = fn(&[&str], &Markers) -> Option<Resolution>;

/// Resolution rules in priority order, the first rule returning `Some` wins
const RULES: [(&str, Rule); 4] = [
    ("forwarded message", forwarded_message),
    ("inline reply", inline_reply),
    ("trailing text after splitter", trailing_after_splitter),
    ("quoted block", quoted_block),
];

/// Decide which lines of a marked message are quotation
///
/// `markers` must hold one marker per line. Quote markers are only trusted
/// when a splitter is present or when at least three quoted lines occur;
/// otherwise a stray `>` is read as ordinary text.
#[must_use]
pub fn process_marked_lines<S: AsRef<str>>(lines: &[S], markers: &Markers) -> Resolution {
    let lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();

    let markers = if !markers.contains(Marker::Splitter)
        && !REPEATED_QUOTES.is_match(markers.as_str())
    {
        markers.quotes_as_text()
    } else {
        markers.clone()
    };

    for (name, rule) in RULES {
        if let Some(resolution) = rule(&lines, &markers) {
            debug!("Resolved {markers} by rule '{name}': {resolution:?}");
            return resolution;
        }
    }

    debug!("No quotation found in {markers}");
    Resolution::Keep
}

/// Forwarded messages are kept whole
fn forwarded_message(_: &[&str], markers: &Markers) -> Option<Resolution> {
    FORWARD_AT_START
        .is_match(markers.as_str())
        .then_some(Resolution::Keep)
}

/// Text between two quoted blocks means an inline reply, which is never cut
///
/// A run of text that is only the tail of a parenthesized link wrapped
/// across lines does not count.
fn inline_reply(lines: &[&str], markers: &Markers) -> Option<Resolution> {
    let bytes = markers.as_str().as_bytes();

    for (quote, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'm') {
        let mut start = quote + 1;
        while bytes.get(start) == Some(&b'e') {
            start += 1;
        }
        if bytes.get(start) != Some(&b't') {
            continue;
        }

        let mut end = start;
        while matches!(bytes.get(end), Some(b't' | b'e')) {
            end += 1;
        }
        if bytes.get(end) != Some(&b'm') {
            continue;
        }

        let before = lines.get(start - 1).copied().unwrap_or_default();
        let first = lines.get(start).copied().unwrap_or_default();
        let is_link = PARENTHESIS_LINK.is_match(before)
            || PARENTHESIS_LINK
                .find(first.trim())
                .is_some_and(|m| m.start() == 0);
        if !is_link {
            return Some(Resolution::Keep);
        }
    }

    None
}

/// Everything from a splitter onwards goes when only text follows it
fn trailing_after_splitter(lines: &[&str], markers: &Markers) -> Option<Resolution> {
    TRAILING_AFTER_SPLITTER
        .find(markers.as_str())
        .and_then(|m| QuotationBoundary::new(m.start(), lines.len(), lines.len()))
        .map(Resolution::Cut)
}

/// A quoted block, possibly with the newest message around it
fn quoted_block(lines: &[&str], markers: &Markers) -> Option<Resolution> {
    QUOTATION
        .captures(markers.as_str())
        .or_else(|| EMPTY_QUOTATION.captures(markers.as_str()))
        .and_then(|caps| caps.get(1))
        .and_then(|block| QuotationBoundary::new(block.start(), block.end(), lines.len()))
        .map(Resolution::Cut)
}
