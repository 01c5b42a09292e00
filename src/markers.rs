//! Line classification

use crate::options::ExtractOptions;
use crate::patterns::PatternTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Classification of a single message line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Blank line
    Empty,
    /// Line starting with a `>` quotation marker
    Quote,
    /// Forwarded message banner
    Forward,
    /// Part of a splitter such as `On ..., ... wrote:`
    Splitter,
    /// Presumably text of the newest message
    Text,
}

impl Marker {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Empty => 'e',
            Self::Quote => 'm',
            Self::Forward => 'f',
            Self::Splitter => 's',
            Self::Text => 't',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'e' => Some(Self::Empty),
            'm' => Some(Self::Quote),
            'f' => Some(Self::Forward),
            's' => Some(Self::Splitter),
            't' => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One marker per line, in line order
///
/// Rendered as a string over the alphabet `e m f s t`, which is what the
/// quotation rules match against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Markers(String);

impl Markers {
    /// Parse a marker string, rejecting characters outside the alphabet
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.chars()
            .map(Marker::from_char)
            .collect::<Option<Vec<_>>>()
            .map(|markers| markers.into_iter().collect())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of markers, equal to the number of lines they describe
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, marker: Marker) -> bool {
        self.0.contains(marker.as_char())
    }

    /// Marker of line `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Marker> {
        self.0
            .as_bytes()
            .get(index)
            .and_then(|&b| Marker::from_char(char::from(b)))
    }

    /// Reinterpret every quote marker as text
    #[must_use]
    pub fn quotes_as_text(&self) -> Self {
        Self(self.0.replace(Marker::Quote.as_char(), "t"))
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = Marker> + '_ {
        self.0.chars().filter_map(Marker::from_char)
    }
}

impl FromIterator<Marker> for Markers {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self(iter.into_iter().map(Marker::as_char).collect())
    }
}

impl fmt::Display for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mark message lines to tell quotation apart from the newest message
///
/// ```rust
/// use email_reply_extract::mark_message_lines;
///
/// let markers = mark_message_lines(&["answer", "From: foo@bar.com", "", "> question"]);
/// assert_eq!(markers.as_str(), "tsem");
/// ```
#[must_use]
pub fn mark_lines<S: AsRef<str>>(
    lines: &[S],
    patterns: &PatternTable,
    options: &ExtractOptions,
) -> Markers {
    let mut markers = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_ref();

        if line.trim().is_empty() {
            markers.push(Marker::Empty);
        } else if patterns.quote.is_match(line) {
            markers.push(Marker::Quote);
        } else if patterns.forward.is_match(line) {
            markers.push(Marker::Forward);
        } else {
            let end = i.saturating_add(options.splitter_max_lines).min(lines.len());
            let window = lines[i..end]
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join("\n");

            let splitter = (window.len() <= options.max_line_length)
                .then(|| patterns.splitter_at_start(&window))
                .flatten();

            if let Some((kind, matched)) = splitter {
                let spanned = matched.split('\n').count().min(end - i).max(1);
                debug!("Splitter {kind:?} at line {i} spanning {spanned} line(s)");
                markers.extend(std::iter::repeat_n(Marker::Splitter, spanned));
                i += spanned;
                continue;
            }
            markers.push(Marker::Text);
        }

        i += 1;
    }

    markers.into_iter().collect()
}
