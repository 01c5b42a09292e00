//! Pattern data: locale-specific splitter regexes and the marker-string rules

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Line-level patterns
pub static DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n").unwrap());

pub static FORWARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?imR)^-+ *Forwarded message *-+$").unwrap());

pub static QUOTE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>+ ?").unwrap());

/// On {date}, {somebody} wrote:
pub static ON_DATE_SMB_WROTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?R)-*>? ?(?:On|Le|W dniu|Op|Am|På|Den) .*(?:,|użytkownik)(?:.*\n){0,2}.*(?:wrote|sent|a écrit|napisał|schreef|verzond|geschreven|schrieb|skrev):?-*",
    )
    .unwrap()
});

/// On {date} wrote {somebody}:
pub static ON_DATE_WROTE_SMB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?R)-*>? ?(?:Op|Am) .*(?:.*\n){0,2}.*(?:schreef|verzond|geschreven|schrieb) *.*:")
        .unwrap()
});

pub static ORIGINAL_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*-+ *(?:Original Message|Reply Message|Ursprüngliche Nachricht|Antwort Nachricht|Oprindelig meddelelse) *-+",
    )
    .unwrap()
});

pub static FROM_COLON_OR_DATE_COLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?iR)(?:_+\r?\n)?\s*(?::?\*?From|Van|De|Von|Fra|Från|Date|Datum|Envoyé|Skickat|Sendt)\s?:\*? .*",
    )
    .unwrap()
});

pub static DATE_PERSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?R)(?:\d+/\d+/\d+|\d+\.\d+\.\d+).*@").unwrap());

pub static SPELLED_OUT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\S{3,10}, \d\d? \S{3,10} 20\d\d,? \d\d?:\d\d(?::\d\d)?(?: \S+){3,6}@\S+:").unwrap()
});

// Links
pub static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(https?://[^>]*)>").unwrap());

pub static NORMALIZED_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@@(https?://[^>@]*)@@").unwrap());

pub static PARENTHESIS_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(https?://").unwrap());

// Marker-string rules, see `quotation`
pub static REPEATED_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:me*){3}").unwrap());

pub static FORWARD_AT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[te]*f").unwrap());

pub static TRAILING_AFTER_SPLITTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:se*)+(?:[tf]+e*)+").unwrap());

pub static QUOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?:s|(?:me*){2,}).*me*)[te]*$").unwrap());

pub static EMPTY_QUOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?:s|(?:me*){2,}))e*").unwrap());

/// Which kind of header a splitter pattern recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitterKind {
    /// `-----Original Message-----` and its translations
    OriginalMessage,
    /// A numeric date followed by an address on the same line
    DatePerson,
    /// `On {date}, {somebody} wrote:`
    OnDateSomebodyWrote,
    /// `Op {date} schreef {somebody}:`
    OnDateWroteSomebody,
    /// `From:` / `Date:` header blocks
    FromColonOrDateColon,
    /// `Tue, 27 Jan 2015 12:42 PM ... foo@bar:`
    SpelledOutDate,
}

/// A splitter regex tagged with the kind of header it recognizes
#[derive(Debug, Clone)]
pub struct SplitterPattern {
    pub kind: SplitterKind,
    pub regex: Regex,
}

impl SplitterPattern {
    #[must_use]
    pub const fn new(kind: SplitterKind, regex: Regex) -> Self {
        Self { kind, regex }
    }
}

/// The locale pattern table used by the line marker and the preprocessor
///
/// Splitters are tried in the order of `splitters`; the first one matching
/// at the very start of the window wins.
#[derive(Debug, Clone)]
pub struct PatternTable {
    /// Forwarded message banner
    pub forward: Regex,

    /// Leading quotation marker
    pub quote: Regex,

    /// `On {date}, {somebody} wrote:` header, moved onto its own line by
    /// the preprocessor
    pub on_date_wrote: Regex,

    /// Splitter patterns in priority order
    pub splitters: Vec<SplitterPattern>,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            forward: FORWARD.clone(),
            quote: QUOTE_MARKER.clone(),
            on_date_wrote: ON_DATE_SMB_WROTE.clone(),
            splitters: vec![
                SplitterPattern::new(SplitterKind::OriginalMessage, ORIGINAL_MESSAGE.clone()),
                SplitterPattern::new(SplitterKind::DatePerson, DATE_PERSON.clone()),
                SplitterPattern::new(
                    SplitterKind::OnDateSomebodyWrote,
                    ON_DATE_SMB_WROTE.clone(),
                ),
                SplitterPattern::new(
                    SplitterKind::OnDateWroteSomebody,
                    ON_DATE_WROTE_SMB.clone(),
                ),
                SplitterPattern::new(
                    SplitterKind::FromColonOrDateColon,
                    FROM_COLON_OR_DATE_COLON.clone(),
                ),
                SplitterPattern::new(SplitterKind::SpelledOutDate, SPELLED_OUT_DATE.clone()),
            ],
        }
    }
}

impl PatternTable {
    /// Find the first splitter that matches at offset 0 of `window`
    ///
    /// Returns the kind and the matched text.
    #[must_use]
    pub fn splitter_at_start<'a>(&self, window: &'a str) -> Option<(SplitterKind, &'a str)> {
        self.splitters.iter().find_map(|pattern| {
            pattern
                .regex
                .find(window)
                .filter(|m| m.start() == 0)
                .map(|m| (pattern.kind, m.as_str()))
        })
    }
}
