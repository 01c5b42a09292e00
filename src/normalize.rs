//! Text normalizations applied around the line marker

use crate::extractor::ContentType;
use crate::patterns::{DELIMITER, LINK, NORMALIZED_LINK, PatternTable};
use regex::Captures;
use std::borrow::Cow;

/// Snap a byte index to the nearest valid UTF-8 char boundary (backwards)
const fn snap_to_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while !s.is_char_boundary(i) && i > 0 {
        i -= 1;
    }
    i
}

/// Detect the line delimiter (`"\n"` or `"\r\n"`) used by a body
///
/// The body is scanned chunk by chunk so that huge single-line bodies do not
/// cost a full regex pass. Falls back to `"\n"`.
#[must_use]
pub fn get_delimiter(body: &str, chunk_size: usize) -> &'static str {
    let chunk_size = chunk_size.max(1);
    let mut start = 0;

    while start < body.len() {
        let mut end = snap_to_char_boundary(body, start.saturating_add(chunk_size));
        if end <= start {
            // chunk smaller than the current char, take the whole char
            end = body[start..]
                .char_indices()
                .nth(1)
                .map_or(body.len(), |(i, _)| start + i);
        }

        if let Some(m) = DELIMITER.find(&body[start..end]) {
            let crlf = m.as_str() == "\r\n"
                || (m.start() == 0 && start > 0 && body.as_bytes()[start - 1] == b'\r');
            return if crlf { "\r\n" } else { "\n" };
        }
        start = end;
    }

    "\n"
}

/// Prepare a body for line marking
///
/// `<http://...>` links are rewritten to `@@http://...@@` so the closing `>`
/// cannot be taken for a quotation marker, unless the link sits on a line
/// that is already quoted. For plain-text bodies the first
/// `On {date}, {somebody} wrote:` header is moved onto its own line.
#[must_use]
pub fn preprocess(
    body: &str,
    delimiter: &str,
    content_type: ContentType,
    patterns: &PatternTable,
    max_length: usize,
) -> String {
    let linked = LINK.replace_all(body, |caps: &Captures| {
        let (Some(whole), Some(url)) = (caps.get(0), caps.get(1)) else {
            return String::new();
        };
        let quoted_line = body[..whole.start()]
            .rfind('\n')
            .is_some_and(|nl| nl > 0 && body[nl + 1..].starts_with('>'));
        if quoted_line {
            whole.as_str().to_string()
        } else {
            format!("@@{}@@", url.as_str())
        }
    });

    if content_type != ContentType::Plain || linked.len() >= max_length {
        return linked.into_owned();
    }

    match patterns.on_date_wrote.find(&linked) {
        Some(m) if m.start() > 0 && !linked[..m.start()].ends_with('\n') => {
            let mut out = String::with_capacity(linked.len() + delimiter.len());
            out.push_str(&linked[..m.start()]);
            out.push_str(delimiter);
            out.push_str(&linked[m.start()..]);
            out
        }
        _ => linked.into_owned(),
    }
}

/// Undo the link rewriting done by [`preprocess`] and trim the result
#[must_use]
pub fn postprocess(body: &str) -> String {
    NORMALIZED_LINK.replace_all(body, "<$1>").trim().to_string()
}

/// Convert CRLF line endings to LF, reporting whether anything was replaced
#[must_use]
pub fn crlf_to_lf(body: &str, chunk_size: usize) -> (Cow<'_, str>, bool) {
    if get_delimiter(body, chunk_size) == "\r\n" {
        (Cow::Owned(body.replace("\r\n", "\n")), true)
    } else {
        (Cow::Borrowed(body), false)
    }
}

/// Put CRLF line endings back after [`crlf_to_lf`]
#[must_use]
pub fn restore_crlf(body: &str, replaced: bool) -> String {
    if replaced {
        body.replace('\n', "\r\n")
    } else {
        body.to_string()
    }
}
