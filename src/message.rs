//! Reply extraction from raw RFC 5322 messages

use crate::dom::{DomProvider, Html5Ever};
use crate::error::{ExtractError, Result};
use crate::extractor::{ContentType, Extractor};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The newest part of a message, per body format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// First `text/plain` part with quotations removed
    pub text: Option<String>,
    /// First `text/html` part with quotations removed
    pub html: Option<String>,
}

impl Reply {
    /// Plain text if the message had any, HTML otherwise
    #[must_use]
    pub fn best(&self) -> Option<&str> {
        self.text.as_deref().or(self.html.as_deref())
    }
}

/// Parse a raw message and strip quotations from its text and HTML bodies
///
/// ```rust
/// use email_reply_extract::extract_reply;
///
/// let raw = b"From: bob@example.com\r\n\
///             Subject: Re: Hi\r\n\
///             \r\n\
///             Sure!\r\n\
///             \r\n\
///             On 11-Apr-2011, at 6:54 PM, Alice <alice@example.com> wrote:\r\n\
///             > Lunch?";
///
/// let reply = extract_reply(raw).unwrap();
/// assert_eq!(reply.text.as_deref(), Some("Sure!"));
/// assert_eq!(reply.html, None);
/// ```
pub fn extract_reply(raw: &[u8]) -> Result<Reply> {
    Extractor::default().extract_message(raw)
}

impl Extractor {
    /// Parse a raw message and strip quotations from its bodies
    pub fn extract_message(&self, raw: &[u8]) -> Result<Reply> {
        let parsed =
            mailparse::parse_mail(raw).map_err(|e| ExtractError::Structure(e.to_string()))?;

        let mut bodies = Bodies::default();
        bodies.collect(&parsed)?;

        debug!(
            "Found text part: {}, html part: {}",
            bodies.text.is_some(),
            bodies.html.is_some()
        );

        let dom: &dyn DomProvider = &Html5Ever;
        Ok(Reply {
            text: bodies.text.map(|text| self.extract_plain(&text)),
            html: bodies.html.map(|html| self.extract_html(&html, Some(dom))),
        })
    }
}

#[derive(Default)]
struct Bodies {
    text: Option<String>,
    html: Option<String>,
}

impl Bodies {
    /// Keep the first body of each supported type, depth first
    fn collect(&mut self, part: &mailparse::ParsedMail) -> Result<()> {
        if !part.subparts.is_empty() {
            for subpart in &part.subparts {
                self.collect(subpart)?;
            }
            return Ok(());
        }

        let slot = match part.ctype.mimetype.parse::<ContentType>() {
            Ok(ContentType::Plain) => &mut self.text,
            Ok(ContentType::Html) => &mut self.html,
            Err(_) => return Ok(()),
        };

        if slot.is_none() {
            let body = part
                .get_body()
                .map_err(|e| ExtractError::Decode(e.to_string()))?;
            *slot = Some(body);
        }
        Ok(())
    }
}
