//! HTML engine
//!
//! Structural quotes are cut from the tree first. What is left is copied:
//! one copy is annotated with checkpoints and flattened to text for the
//! plain-text marker and resolver, the other is pruned with the resulting
//! checkpoint flags and returned.

use crate::checkpoint::{Checkpoints, flatten};
use crate::dom::{DomProvider, EmailDocument, nesting_depth};
use crate::error::Result;
use crate::extractor::ContentType;
use crate::markers::mark_lines;
use crate::normalize::{crlf_to_lf, preprocess, restore_crlf};
use crate::options::ExtractOptions;
use crate::patterns::PatternTable;
use crate::prune::delete_quotation_tags;
use crate::quotation::process_marked_lines;
use crate::splitter::cut_vendor_quotes;
use tracing::debug;

/// Strip quotations from an HTML body
///
/// Returns the body untouched when it is blank, too long, too deeply nested,
/// or has nothing to cut; otherwise the markup of the pruned `<html>`
/// element, with CRLF line endings when the body used them.
pub fn extract(
    body: &str,
    dom: &dyn DomProvider,
    options: &ExtractOptions,
    patterns: &PatternTable,
) -> Result<String> {
    if body.trim().is_empty() {
        return Ok(body.to_string());
    }

    let (markup, crlf) = crlf_to_lf(body, options.delimiter_chunk_size);
    let document = EmailDocument::parse(&markup, dom)?;

    // Every later pass walks the tree recursively
    let depth = nesting_depth(document.html());
    if depth > options.max_nesting_depth {
        debug!(
            "HTML is nested {depth} levels deep, more than {}; leaving it as is",
            options.max_nesting_depth
        );
        return Ok(body.to_string());
    }

    let cut = cut_vendor_quotes(&document);
    let clean = document.duplicate();

    let checkpoints = Checkpoints::annotate(document.body());
    let flat = flatten(document.body(), &checkpoints);

    let text = preprocess(
        &flat.text,
        "\n",
        ContentType::Html,
        patterns,
        options.max_line_length,
    );
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > options.max_lines_count {
        debug!(
            "Flattened HTML has {} lines, more than {}; leaving it as is",
            lines.len(),
            options.max_lines_count
        );
        return Ok(body.to_string());
    }

    let markers = mark_lines(&lines, patterns, options);
    debug!("Marked {} flattened line(s): {markers}", lines.len());

    let Some(boundary) = process_marked_lines(&lines, &markers).boundary() else {
        return match cut {
            Some(_) => Ok(restore_crlf(&clean.serialize()?, crlf)),
            None => Ok(body.to_string()),
        };
    };

    // The line right after the cut is claimed too: a text node ending there
    // started inside the quotation
    let mut flags = vec![false; checkpoints.len()];
    for id in flat.checkpoints_on(boundary.start, boundary.end) {
        if let Some(flag) = flags.get_mut(id) {
            *flag = true;
        }
    }
    debug!(
        "Pruning {} of {} checkpoint(s)",
        flags.iter().filter(|quoted| **quoted).count(),
        flags.len()
    );

    delete_quotation_tags(clean.body(), 0, &flags);
    Ok(restore_crlf(&clean.serialize()?, crlf))
}
