//! Split analysed text into plain and flagged segments for rendering.
//!
//! Error offsets are character indices into the submitted text. Spans are
//! applied in ascending `start_index` order; a span that is out of range,
//! empty, or overlaps one already applied is skipped.

use yazim_core::types::GrammarError;

/// A run of the analysed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    /// `error_index` points into the original `errors` slice.
    Flagged { text: &'a str, error_index: usize },
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(text) => text,
            Segment::Flagged { text, .. } => text,
        }
    }
}

/// Byte offset of every char boundary, plus the end of the string.
fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

pub fn segments<'a>(text: &'a str, errors: &[GrammarError]) -> Vec<Segment<'a>> {
    let boundaries = char_boundaries(text);
    let char_len = boundaries.len() - 1;

    let mut order: Vec<usize> = (0..errors.len()).collect();
    order.sort_by_key(|&i| errors[i].start_index);

    let mut out = Vec::new();
    let mut cursor = 0usize;

    for error_index in order {
        let error = &errors[error_index];
        let (start, end) = (error.start_index, error.end_index);
        if start >= end || end > char_len || start < cursor {
            tracing::debug!(start, end, "Skipping unusable error span");
            continue;
        }
        if start > cursor {
            out.push(Segment::Plain(&text[boundaries[cursor]..boundaries[start]]));
        }
        out.push(Segment::Flagged {
            text: &text[boundaries[start]..boundaries[end]],
            error_index,
        });
        cursor = end;
    }

    if cursor < char_len {
        out.push(Segment::Plain(&text[boundaries[cursor]..]));
    }
    out
}
