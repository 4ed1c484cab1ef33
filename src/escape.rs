//! Output escaping and quote-safe escaping of literal template spans.

use crate::error::Error;
use crate::tags::Tags;

/// HTML-escape a string: `&`, `<`, `>`, `"` and `'` become character
/// references. Used by the escaped-substitution code path.
pub fn esc_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Make one line of template text safe to embed inside the single-quoted
/// literal boundary the synthesizer emits.
///
/// Literal segments are escaped; spans from a substitution opener through its
/// matching closer are copied verbatim, since they become code rather than
/// text. An opener followed by the wrong closer is a tag mismatch, an opener
/// with no closer on the line is unterminated, and a closer with no opener
/// before it is a mismatch as well.
///
/// Walks the line with an explicit cursor rather than recursing, so
/// pathological long lines cannot exhaust the stack.
pub(crate) fn escape_literal(line: &str, tags: &Tags, line_no: usize) -> Result<String, Error> {
    let markers = [
        tags.raw_open.as_str(),
        tags.raw_close.as_str(),
        tags.esc_open.as_str(),
        tags.esc_close.as_str(),
    ];
    let mut out = String::with_capacity(line.len() + 8);
    let mut cursor = 0;
    loop {
        let Some((start, marker)) = find_first_marker(line, &markers, cursor) else {
            out.push_str(&escape_segment(&line[cursor..], line_no)?);
            return Ok(out);
        };

        let expected = if marker == tags.raw_open {
            &tags.raw_close
        } else if marker == tags.esc_open {
            &tags.esc_close
        } else {
            // A closer with no opener before it.
            return Err(Error::TagMismatch {
                line: line_no,
                expected: format!("`{}` or `{}`", tags.raw_open, tags.esc_open),
                found: marker.to_string(),
            });
        };

        out.push_str(&escape_segment(&line[cursor..start], line_no)?);

        let search_from = start + marker.len();
        let Some((close_start, close_marker)) = find_first_marker(line, &markers, search_from)
        else {
            return Err(Error::UnterminatedTag {
                line: line_no,
                open: marker.to_string(),
            });
        };
        if close_marker != expected {
            return Err(Error::TagMismatch {
                line: line_no,
                expected: expected.clone(),
                found: close_marker.to_string(),
            });
        }

        let end = close_start + close_marker.len();
        out.push_str(&line[start..end]);
        cursor = end;
    }
}

/// Find the earliest occurrence of any marker at or after `from`.
fn find_first_marker<'m>(
    haystack: &str,
    markers: &[&'m str],
    from: usize,
) -> Option<(usize, &'m str)> {
    let mut best: Option<(usize, &'m str)> = None;
    for marker in markers {
        if let Some(offset) = haystack[from..].find(marker) {
            let index = from + offset;
            if best.map_or(true, |(b, _)| index < b) {
                best = Some((index, marker));
            }
        }
    }
    best
}

/// Escape one marker-free segment for embedding in a single-quoted literal.
///
/// The boundary is one source line, so the line controls themselves must be
/// written as escapes. Any other control character has no escaped form and
/// cannot be embedded.
fn escape_segment(segment: &str, line_no: usize) -> Result<String, Error> {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                return Err(Error::InvalidLiteral {
                    line: line_no,
                    ch: c,
                })
            }
            c => out.push(c),
        }
    }
    Ok(out)
}
