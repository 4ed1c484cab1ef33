//! Template scanner and code synthesizer.
//!
//! Walks the template line by line, classifying each line as a statement
//! line, a block-open, a block-close, or a content line, and emits the
//! textual procedure body the dynamic compiler consumes. Indentation of the
//! emitted text reflects block nesting depth exactly: four spaces per level,
//! plus one level for the procedure body itself.

use tracing::debug;

use crate::error::Error;
use crate::escape::escape_literal;
use crate::tags::Tags;

const INDENT_WIDTH: usize = 4;

/// Per-call scan state: the in-progress procedure body and the current
/// block nesting depth. Allocated fresh for every synthesis call.
struct Scanner<'a> {
    tags: &'a Tags,
    body: String,
    depth: i32,
}

/// Synthesize the textual procedure for `template`, binding the data context
/// to the parameter named `variable`.
///
/// The emitted procedure initializes an empty output buffer, appends one
/// accumulator statement per content line, and returns the buffer. The
/// output-escaping capability is the ambient `esc` builtin of the embedded
/// language, so no import preamble is required.
pub fn synthesize(template: &str, variable: &str, tags: &Tags) -> Result<String, Error> {
    let mut scanner = Scanner {
        tags,
        body: format!("fn template({variable})\n"),
        depth: 0,
    };
    scanner.push_line("output = ''");

    let mut line_count = 0;
    for (index, line) in template.split_inclusive('\n').enumerate() {
        scanner.scan_line(line, index + 1)?;
        line_count = index + 1;
    }

    let residual = scanner.depth;
    if residual != 0 {
        return Err(Error::UnbalancedBlock {
            open: tags.block_open.clone(),
            close: tags.block_close.clone(),
            depth: residual,
        });
    }
    scanner.push_line("return output");

    debug!(
        lines = line_count,
        bytes = scanner.body.len(),
        "synthesized procedure body"
    );
    Ok(scanner.body)
}

impl Scanner<'_> {
    /// Classify and consume one line. Priority order: statement marker,
    /// block-open, block-close, content.
    fn scan_line(&mut self, line: &str, line_no: usize) -> Result<(), Error> {
        let stripped = line.trim_start();
        if let Some(code) = stripped.strip_prefix(self.tags.statement.as_str()) {
            self.push_line(code.trim());
        } else if stripped.starts_with(self.tags.block_open.as_str()) {
            validate_block_line(stripped, &self.tags.block_open, line_no)?;
            self.depth += 1;
        } else if stripped.starts_with(self.tags.block_close.as_str()) {
            validate_block_line(stripped, &self.tags.block_close, line_no)?;
            if self.depth == 0 {
                // A close with no matching open can never balance.
                return Err(Error::UnbalancedBlock {
                    open: self.tags.block_open.clone(),
                    close: self.tags.block_close.clone(),
                    depth: -1,
                });
            }
            self.depth -= 1;
        } else {
            self.content_line(line, line_no)?;
        }
        Ok(())
    }

    /// Emit the accumulator statement for one content line: literal spans
    /// quote-safe inside the single-quoted boundary, substitution markers
    /// replaced by fragments that close the literal, splice the stringified
    /// (or escaped) expression, and reopen the literal.
    fn content_line(&mut self, line: &str, line_no: usize) -> Result<(), Error> {
        let escaped = escape_literal(line, self.tags, line_no)?;
        let spliced = escaped
            .replace(self.tags.raw_open.as_str(), "' + str(")
            .replace(self.tags.raw_close.as_str(), ") + '")
            .replace(self.tags.esc_open.as_str(), "' + esc(")
            .replace(self.tags.esc_close.as_str(), ") + '");
        self.push_line(&format!("output += '{spliced}'"));
        Ok(())
    }

    /// Append one statement at the current indentation.
    fn push_line(&mut self, statement: &str) {
        let width = (usize::try_from(self.depth).unwrap_or(0) + 1) * INDENT_WIDTH;
        for _ in 0..width {
            self.body.push(' ');
        }
        self.body.push_str(statement);
        self.body.push('\n');
    }
}

/// A standalone block line may contain only the marker and an optional
/// `#` comment.
fn validate_block_line(stripped: &str, tag: &str, line_no: usize) -> Result<(), Error> {
    let code = stripped.find('#').map_or(stripped, |i| &stripped[..i]);
    if code.trim() != tag {
        return Err(Error::MalformedBlockLine {
            line: line_no,
            tag: tag.to_string(),
            text: stripped.trim_end().to_string(),
        });
    }
    Ok(())
}
