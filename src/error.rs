//! Error taxonomy for the compilation pipeline.
//!
//! All errors are fatal: an error raised during scanning, synthesis,
//! compilation or invocation aborts the whole render call, and no partial
//! output is returned. Scan-time errors carry the 1-based template line
//! number so the defect can be located in the source template.

use crate::eval::EvalError;
use crate::syntax::ParseError;

/// Any failure produced by the template pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An opening substitution tag was followed by the wrong closing tag,
    /// or a closing tag appeared with no opener before it.
    #[error("line {line}: tag mismatch, expected `{expected}`, found `{found}`")]
    TagMismatch {
        line: usize,
        expected: String,
        found: String,
    },

    /// An opening substitution tag is never closed on its line.
    #[error("line {line}: substitution tag `{open}` is never closed")]
    UnterminatedTag { line: usize, open: String },

    /// A block-open/close line carries content beyond the marker and an
    /// optional `#` comment.
    #[error("line {line}: block line {text:?} may contain only `{tag}` and an optional comment")]
    MalformedBlockLine {
        line: usize,
        tag: String,
        text: String,
    },

    /// Cumulative block nesting depth did not return to zero.
    #[error("unbalanced blocks: `{open}` and `{close}` do not balance (residual depth {depth})")]
    UnbalancedBlock {
        open: String,
        close: String,
        depth: i32,
    },

    /// A literal span contains a character the literal boundary cannot hold.
    #[error("line {line}: character {ch:?} cannot be embedded in a literal span")]
    InvalidLiteral { line: usize, ch: char },

    /// The synthesized procedure text failed to lex or parse. For
    /// synthesizer-generated text this is an internal defect; syntax errors
    /// in `@=` statement lines surface here as well.
    #[error("synthesized procedure failed to compile: {0}")]
    Compilation(#[from] ParseError),

    /// Embedded code raised a runtime error during invocation.
    #[error("embedded code failed at render time: {0}")]
    Script(#[from] EvalError),

    /// Template file could not be read; propagated unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
