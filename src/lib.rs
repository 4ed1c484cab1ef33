//! Weft template compiler.
//!
//! Templates mix literal text, inline substitutions and embedded statements:
//!
//! ```text
//! <ul>
//! @= for user in data.users
//! @{
//!     <li>{{: user.name :}}</li>
//! @}
//! </ul>
//! ```
//!
//! The scanner synthesizes a textual procedure in a small embedded scripting
//! language, the compiler parses that text into an AST, and a tree-walking
//! interpreter executes it against the caller's data context.

pub mod error;
pub mod escape;
pub mod eval;
pub mod scan;
pub mod syntax;
pub mod tags;
pub mod template;

// Re-exports
pub use error::Error;
pub use escape::esc_html;
pub use eval::Value;
pub use scan::synthesize;
pub use tags::{TagOverrides, Tags};
pub use template::{
    bind, render_path, render_path_with, render_str, render_str_with, Options, Template,
};
