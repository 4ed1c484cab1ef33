//! Compiled templates and the render façade.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;
use crate::eval::{call_procedure, Value};
use crate::scan::synthesize;
use crate::syntax::{parse_source, Procedure};
use crate::tags::TagOverrides;

/// Per-call compilation options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Name the data context is bound to inside embedded code.
    pub variable: String,
    /// Tag overrides; unset roles use the defaults.
    pub tags: TagOverrides,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            variable: "data".to_string(),
            tags: TagOverrides::default(),
        }
    }
}

/// A compiled template: re-invocable with different data contexts, with no
/// shared mutable state between invocations.
#[derive(Clone, Debug)]
pub struct Template {
    procedure: Procedure,
}

impl Template {
    /// Compile template text: synthesize the procedure, then compile it.
    pub fn compile(template: &str, options: &Options) -> Result<Self, Error> {
        let tags = options.tags.resolve();
        let source = synthesize(template, &options.variable, &tags)?;
        Self::compile_source(&source)
    }

    /// Compile procedure text into an invocable template.
    ///
    /// For synthesizer-produced text a failure here is an internal defect;
    /// it is surfaced as [`Error::Compilation`] rather than swallowed.
    pub fn compile_source(source: &str) -> Result<Self, Error> {
        let procedure = parse_source(source)?;
        debug!(name = %procedure.name, param = %procedure.param, "compiled procedure");
        Ok(Template { procedure })
    }

    /// Invoke the compiled procedure with a data context.
    pub fn render(&self, data: &Value) -> Result<String, Error> {
        let result = call_procedure(&self.procedure, data.clone())?;
        Ok(result.to_string())
    }
}

/// Render template text with a data context, default options.
pub fn render_str(template: &str, data: impl Into<Value>) -> Result<String, Error> {
    render_str_with(template, data, &Options::default())
}

/// Render template text with a data context and explicit options.
pub fn render_str_with(
    template: &str,
    data: impl Into<Value>,
    options: &Options,
) -> Result<String, Error> {
    Template::compile(template, options)?.render(&data.into())
}

/// Render the template file at `path`, default options. Read failures
/// propagate unchanged.
pub fn render_path(path: impl AsRef<Path>, data: impl Into<Value>) -> Result<String, Error> {
    render_path_with(path, data, &Options::default())
}

/// Render the template file at `path` with explicit options.
pub fn render_path_with(
    path: impl AsRef<Path>,
    data: impl Into<Value>,
    options: &Options,
) -> Result<String, Error> {
    let template = fs::read_to_string(path)?;
    render_str_with(&template, data, options)
}

/// Bind a data-producing function to a template path, yielding an
/// output-producing function. The result of the returned closure equals
/// `render_path_with(path, producer(), options)`.
pub fn bind<F>(
    path: impl Into<PathBuf>,
    options: Options,
    producer: F,
) -> impl Fn() -> Result<String, Error>
where
    F: Fn() -> Value,
{
    let path = path.into();
    move || render_path_with(&path, producer(), &options)
}
