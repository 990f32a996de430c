//! Error handling for tfrender.
//! Defines the error type shared by every pipeline stage and the result alias.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a render run.
///
/// Each variant belongs to the pipeline stage that first detects it.
/// None of them are retried: the same inputs always fail the same way.
#[derive(Error, Debug)]
pub enum Error {
    /// A `--var` literal without a `=` separator or with an empty key.
    #[error("Invalid variable format: '{literal}'. Expected key=value.")]
    FormatError { literal: String },

    /// The variable file exists but cannot be read or is not a mapping.
    #[error("Failed to read config '{}': {reason}.", .path.display())]
    ConfigReadError { path: PathBuf, reason: String },

    /// No template with the given name exists directly under the search root.
    #[error("Template '{name}' not found in '{}'.", .template_dir.display())]
    TemplateNotFoundError { name: String, template_dir: PathBuf },

    /// The template references a variable missing from the merged mapping.
    #[error("Undefined variable '{name}' in template '{template}'{}.", fmt_line(.line))]
    UndefinedVariableError { name: String, template: String, line: Option<usize> },

    /// Any other failure reported by the template engine.
    #[error("Template error: {0}.")]
    TemplateError(#[from] minijinja::Error),

    /// The rendered text could not be written to its destination.
    #[error("Failed to write output '{}': {source}.", .path.display())]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
}

fn fmt_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {line})"),
        None => String::new(),
    }
}

/// Convenience type alias for results of tfrender operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// Prints the one-line message to stderr and exits with status code 1.
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{err}");
    std::process::exit(1);
}
