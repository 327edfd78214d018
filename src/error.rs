//! Error handling for the Inochi application.
//! Defines custom error types and results used throughout the application.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Custom error types for Inochi operations.
///
/// This enum represents all possible errors that can occur within the Inochi application.
/// It implements the standard Error trait through thiserror's derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// File system failure tied to a specific path and operation
    #[error("Failed to {operation} '{path}': {source}.")]
    FileError {
        operation: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    /// Represents errors that occur during template rendering
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// The requested template is not present in the template directory
    #[error("Template '{template}' not found in '{template_dir}'.")]
    TemplateNotFoundError { template: String, template_dir: String },

    /// Represents errors that occur during configuration parsing or resolution
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents validation failures in user input or data
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// An external tool (such as the merge tool) could not be run
    #[error("External tool error: {0}.")]
    ExternalToolError(String),
}

impl Error {
    /// Wraps an IO error together with the path and operation that caused it.
    pub fn file<P: AsRef<Path>>(operation: &'static str, path: P, source: io::Error) -> Self {
        Error::FileError { operation, path: path.as_ref().display().to_string(), source }
    }
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
