//! Inochi gives life to new projects.
//! It derives canonical project names, resolves project configuration and
//! scaffolds new projects from templates without ever clobbering files.

/// Command-line interface module for the Inochi application
pub mod cli;

/// Project configuration resolution
/// Applies defaults to `inochi.conf` settings and normalizes dependencies
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling for the Inochi application
pub mod error;

/// Idempotent, backup-preserving file generation
pub mod generate;

/// Logger setup
pub mod logger;

/// Conversions between project names, symbols and program names
pub mod naming;

/// Loading of existing projects
pub mod project;

/// Template rendering engines
pub mod renderer;

/// Generation of new projects
pub mod scaffold;

/// Template lookup and materialization
pub mod template;
