//! # Error Handling
//!
//! Centralized error type for fleet-sync, built on `thiserror`. Each variant
//! carries the context an operator needs to locate the cause: the offending
//! path for configuration problems, the file and module for rendering
//! problems, the command and stderr for git problems.
//!
//! Startup errors (`ConfigParse`, `DirectoryNotFound`, `EmptyRegistry`) are
//! fatal and abort the run. `InvalidModuleName` and the git variants abort
//! only the affected module. `TemplateMissing` and `Render` abort the run,
//! since a broken or missing template indicates configuration drift that
//! must be fixed rather than skipped.

use thiserror::Error;

/// Main error type for fleet-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration document exists but could not be parsed.
    #[error("Configuration parsing error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A required directory (typically the template tree) is missing.
    ///
    /// Includes an optional hint telling the operator how to recover.
    #[error("Directory not found: {path}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    DirectoryNotFound {
        path: String,
        /// Optional hint for how to resolve the missing directory
        hint: Option<String>,
    },

    /// The managed-modules registry parsed but yielded no entries.
    #[error("No modules found in {path}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    EmptyRegistry {
        path: String,
        /// Optional hint for how to resolve the empty registry
        hint: Option<String>,
    },

    /// A module identifier contains more than one namespace separator.
    #[error("Invalid module name '{name}': expected at most one '/' separator")]
    InvalidModuleName { name: String },

    /// A managed file has no source template under the template tree.
    #[error("Template {path} for {file} in {module} does not exist")]
    TemplateMissing {
        path: String,
        file: String,
        module: String,
    },

    /// An error occurred while evaluating a template.
    ///
    /// May include the name of the problematic variable when applicable.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The template variable that caused the error, if applicable
        variable: Option<String>,
    },

    /// A rendering failure annotated with the file and module it hit.
    #[error("Error while rendering {file} in {module}: {source}")]
    Render {
        file: String,
        module: String,
        source: Box<Error>,
    },

    /// An error occurred while cloning a module's repository.
    #[error("Git clone error for {url}@{branch}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        branch: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An error occurred while executing a git command in a working copy.
    #[error("Git command failed in {dir}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
