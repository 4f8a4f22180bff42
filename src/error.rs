//! # Error Handling
//!
//! This module defines the centralized error type for `skaffold-beam`. It uses
//! the `thiserror` library to build one `Error` enum covering every failure
//! the generation engine can report, each with enough context to point the
//! user at the offending story, project, or template.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum of all failure modes.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Warnings (for example a project without a template directory) are not
//! errors and never travel through this type; they are logged and collected
//! on the run's plan instead.

use thiserror::Error;

/// Main error type for skaffold-beam operations
#[derive(Error, Debug)]
pub enum Error {
    /// The meta-repo story descriptor could not be loaded or is inconsistent.
    #[error("Story error: {message}")]
    Story { message: String },

    /// The cluster inventory could not be loaded.
    #[error("Inventory error for {path}: {message}")]
    Inventory { path: String, message: String },

    /// A project's branch head reference could not be resolved.
    ///
    /// Always fatal to tag calculation.
    #[error("Head reference error for {project}@{branch}: {message}")]
    HeadRef {
        project: String,
        branch: String,
        message: String,
    },

    /// A manifest template failed to parse or execute.
    ///
    /// May include the name of the problematic variable when applicable.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The template variable that caused the error, if applicable
        variable: Option<String>,
    },

    /// An error occurred with a storage operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// Required run configuration is missing or invalid.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
