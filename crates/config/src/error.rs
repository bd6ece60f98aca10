//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for every stage of loading: fetch, parse, dispatch, validation.
//! - Carry enough context (source location, descriptor tag, variable name) for debugging.
//!
//! Does NOT handle:
//! - Retrying failed fetches (callers own any retry policy).
//! - Per-field JSON coercion failures in env payloads (swallowed by the normalizer).
//!
//! Invariants:
//! - Every variant names the source location, tag, or variable involved.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use thiserror::Error;

use crate::descriptor::{ConfigFormat, DescriptorTag};

/// Errors that can occur while resolving, fetching, or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The provider could not retrieve a payload (I/O failure, HTTP error, bad encoding).
    #[error("Configuration source {location} is unavailable: {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// The payload was absent or contained only whitespace.
    #[error("Configuration content from {location} is empty or invalid")]
    EmptyPayload { location: String },

    /// The payload did not parse as its declared format.
    #[error("Failed to parse {format} configuration from {location}: {message}")]
    MalformedPayload {
        location: String,
        format: ConfigFormat,
        message: String,
    },

    /// No loader constructor is registered for the descriptor's exact tag.
    #[error("Unsupported loader descriptor: {0}")]
    UnsupportedDescriptor(DescriptorTag),

    /// A descriptor field failed validation.
    #[error("Invalid descriptor field {field}: {message}")]
    InvalidDescriptor { field: &'static str, message: String },

    /// A constructor registered for one tag was handed a descriptor of another.
    #[error("Loader constructor for {expected} received a {actual} descriptor")]
    DescriptorMismatch {
        expected: DescriptorTag,
        actual: DescriptorTag,
    },

    /// A registered constructor failed to build its loader.
    #[error("Failed to create loader for {tag}: {source}")]
    LoaderConstruction {
        tag: DescriptorTag,
        #[source]
        source: Box<ConfigError>,
    },

    /// The nested mapping could not be deserialized into the settings type.
    #[error("Settings validation failed: {0}")]
    Validation(String),

    /// An environment variable configuring this library holds an invalid value.
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Global loader registry is already initialized")]
    RegistryAlreadyInitialized,

    #[error("Global loader registry is not initialized")]
    RegistryNotInitialized,

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl ConfigError {
    /// Returns the innermost error, looking through `LoaderConstruction` wrappers.
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            ConfigError::LoaderConstruction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
