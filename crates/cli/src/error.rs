//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ConfigError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Code 2 is left to clap for usage errors.

use app_config::ConfigError;

/// Structured exit codes for app-config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Source unavailable - I/O failure, HTTP error, timeout, bad encoding.
    ///
    /// Scripts may retry with exponential backoff.
    SourceUnavailable = 3,

    /// Not found - the file, secret, or blob is missing or empty.
    NotFound = 4,

    /// Validation error - malformed payload or invalid arguments.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Unsupported - no loader is registered for the descriptor.
    Unsupported = 6,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::SourceUnavailable { .. } => ExitCode::SourceUnavailable,

            ConfigError::EmptyPayload { .. } => ExitCode::NotFound,

            ConfigError::MalformedPayload { .. }
            | ConfigError::InvalidDescriptor { .. }
            | ConfigError::InvalidValue { .. }
            | ConfigError::Validation(_) => ExitCode::ValidationError,

            ConfigError::UnsupportedDescriptor(_) => ExitCode::Unsupported,

            // Constructor failures - classify by the underlying error
            ConfigError::LoaderConstruction { source, .. } => Self::from(source.as_ref()),

            ConfigError::DescriptorMismatch { .. }
            | ConfigError::RegistryAlreadyInitialized
            | ConfigError::RegistryNotInitialized
            | ConfigError::DotenvParse { .. }
            | ConfigError::DotenvIo { .. }
            | ConfigError::DotenvUnknown => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no ConfigError is found in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ConfigError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}
