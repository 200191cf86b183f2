//! # Error Handling
//!
//! Error taxonomy for the recolor workflow. Every failure the library can
//! produce is a [`RecolorError`] variant carrying an [`ErrorContext`] with the
//! time it happened, the operation in progress, and an optional recovery
//! suggestion.
//!
//! ## Error Families
//!
//! | Family | Variants | Handling |
//! |--------|----------|----------|
//! | Intake | `UnsupportedFormat`, `FileTooLarge`, `ReadFailure` | shown inline, controller untouched |
//! | Edit request | `MissingCredentials`, `ProviderError`, `NoImageReturned` | controller moves to `Error`, detail logged |
//! | Controller | `Busy`, `State` | operation rejected, state untouched |
//! | Output | `Io` | download failed, result kept for another attempt |
//! | Configuration | `Config` | reported before any work starts |
//!
//! Nothing here is retried automatically. The user resubmits by hand.
//!
//! ## Usage
//!
//! ```rust
//! use accessory_recolor::error::{HasRecoverySuggestion, RecolorError};
//!
//! let error = RecolorError::file_too_large(6 * 1024 * 1024, 5 * 1024 * 1024)
//!     .with_operation("upload")
//!     .with_recovery_suggestion("Export the photo at a lower resolution");
//!
//! assert_eq!(error.category(), "file_too_large");
//! assert!(error.is_intake());
//! assert_eq!(
//!     error.recovery_suggestion(),
//!     Some("Export the photo at a lower resolution")
//! );
//! ```

use std::time::SystemTime;

use thiserror::Error;

/// Message shown for every failed edit request. Provider detail is logged, not displayed.
pub const GENERIC_EDIT_FAILURE: &str =
    "Something went wrong while processing the image. Please try again.";

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            recovery_suggestion: None,
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation that was being performed
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.recovery_suggestion = Some(suggestion.into());
        self
    }
}

/// Base error type for the recolor library
#[derive(Debug, Error)]
pub enum RecolorError {
    /// Declared media type is not in the intake allow-list
    #[error("Unsupported file format '{declared}': expected image/jpeg, image/png or image/webp")]
    UnsupportedFormat {
        declared: String,
        context: ErrorContext,
    },
    /// File exceeds the intake size limit
    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        size: u64,
        limit: u64,
        context: ErrorContext,
    },
    /// Reading or decoding the file failed
    #[error("Failed to read image: {reason}")]
    ReadFailure {
        reason: String,
        context: ErrorContext,
    },
    /// No provider API key was configured
    #[error("Provider API key is missing")]
    MissingCredentials { context: ErrorContext },
    /// Transport, HTTP status, or response decoding failure
    #[error("Provider request failed{}: {reason}", http_status_suffix(.status))]
    ProviderError {
        status: Option<u16>,
        reason: String,
        context: ErrorContext,
    },
    /// Provider answered but no segment carried image data
    #[error("Provider returned no image: {reason}")]
    NoImageReturned {
        reason: String,
        context: ErrorContext,
    },
    /// Configuration validation errors
    #[error("Configuration error in '{field}': {reason}")]
    Config {
        field: String,
        reason: String,
        context: ErrorContext,
    },
    /// Operation attempted while an edit request is in flight
    #[error("Cannot {operation} while an edit is processing")]
    Busy {
        operation: String,
        context: ErrorContext,
    },
    /// I/O errors outside intake, such as writing a download
    #[error("I/O error during {operation}{}: {source}", path_suffix(.path))]
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Operation not valid in the current state
    #[error("Cannot {operation}: {reason}")]
    State {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
}

impl RecolorError {
    /// Create an unsupported format error
    pub fn unsupported_format(declared: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            declared: declared.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a file too large error
    pub fn file_too_large(size: u64, limit: u64) -> Self {
        Self::FileTooLarge {
            size,
            limit,
            context: ErrorContext::new(),
        }
    }

    /// Create a read failure error
    pub fn read_failure(reason: impl Into<String>) -> Self {
        Self::ReadFailure {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a missing credentials error
    pub fn missing_credentials() -> Self {
        Self::MissingCredentials {
            context: ErrorContext::new()
                .with_recovery_suggestion("Set GEMINI_API_KEY or pass --api-key"),
        }
    }

    /// Create a provider error
    pub fn provider(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::ProviderError {
            status,
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a no image returned error
    pub fn no_image(reason: impl Into<String>) -> Self {
        Self::NoImageReturned {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a busy error
    pub fn busy(operation: impl Into<String>) -> Self {
        Self::Busy {
            operation: operation.into(),
            context: ErrorContext::new()
                .with_recovery_suggestion("Wait for the current edit to finish or reset"),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: Option<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a state error
    pub fn state(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::State {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::UnsupportedFormat { context, .. } => context,
            Self::FileTooLarge { context, .. } => context,
            Self::ReadFailure { context, .. } => context,
            Self::MissingCredentials { context } => context,
            Self::ProviderError { context, .. } => context,
            Self::NoImageReturned { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Busy { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::State { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::UnsupportedFormat { context, .. } => context,
            Self::FileTooLarge { context, .. } => context,
            Self::ReadFailure { context, .. } => context,
            Self::MissingCredentials { context } => context,
            Self::ProviderError { context, .. } => context,
            Self::NoImageReturned { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Busy { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::State { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::ReadFailure { .. } => "read_failure",
            Self::MissingCredentials { .. } => "missing_credentials",
            Self::ProviderError { .. } => "provider_error",
            Self::NoImageReturned { .. } => "no_image_returned",
            Self::Config { .. } => "config",
            Self::Busy { .. } => "busy",
            Self::Io { .. } => "io",
            Self::State { .. } => "state",
        }
    }

    /// True for errors raised while validating or reading an upload
    pub fn is_intake(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::FileTooLarge { .. } | Self::ReadFailure { .. }
        )
    }

    /// True for errors raised by the edit request
    pub fn is_edit_request(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. }
                | Self::ProviderError { .. }
                | Self::NoImageReturned { .. }
        )
    }

    /// Message suitable for showing to the user.
    ///
    /// Intake errors get a specific inline message. Edit request errors all
    /// collapse to [`GENERIC_EDIT_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFormat { .. } => {
                "Unsupported file format. Please use JPG, PNG or WebP.".to_string()
            }
            Self::FileTooLarge { limit, .. } => format!(
                "File is too large. The maximum allowed size is {}MB.",
                limit / (1024 * 1024)
            ),
            Self::ReadFailure { .. } => "Failed to read the file. Please try again.".to_string(),
            Self::MissingCredentials { .. }
            | Self::ProviderError { .. }
            | Self::NoImageReturned { .. } => GENERIC_EDIT_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

fn http_status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {})", code)).unwrap_or_default()
}

fn path_suffix(path: &Option<String>) -> String {
    path.as_ref()
        .map(|p| format!(" on '{}'", p))
        .unwrap_or_default()
}

/// Result type alias using our custom error type
pub type RecolorResult<T> = Result<T, RecolorError>;

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for RecolorError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

impl From<base64::DecodeError> for RecolorError {
    fn from(error: base64::DecodeError) -> Self {
        Self::read_failure(format!("invalid base64 payload: {}", error))
    }
}
