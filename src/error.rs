//! Unified error types for mule-assess.
//!
//! Errors below the project-processing boundary (parse and IO failures on
//! individual files) are absorbed into [`Finding`](crate::model::Finding)s on
//! the project that produced them. Only configuration and report-writing
//! errors propagate out of a run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for assessment operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AssessError {
    /// A candidate directory lacks the structure of a project
    #[error("Not a project at {path:?}: {reason}")]
    Discovery { path: PathBuf, reason: String },

    /// A configuration or transformation source failed to parse
    #[error("Failed to parse source: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid invocation or configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Report rendering or writing failed
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: crate::reports::ReportError,
    },
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Unexpected end of document with {open} unclosed element(s)")]
    UnexpectedEof { open: usize },

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for assessment operations
pub type Result<T> = std::result::Result<T, AssessError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl AssessError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for malformed XML
    pub fn invalid_xml(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::parse(context, ParseErrorKind::InvalidXml(message.into()))
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a discovery error
    pub fn discovery(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Discovery {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: crate::reports::ReportError) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for AssessError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AssessError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context,
/// creating a chain that shows the path through the code.
///
/// ```ignore
/// use mule_assess::error::ErrorContext;
///
/// let version = read_pom(&pom_path)
///     .with_context(|| format!("reading build descriptor {}", pom_path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<AssessError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: AssessError, new_ctx: &str) -> AssessError {
    match err {
        AssessError::Parse {
            context: existing,
            source,
        } => AssessError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AssessError::Report {
            context: existing,
            source,
        } => AssessError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AssessError::Io {
            path,
            message,
            source,
        } => AssessError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        AssessError::Discovery { path, reason } => AssessError::Discovery {
            path,
            reason: chain_context(new_ctx, &reason),
        },
        AssessError::Config(msg) => AssessError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
