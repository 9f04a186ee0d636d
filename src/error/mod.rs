//! Error module for the probabilistic data structures crate.
//!
//! Every fallible operation returns [`PdsResult`]. Construction problems are
//! reported as [`PdsError::InvalidConfiguration`], operations a structure
//! cannot honor as [`PdsError::UnsupportedOperation`], and counting filters
//! refuse to erase what was never inserted with [`PdsError::CounterUnderflow`].

use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::data_structures::hash::HashError;

pub mod config;

/// Result type alias used throughout the crate.
pub type PdsResult<T> = Result<T, PdsError>;

/// Core error enum for the crate.
#[derive(Error, Debug)]
pub enum PdsError {
    /// A structure was asked to use parameters it cannot work with.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The structure does not implement the requested operation.
    #[error("{structure} does not support {operation}")]
    UnsupportedOperation {
        /// Name of the structure
        structure: &'static str,
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Erasing would take a counter below zero; nothing was modified.
    #[error("Counter at position {position} would underflow")]
    CounterUnderflow {
        /// Index of the first counter that is already zero
        position: usize,
    },

    /// Hash function construction failed.
    #[error("Hash error: {0}")]
    Hash(#[from] HashError),

    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: PdsError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,

    /// Span trace captured by `tracing-error`, if available.
    pub trace: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    pub fn new<S: Into<String>>(error: PdsError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
            trace: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Captures the current span trace into the context.
    pub fn with_span_trace(mut self) -> Self {
        let trace = tracing_error::SpanTrace::capture();
        if trace.status() == tracing_error::SpanTraceStatus::CAPTURED {
            self.trace = Some(trace.to_string());
        }
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// A simple error reporter implementation that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            trace = context.trace.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}
