//! Unified error handling for the infrastructure layers
//!
//! Provides structured error types with context and recovery suggestions for
//! configuration, logging and storage failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type EducaResult<T> = Result<T, EducaError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Infrastructure error type shared by all crates
#[derive(Error, Debug)]
pub enum EducaError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl EducaError {
    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            EducaError::Config { context, .. } | EducaError::Storage { context, .. } => context,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let context = self.context();
        match self {
            EducaError::Storage { .. } => {
                warn!(
                    error_id = %context.error_id,
                    operation = ?context.operation,
                    error = %self,
                    "Storage error (may be recoverable)"
                );
            }
            EducaError::Config { .. } => {
                error!(
                    error_id = %context.error_id,
                    operation = ?context.operation,
                    suggestions = ?context.recovery_suggestions,
                    error = %self,
                    "Configuration error"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! storage_error {
    ($msg:expr, $operation:expr) => {
        $crate::EducaError::Storage {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new("storage").with_operation($operation),
        }
    };
    ($msg:expr, $operation:expr, $source:expr) => {
        $crate::EducaError::Storage {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new("storage").with_operation($operation),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::EducaError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new("config")
                .with_operation("validate")
                .with_suggestion("Check your configuration file and environment"),
        }
    };
}
