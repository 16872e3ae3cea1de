//! Error types for label resolution.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use label_locator::{LabelResolver, Result};
//!
//! async fn example(document: &StaticDocument) -> Result<()> {
//!     let input = LabelResolver::new()
//!         .resolve(document, "First Name", Duration::from_secs(10))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`] |
//! | Query | [`Error::UnsupportedSelector`], [`Error::ElementNotFound`], [`Error::StaleElement`] |
//! | Waiting | [`Error::Timeout`] |
//! | Resolution | [`Error::LabelNotVisible`], [`Error::FieldNotFound`] |
//! | External | [`Error::Backend`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when resolver options are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument passed to a document operation.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Query Errors
    // ========================================================================
    /// Selector strategy not supported by this document backend.
    #[error("Unsupported selector: {selector}")]
    UnsupportedSelector {
        /// Selector that could not be evaluated.
        selector: String,
    },

    /// Element not found by selector.
    ///
    /// Structural miss: the query ran and matched nothing. The resolver
    /// treats this as a soft miss inside a strategy.
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector used.
        selector: String,
    },

    /// Element handle outlived the document it was taken from.
    #[error("Stale element: {element}")]
    StaleElement {
        /// The stale element's description.
        element: String,
    },

    // ========================================================================
    // Waiting Errors
    // ========================================================================
    /// Bounded wait expired.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// Presence gate unmet: no visible label contains this text.
    #[error("No visible label contains {label:?} after {timeout_ms}ms")]
    LabelNotVisible {
        /// Label text that was searched for.
        label: String,
        /// Milliseconds waited before giving up.
        timeout_ms: u64,
    },

    /// Strategy chain exhausted: the label exists but no input is associated.
    #[error("No strategy matched an input for label {label:?}")]
    FieldNotFound {
        /// Label text that was searched for.
        label: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// Document backend failure (browser session, transport).
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an unsupported selector error.
    #[inline]
    pub fn unsupported_selector(selector: impl Into<String>) -> Self {
        Self::UnsupportedSelector {
            selector: selector.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element: impl Into<String>) -> Self {
        Self::StaleElement {
            element: element.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a label not visible error.
    #[inline]
    pub fn label_not_visible(label: impl Into<String>, timeout_ms: u64) -> Self {
        Self::LabelNotVisible {
            label: label.into(),
            timeout_ms,
        }
    }

    /// Creates a field not found error.
    #[inline]
    pub fn field_not_found(label: impl Into<String>) -> Self {
        Self::FieldNotFound {
            label: label.into(),
        }
    }

    /// Creates a backend error.
    #[inline]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::LabelNotVisible { .. })
    }

    /// Returns `true` if the resolver could not produce an input.
    ///
    /// Covers both the presence gate and the exhausted strategy chain, for
    /// callers that treat the two identically.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LabelNotVisible { .. } | Self::FieldNotFound { .. }
        )
    }

    /// Returns `true` if this is a structural "query matched nothing" miss.
    #[inline]
    #[must_use]
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }

    /// Returns `true` if this is an element error.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::StaleElement { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
