//! Structural queries over a document.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `selector` | [`By`] selector, [`Axis`] and their XPath rendering |
//! | `text` | Text normalisation and XPath string quoting |

// ============================================================================
// Submodules
// ============================================================================

/// Element selectors.
pub mod selector;

/// Text helpers shared by selectors and documents.
pub mod text;

// ============================================================================
// Re-exports
// ============================================================================

pub use selector::{Axis, By, INPUT_TAGS, LABEL_TAGS, NAME_ATTRIBUTES, is_input_like};
pub use text::{normalize_whitespace, xpath_literal};
