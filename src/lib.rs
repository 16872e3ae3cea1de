//! Label Locator - Find form inputs by their human-readable label.
//!
//! Given the visible text of a label ("First Name", "Email"), this library
//! locates the input control that label describes, across the ways real
//! forms associate the two.
//!
//! # Resolution
//!
//! A [`LabelResolver`] runs two phases against a caller-owned [`Document`]:
//!
//! 1. **Presence gate**: wait, bounded by a timeout, until a visible label
//!    containing the text exists. If none appears, no lookup runs.
//! 2. **Strategy chain**: try each [`Strategy`] in order and return the
//!    first hit:
//!    - explicit `for`/`id` association
//!    - the first input after the label in document order
//!    - an input nested inside the label
//!    - an input whose `placeholder` or `aria-label` equals the text
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use label_locator::{LabelResolver, Node, Result, StaticDocument};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let page = StaticDocument::new(
//!         Node::form()
//!             .with_child(Node::label("Email"))
//!             .with_child(Node::input().with_attr("type", "email").with_attr("id", "email")),
//!     );
//!
//!     let input = LabelResolver::new()
//!         .resolve(&page, "Email", Duration::from_secs(10))
//!         .await?;
//!     assert_eq!(page.attribute(&input, "id")?, Some("email"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | [`Document`] trait and in-memory/live implementations |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`query`] | [`By`] selectors and text helpers |
//! | [`resolver`] | [`LabelResolver`], options and strategies |
//!
//! # Features
//!
//! - **`webdriver`**: `WebDriverDocument`, a [`Document`] over a W3C
//!   WebDriver session

// ============================================================================
// Modules
// ============================================================================

/// Queryable documents.
///
/// - [`StaticDocument`] - Immutable in-memory tree
/// - [`LiveDocument`] - Replaceable shared tree
pub mod document;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for documents and nodes.
pub mod identifiers;

/// Structural selectors.
pub mod query;

/// Label resolution.
///
/// Use [`LabelResolver::new()`] or [`LabelResolver::with_options()`].
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

// Document types
pub use document::{Document, LiveDocument, Node, NodeRef, StaticDocument};

#[cfg(feature = "webdriver")]
pub use document::WebDriverDocument;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{NodeId, SnapshotId};

// Query types
pub use query::{Axis, By};

// Resolver types
pub use resolver::{
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, LabelGate, LabelResolver, Resolution, ResolverOptions,
    Strategy, StrategyOrder,
};
