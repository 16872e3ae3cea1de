//! Queryable documents.
//!
//! The [`Document`] trait is the capability the resolver consumes: structural
//! lookup, a bounded visibility wait, and attribute/text reads. It is owned
//! by the caller; the resolver only queries it.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StaticDocument`] | Immutable in-memory element tree |
//! | [`LiveDocument`] | Shared document whose content can be replaced |
//! | `WebDriverDocument` | Live browser session (feature `webdriver`) |
//!
//! # Example
//!
//! ```
//! use label_locator::{By, Document, Node, StaticDocument};
//!
//! # async fn example() -> label_locator::Result<()> {
//! let document = StaticDocument::new(
//!     Node::div()
//!         .with_child(Node::label("Email"))
//!         .with_child(Node::input().with_attr("id", "email")),
//! );
//!
//! let input = document.find_one(&By::id("email")).await?;
//! assert_eq!(document.get_attribute(&input, "id").await?.as_deref(), Some("email"));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Replaceable shared document.
pub mod live;

/// Immutable in-memory document.
pub mod snapshot;

/// Element tree construction.
pub mod tree;

/// WebDriver-backed document.
#[cfg(feature = "webdriver")]
pub mod webdriver;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::error::{Error, Result};
use crate::query::{Axis, By};

// ============================================================================
// Re-exports
// ============================================================================

pub use live::LiveDocument;
pub use snapshot::{NodeRef, StaticDocument};
pub use tree::Node;

#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverDocument;

// ============================================================================
// Document Trait
// ============================================================================

/// A queryable, renderable document.
///
/// Implementations report a query that ran and matched nothing as
/// [`Error::ElementNotFound`]; every other error is a hard failure.
#[async_trait]
pub trait Document: Send + Sync {
    /// Opaque handle to one element, valid for the document's lifetime.
    type Element: Clone + fmt::Debug + Send + Sync;

    /// Returns all currently matching elements in document order.
    ///
    /// Zero matches is an empty list, not an error.
    async fn find_all(&self, by: &By) -> Result<Vec<Self::Element>>;

    /// Returns the first match in document order.
    ///
    /// # Errors
    ///
    /// [`Error::ElementNotFound`] if nothing matches.
    async fn find_one(&self, by: &By) -> Result<Self::Element> {
        self.find_all(by)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::element_not_found(by.to_string()))
    }

    /// Returns matches along `axis` from `anchor`, in document order.
    ///
    /// Zero matches is an empty list, not an error.
    async fn find_all_from(
        &self,
        anchor: &Self::Element,
        axis: Axis,
        by: &By,
    ) -> Result<Vec<Self::Element>>;

    /// Returns the first match along `axis` from `anchor`.
    ///
    /// # Errors
    ///
    /// [`Error::ElementNotFound`] if nothing matches.
    async fn find_one_from(
        &self,
        anchor: &Self::Element,
        axis: Axis,
        by: &By,
    ) -> Result<Self::Element> {
        self.find_all_from(anchor, axis, by)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::element_not_found(format!("{axis}::{by}")))
    }

    /// Returns `true` if the element is rendered visibly.
    async fn is_displayed(&self, element: &Self::Element) -> Result<bool>;

    /// Reads an attribute; `None` if the element does not carry it.
    async fn get_attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Returns the element's whitespace-collapsed, trimmed text content.
    async fn get_normalized_text(&self, element: &Self::Element) -> Result<String>;

    /// Waits until an element matching `by` is visible.
    ///
    /// Returns the first visible match as soon as one exists.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if no match became visible within `timeout`.
    async fn wait_until_visible(
        &self,
        by: &By,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self::Element> {
        poll_until_visible(self, by, timeout, poll_interval).await
    }
}

// ============================================================================
// Bounded Wait
// ============================================================================

/// Polls `document` until an element matching `by` is visible.
///
/// Checks once immediately, then every `poll_interval` until `timeout`
/// elapses. An element that goes stale between lookup and the visibility
/// check counts as not visible for that round.
pub async fn poll_until_visible<D>(
    document: &D,
    by: &By,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<D::Element>
where
    D: Document + ?Sized,
{
    let deadline = Instant::now() + timeout;
    let mut round = 0u32;

    loop {
        round += 1;
        let candidates = document.find_all(by).await?;
        trace!(selector = %by, round, candidates = candidates.len(), "Polling for visible element");

        for element in candidates {
            match document.is_displayed(&element).await {
                Ok(true) => return Ok(element),
                Ok(false) => {}
                Err(err) if err.is_element_error() => {}
                Err(err) => return Err(err),
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::timeout(
                format!("wait_until_visible({by})"),
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ));
        }
        sleep(poll_interval.min(deadline - now)).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
