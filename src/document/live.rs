//! Shared document whose content can be replaced.
//!
//! Models a live page: another task can swap in new content (navigation, a
//! late render) while resolvers poll it. Handles taken before a swap are
//! stale afterwards.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::SnapshotId;
use crate::query::{Axis, By};

use super::Document;
use super::snapshot::{NodeRef, StaticDocument};
use super::tree::Node;

// ============================================================================
// LiveDocument
// ============================================================================

/// Shared, replaceable document.
///
/// Cloning yields another handle to the same page.
///
/// # Example
///
/// ```
/// use label_locator::{LiveDocument, Node};
///
/// let page = LiveDocument::new(Node::div());
/// let before = page.snapshot().id();
///
/// page.replace(Node::form().with_child(Node::label("Email")));
/// assert_ne!(page.snapshot().id(), before);
/// ```
#[derive(Clone)]
pub struct LiveDocument {
    current: Arc<RwLock<Arc<StaticDocument>>>,
}

impl fmt::Debug for LiveDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveDocument")
            .field("snapshot", &self.current.read().id())
            .finish_non_exhaustive()
    }
}

impl LiveDocument {
    /// Creates a live document showing `root`.
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self::from_snapshot(StaticDocument::new(root))
    }

    /// Creates a live document showing an existing snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: StaticDocument) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Replaces the page content, returning the new snapshot's ID.
    pub fn replace(&self, root: Node) -> SnapshotId {
        let snapshot = Arc::new(StaticDocument::new(root));
        let id = snapshot.id();
        let previous = std::mem::replace(&mut *self.current.write(), snapshot);
        debug!(from = %previous.id(), to = %id, "Document replaced");
        id
    }

    /// Returns the snapshot currently shown.
    #[must_use]
    pub fn snapshot(&self) -> Arc<StaticDocument> {
        Arc::clone(&*self.current.read())
    }
}

// ============================================================================
// Document
// ============================================================================

#[async_trait]
impl Document for LiveDocument {
    type Element = NodeRef;

    async fn find_all(&self, by: &By) -> Result<Vec<NodeRef>> {
        self.snapshot().query(by)
    }

    async fn find_all_from(&self, anchor: &NodeRef, axis: Axis, by: &By) -> Result<Vec<NodeRef>> {
        self.snapshot().query_from(anchor, axis, by)
    }

    async fn is_displayed(&self, element: &NodeRef) -> Result<bool> {
        self.snapshot().is_visible(element)
    }

    async fn get_attribute(&self, element: &NodeRef, name: &str) -> Result<Option<String>> {
        Ok(self
            .snapshot()
            .attribute(element, name)?
            .map(str::to_string))
    }

    async fn get_normalized_text(&self, element: &NodeRef) -> Result<String> {
        self.snapshot().normalized_text(element)
    }
}

// ============================================================================
// Tests
// ============================================================================
