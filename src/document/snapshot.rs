//! Immutable in-memory document.
//!
//! A [`StaticDocument`] flattens an element tree into a pre-order arena, so
//! document order is index order and each element's descendants occupy a
//! contiguous index range. Structural axes reduce to index comparisons:
//!
//! | Axis | Condition for node `n` relative to element `e` |
//! |------|-----------------------------------------------|
//! | descendant | `e < n < end(e)` |
//! | following | `n >= end(e)` |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::identifiers::{NodeId, SnapshotId};
use crate::query::{Axis, By, LABEL_TAGS, NAME_ATTRIBUTES, is_input_like, normalize_whitespace};

use super::Document;
use super::tree::Node;

// ============================================================================
// Types
// ============================================================================

/// Handle to one element of a [`StaticDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    snapshot: SnapshotId,
    node: NodeId,
}

impl NodeRef {
    /// Returns the snapshot this handle belongs to.
    #[inline]
    #[must_use]
    pub fn snapshot_id(&self) -> SnapshotId {
        self.snapshot
    }

    /// Returns the node's document-order position.
    #[inline]
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.node
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node, self.snapshot)
    }
}

/// One arena slot.
#[derive(Debug)]
struct Slot {
    /// Tag name; `None` for text.
    tag: Option<String>,
    /// Text content for text slots.
    text: String,
    attributes: FxHashMap<String, String>,
    /// Exclusive end of this node's subtree.
    end: usize,
    /// Hidden by itself or an ancestor.
    hidden: bool,
}

impl Slot {
    fn is_element(&self) -> bool {
        self.tag.is_some()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

// ============================================================================
// StaticDocument
// ============================================================================

/// Immutable in-memory document.
#[derive(Debug)]
pub struct StaticDocument {
    id: SnapshotId,
    slots: Vec<Slot>,
}

impl StaticDocument {
    /// Builds a document from a root node.
    #[must_use]
    pub fn new(root: Node) -> Self {
        let mut slots = Vec::new();
        flatten(root, false, &mut slots);
        Self {
            id: SnapshotId::generate(),
            slots,
        }
    }

    /// Returns this snapshot's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// Returns the number of nodes, text included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the document has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ============================================================================
// StaticDocument - Queries
// ============================================================================

impl StaticDocument {
    /// Evaluates a selector, returning matches in document order.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedSelector`] for [`By::XPath`].
    pub fn query(&self, by: &By) -> Result<Vec<NodeRef>> {
        Ok(self.matching(by)?.map(|i| self.node_ref(i)).collect())
    }

    /// Evaluates a selector along `axis` from `anchor`.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleElement`] if `anchor` belongs to another snapshot
    /// - [`Error::UnsupportedSelector`] for [`By::XPath`]
    pub fn query_from(&self, anchor: &NodeRef, axis: Axis, by: &By) -> Result<Vec<NodeRef>> {
        let start = anchor.node.index();
        let end = self.slot(anchor)?.end;

        Ok(self
            .matching(by)?
            .filter(|&i| match axis {
                Axis::Following => i >= end,
                Axis::Descendant => start < i && i < end,
            })
            .map(|i| self.node_ref(i))
            .collect())
    }

    /// Returns `true` if the element is visible.
    pub fn is_visible(&self, element: &NodeRef) -> Result<bool> {
        Ok(!self.slot(element)?.hidden)
    }

    /// Reads an attribute.
    pub fn attribute(&self, element: &NodeRef, name: &str) -> Result<Option<&str>> {
        Ok(self.slot(element)?.attr(&name.to_ascii_lowercase()))
    }

    /// Returns the element's tag name.
    pub fn tag_name(&self, element: &NodeRef) -> Result<&str> {
        self.slot(element)?
            .tag
            .as_deref()
            .ok_or_else(|| Error::invalid_argument(format!("{element} is not an element")))
    }

    /// Returns the normalised text content of an element.
    pub fn normalized_text(&self, element: &NodeRef) -> Result<String> {
        self.slot(element)?;
        Ok(self.text_of(element.node.index()))
    }
}

// ============================================================================
// StaticDocument - Internal
// ============================================================================

impl StaticDocument {
    fn slot(&self, element: &NodeRef) -> Result<&Slot> {
        if element.snapshot != self.id {
            return Err(Error::stale_element(element.to_string()));
        }
        self.slots
            .get(element.node.index())
            .ok_or_else(|| Error::stale_element(element.to_string()))
    }

    fn matching<'a>(&'a self, by: &'a By) -> Result<Box<dyn Iterator<Item = usize> + 'a>> {
        Ok(match by {
            By::Id(id) => Box::new(
                self.elements()
                    .filter(move |&i| self.slots[i].attr("id") == Some(id.as_str())),
            ),
            By::Label(text) => Box::new(self.labels_containing(text).into_iter()),
            By::Input => Box::new(self.inputs()),
            By::InputNamed(text) => Box::new(self.inputs().filter(move |&i| {
                NAME_ATTRIBUTES
                    .iter()
                    .any(|name| self.slots[i].attr(name) == Some(text.as_str()))
            })),
            By::XPath(_) => return Err(Error::unsupported_selector(by.to_string())),
        })
    }

    fn node_ref(&self, index: usize) -> NodeRef {
        NodeRef {
            snapshot: self.id,
            node: NodeId::new(index as u32),
        }
    }

    fn elements(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.slots.len()).filter(|&i| self.slots[i].is_element())
    }

    fn inputs(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements().filter(|&i| {
            let slot = &self.slots[i];
            slot.tag
                .as_deref()
                .is_some_and(|tag| is_input_like(tag, slot.attr("type")))
        })
    }

    fn labels_containing(&self, text: &str) -> Vec<usize> {
        if text.is_empty() {
            return Vec::new();
        }
        self.elements()
            .filter(|&i| {
                self.slots[i]
                    .tag
                    .as_deref()
                    .is_some_and(|tag| LABEL_TAGS.contains(&tag))
            })
            .filter(|&i| self.text_of(i).contains(text))
            .collect()
    }

    fn text_of(&self, index: usize) -> String {
        let slot = &self.slots[index];
        if !slot.is_element() {
            return normalize_whitespace(&slot.text);
        }
        let raw: String = self.slots[index + 1..slot.end]
            .iter()
            .filter(|s| !s.is_element())
            .map(|s| s.text.as_str())
            .collect();
        normalize_whitespace(&raw)
    }
}

// ============================================================================
// Flattening
// ============================================================================

/// Appends `node` and its subtree in pre-order, returning the subtree end.
fn flatten(node: Node, parent_hidden: bool, slots: &mut Vec<Slot>) -> usize {
    let index = slots.len();
    match node {
        Node::Text(text) => {
            slots.push(Slot {
                tag: None,
                text,
                attributes: FxHashMap::default(),
                end: index + 1,
                hidden: parent_hidden,
            });
        }
        Node::Element {
            tag,
            attributes,
            children,
        } => {
            let attributes: FxHashMap<String, String> = attributes.into_iter().collect();
            let hidden = parent_hidden || hides(&tag, &attributes);
            slots.push(Slot {
                tag: Some(tag),
                text: String::new(),
                attributes,
                end: index + 1,
                hidden,
            });
            let mut end = index + 1;
            for child in children {
                end = flatten(child, hidden, slots);
            }
            slots[index].end = end;
        }
    }
    slots.len()
}

/// Returns `true` if an element is not rendered.
fn hides(tag: &str, attributes: &FxHashMap<String, String>) -> bool {
    if attributes.contains_key("hidden") {
        return true;
    }
    if tag == "input"
        && attributes
            .get("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return true;
    }
    attributes.get("style").is_some_and(|style| {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    })
}

// ============================================================================
// Document
// ============================================================================

#[async_trait]
impl Document for StaticDocument {
    type Element = NodeRef;

    async fn find_all(&self, by: &By) -> Result<Vec<NodeRef>> {
        self.query(by)
    }

    async fn find_all_from(&self, anchor: &NodeRef, axis: Axis, by: &By) -> Result<Vec<NodeRef>> {
        self.query_from(anchor, axis, by)
    }

    async fn is_displayed(&self, element: &NodeRef) -> Result<bool> {
        self.is_visible(element)
    }

    async fn get_attribute(&self, element: &NodeRef, name: &str) -> Result<Option<String>> {
        Ok(self.attribute(element, name)?.map(str::to_string))
    }

    async fn get_normalized_text(&self, element: &NodeRef) -> Result<String> {
        self.normalized_text(element)
    }
}

// ============================================================================
// Tests
// ============================================================================
