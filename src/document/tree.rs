//! Type-safe element tree construction.
//!
//! Builds the element trees that [`StaticDocument`](super::StaticDocument)
//! and [`LiveDocument`](super::LiveDocument) serve.
//!
//! # Example
//!
//! ```
//! use label_locator::Node;
//!
//! // <div>
//! //   <label for="fn">First Name</label>
//! //   <input id="fn">
//! // </div>
//! let form = Node::div()
//!     .with_child(Node::label("First Name").with_attr("for", "fn"))
//!     .with_child(Node::input().with_attr("id", "fn"));
//!
//! assert_eq!(form.tag(), Some("div"));
//! assert_eq!(form.children().len(), 2);
//! ```

// ============================================================================
// Node
// ============================================================================

/// A node in an element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with a lowercase tag name, attributes in authored order, and
    /// children in document order.
    Element {
        /// Tag name.
        tag: String,
        /// Attribute name/value pairs.
        attributes: Vec<(String, String)>,
        /// Child nodes.
        children: Vec<Node>,
    },

    /// Text content.
    Text(String),
}

// ============================================================================
// Constructors
// ============================================================================

impl Node {
    /// Creates an empty element.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a text node.
    #[inline]
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a `<div>`.
    #[inline]
    #[must_use]
    pub fn div() -> Self {
        Self::element("div")
    }

    /// Creates a `<form>`.
    #[inline]
    #[must_use]
    pub fn form() -> Self {
        Self::element("form")
    }

    /// Creates a `<label>` holding `text`.
    #[inline]
    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self::element("label").with_text(text)
    }

    /// Creates an `<input>`.
    #[inline]
    #[must_use]
    pub fn input() -> Self {
        Self::element("input")
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl Node {
    /// Sets an attribute, replacing any earlier value.
    ///
    /// No-op on text nodes.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attributes, .. } = &mut self {
            let name = name.into().to_ascii_lowercase();
            let value = value.into();
            match attributes.iter_mut().find(|(n, _)| *n == name) {
                Some(existing) => existing.1 = value,
                None => attributes.push((name, value)),
            }
        }
        self
    }

    /// Appends a text child.
    #[inline]
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Self::text(text))
    }

    /// Appends a child node.
    ///
    /// No-op on text nodes.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Appends several child nodes.
    #[must_use]
    pub fn with_children(self, children: impl IntoIterator<Item = Node>) -> Self {
        children.into_iter().fold(self, Self::with_child)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Node {
    /// Returns the tag name, or `None` for text.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text(_) => None,
        }
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            Self::Text(_) => None,
        }
    }

    /// Returns the child nodes; empty for text.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text(_) => &[],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
