//! Element locator strategies.
//!
//! Provides typed `By` selectors covering the structural queries label
//! resolution needs: text containment, attribute equality, the document-order
//! "following" axis and the descendant axis.
//!
//! Label text is carried as data, never spliced into a query string. Backends
//! that speak XPath get a correctly quoted expression from [`By::to_xpath`].
//!
//! # Example
//!
//! ```
//! use label_locator::By;
//!
//! // Label element containing text
//! let label = By::label("First Name");
//! assert_eq!(label.to_xpath(), "//label[contains(normalize-space(.), 'First Name')]");
//!
//! // By ID
//! let input = By::id("fn");
//! assert_eq!(input.to_xpath(), "//*[@id='fn']");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::text::xpath_literal;

// ============================================================================
// Constants
// ============================================================================

/// Tags treated as label-like elements.
pub const LABEL_TAGS: &[&str] = &["label"];

/// Tags treated as input-like elements.
///
/// `<input type="hidden">` is excluded separately by [`is_input_like`].
pub const INPUT_TAGS: &[&str] = &["input", "textarea", "select"];

/// Attributes carrying an input's own name text.
pub const NAME_ATTRIBUTES: &[&str] = &["placeholder", "aria-label"];

/// XPath predicate body selecting input-like elements via `self::` tests.
const INPUT_PREDICATE: &str =
    "self::input[not(@type='hidden')] or self::textarea or self::select";

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// Element whose `id` attribute equals the value.
    ///
    /// # Example
    /// ```ignore
    /// By::Id("fn")  // <input id="fn">
    /// ```
    #[serde(rename = "id")]
    Id(String),

    /// Label-like element whose normalised text contains the value.
    ///
    /// Substring semantics tolerate decoration such as a trailing `*` on
    /// required fields. An empty value matches nothing.
    #[serde(rename = "label")]
    Label(String),

    /// Any input-like element.
    ///
    /// Usually combined with an [`Axis`] relative to a label element.
    #[serde(rename = "input")]
    Input,

    /// Input-like elements whose `placeholder` or `aria-label` equals the value.
    #[serde(rename = "inputNamed")]
    InputNamed(String),

    /// Raw XPath expression.
    ///
    /// Passed through to backends that evaluate XPath natively. In-memory
    /// documents reject it.
    #[serde(rename = "xpath")]
    XPath(String),
}

impl By {
    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a label text selector.
    #[inline]
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    /// Creates a selector for any input-like element.
    #[inline]
    #[must_use]
    pub fn input() -> Self {
        Self::Input
    }

    /// Creates a selector for inputs named by placeholder or `aria-label`.
    #[inline]
    pub fn input_named(text: impl Into<String>) -> Self {
        Self::InputNamed(text.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Label(_) => "label",
            Self::Input => "input",
            Self::InputNamed(_) => "inputNamed",
            Self::XPath(_) => "xpath",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Label(v) | Self::InputNamed(v) | Self::XPath(v) => v,
            Self::Input => "",
        }
    }

    /// Renders this selector as an XPath 1.0 expression over the whole
    /// document.
    ///
    /// All user text goes through [`xpath_literal`], so quotes in label text
    /// cannot break out of the expression.
    #[must_use]
    pub fn to_xpath(&self) -> String {
        match self {
            Self::XPath(expr) => expr.clone(),
            _ => format!("//{}", self.node_test()),
        }
    }

    /// Renders this selector relative to a context element.
    ///
    /// Returns `None` for [`By::XPath`], which has no relative form.
    #[must_use]
    pub fn to_xpath_from(&self, axis: Axis) -> Option<String> {
        match self {
            Self::XPath(_) => None,
            _ => Some(format!("{}{}", axis.xpath_prefix(), self.node_test())),
        }
    }

    /// Node test and predicates, without an axis.
    fn node_test(&self) -> String {
        match self {
            Self::Id(id) => format!("*[@id={}]", xpath_literal(id)),
            Self::Label(text) if text.is_empty() => "label[false()]".to_string(),
            Self::Label(text) => {
                format!("label[contains(normalize-space(.), {})]", xpath_literal(text))
            }
            Self::Input => format!("*[{INPUT_PREDICATE}]"),
            Self::InputNamed(text) => {
                let literal = xpath_literal(text);
                let names = NAME_ATTRIBUTES
                    .iter()
                    .map(|attr| format!("@{attr}={literal}"))
                    .collect::<Vec<_>>()
                    .join(" or ");
                format!("*[{INPUT_PREDICATE}][{names}]")
            }
            Self::XPath(expr) => expr.clone(),
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy(), self.value())
    }
}

// ============================================================================
// Axis
// ============================================================================

/// Direction of a lookup relative to an anchor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// After the anchor in document order, excluding its descendants.
    Following,

    /// Inside the anchor.
    Descendant,
}

impl Axis {
    /// Returns the axis name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Following => "following",
            Self::Descendant => "descendant",
        }
    }

    const fn xpath_prefix(self) -> &'static str {
        match self {
            Self::Following => "following::",
            Self::Descendant => ".//",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns `true` if an element with this tag and `type` attribute accepts
/// user-entered data.
#[must_use]
pub fn is_input_like(tag: &str, input_type: Option<&str>) -> bool {
    if !INPUT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
        return false;
    }
    !(tag.eq_ignore_ascii_case("input")
        && input_type.is_some_and(|t| t.eq_ignore_ascii_case("hidden")))
}

// ============================================================================
// Tests
// ============================================================================
