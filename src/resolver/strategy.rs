//! Label-to-input lookup strategies.
//!
//! Each strategy is an independent, read-only lookup that either yields one
//! element or misses. A structural "matched nothing" from the document is a
//! miss, never an error; any other document failure propagates.
//!
//! | Strategy | Markup it handles |
//! |----------|-------------------|
//! | [`Strategy::ExplicitAssociation`] | `<label for="x">` … `<input id="x">` |
//! | [`Strategy::Proximity`] | `<label>Email</label><input>` (input later in document order) |
//! | [`Strategy::Containment`] | `<label>Email <input></label>` |
//! | [`Strategy::AttributeMatch`] | `<input placeholder="Email">` / `aria-label` |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::document::Document;
use crate::error::Result;
use crate::query::{Axis, By};

// ============================================================================
// Strategy
// ============================================================================

/// One lookup procedure in the strategy chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Follow the label's `for` attribute to the element with that `id`.
    ExplicitAssociation,

    /// First input-like element after the label in document order.
    Proximity,

    /// Input-like element nested inside the label.
    Containment,

    /// Input-like element whose placeholder or `aria-label` equals the label
    /// text. Ignores the label element entirely.
    AttributeMatch,
}

impl Strategy {
    /// Returns the strategy name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ExplicitAssociation => "explicit_association",
            Self::Proximity => "proximity",
            Self::Containment => "containment",
            Self::AttributeMatch => "attribute_match",
        }
    }

    /// Runs this strategy for `label`.
    ///
    /// Proximity and containment look only around `label_element`, the
    /// label the presence gate confirmed visible.
    pub(crate) async fn attempt<D>(
        self,
        document: &D,
        label: &str,
        label_element: &D::Element,
    ) -> Result<Option<D::Element>>
    where
        D: Document + ?Sized,
    {
        match self {
            Self::ExplicitAssociation => explicit_association(document, label_element).await,
            Self::Proximity => first_from(document, label_element, Axis::Following).await,
            Self::Containment => first_from(document, label_element, Axis::Descendant).await,
            Self::AttributeMatch => attribute_match(document, label).await,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Lookups
// ============================================================================

async fn explicit_association<D>(document: &D, label_element: &D::Element) -> Result<Option<D::Element>>
where
    D: Document + ?Sized,
{
    let Some(target) = document.get_attribute(label_element, "for").await? else {
        trace!("Label has no for attribute");
        return Ok(None);
    };

    let target = target.trim();
    if target.is_empty() {
        trace!("Label has an empty for attribute");
        return Ok(None);
    }

    first_match(document, &By::id(target)).await
}

/// Attribute matching without a label anchor.
pub(crate) async fn attribute_match<D>(document: &D, label: &str) -> Result<Option<D::Element>>
where
    D: Document + ?Sized,
{
    first_match(document, &By::input_named(label)).await
}

async fn first_match<D>(document: &D, by: &By) -> Result<Option<D::Element>>
where
    D: Document + ?Sized,
{
    soft_miss(document.find_one(by).await)
}

/// First input-like element along `axis` from the label element.
async fn first_from<D>(document: &D, label_element: &D::Element, axis: Axis) -> Result<Option<D::Element>>
where
    D: Document + ?Sized,
{
    soft_miss(document.find_one_from(label_element, axis, &By::input()).await)
}

/// Turns a structural miss into `None`, keeping every other error.
pub(crate) fn soft_miss<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_miss() => Ok(None),
        Err(err) => Err(err),
    }
}

// ============================================================================
// Tests
// ============================================================================
