//! Live browser document over a W3C WebDriver session.
//!
//! Selectors are sent as XPath rendered by [`By::to_xpath`]; the browser
//! evaluates them against the page currently loaded in the session.
//! Relative lookups use [`By::to_xpath_from`] with the anchor element as
//! the XPath context node.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use label_locator::{LabelResolver, WebDriverDocument};
//!
//! # async fn example() -> label_locator::Result<()> {
//! let page = WebDriverDocument::connect("http://localhost:4444").await?;
//! page.goto("https://example.com/signup").await?;
//!
//! let input = LabelResolver::new()
//!     .resolve(&page, "First Name", Duration::from_secs(10))
//!     .await?;
//! input.send_keys("Ada").await.ok();
//!
//! page.close().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::query::{Axis, By, normalize_whitespace};

use super::Document;

// ============================================================================
// WebDriverDocument
// ============================================================================

/// Document backed by a WebDriver session.
///
/// Owns the session client; the page it queries is whatever the session has
/// loaded.
pub struct WebDriverDocument {
    client: Client,
}

impl fmt::Debug for WebDriverDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDriverDocument").finish_non_exhaustive()
    }
}

impl WebDriverDocument {
    /// Wraps an existing session.
    #[inline]
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Opens a new session against a WebDriver server.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `webdriver_url` is not a valid URL
    /// - [`Error::Backend`] if the session cannot be created
    pub async fn connect(webdriver_url: &str) -> Result<Self> {
        let url = Url::parse(webdriver_url)
            .map_err(|e| Error::config(format!("Invalid WebDriver URL {webdriver_url}: {e}")))?;

        debug!(url = %url, "Connecting to WebDriver");

        let client = ClientBuilder::native()
            .connect(url.as_str())
            .await
            .map_err(|e| Error::backend(format!("Failed to connect to WebDriver at {url}: {e}")))?;

        Ok(Self::new(client))
    }

    /// Returns the underlying session client.
    #[inline]
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Navigates the session to `url`.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "Navigating");
        self.client.goto(url).await.map_err(backend_error)
    }

    /// Ends the session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await.map_err(backend_error)
    }
}

// ============================================================================
// Document
// ============================================================================

#[async_trait]
impl Document for WebDriverDocument {
    type Element = Element;

    async fn find_all(&self, by: &By) -> Result<Vec<Element>> {
        let xpath = by.to_xpath();
        trace!(selector = %by, %xpath, "find_all");

        self.client
            .find_all(Locator::XPath(&xpath))
            .await
            .map_err(|e| query_error(by, e))
    }

    async fn find_one(&self, by: &By) -> Result<Element> {
        let xpath = by.to_xpath();
        trace!(selector = %by, %xpath, "find_one");

        self.client
            .find(Locator::XPath(&xpath))
            .await
            .map_err(|e| query_error(by, e))
    }

    async fn find_all_from(&self, anchor: &Element, axis: Axis, by: &By) -> Result<Vec<Element>> {
        let Some(xpath) = by.to_xpath_from(axis) else {
            return Err(Error::unsupported_selector(format!("{axis}::{by}")));
        };
        trace!(selector = %by, %axis, %xpath, "find_all_from");

        anchor
            .find_all(Locator::XPath(&xpath))
            .await
            .map_err(|e| element_error(anchor, e))
    }

    async fn is_displayed(&self, element: &Element) -> Result<bool> {
        element
            .is_displayed()
            .await
            .map_err(|e| element_error(element, e))
    }

    async fn get_attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        element.attr(name).await.map_err(|e| element_error(element, e))
    }

    async fn get_normalized_text(&self, element: &Element) -> Result<String> {
        let text = element.text().await.map_err(|e| element_error(element, e))?;
        Ok(normalize_whitespace(&text))
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

fn query_error(by: &By, err: CmdError) -> Error {
    if err.is_no_such_element() {
        Error::element_not_found(by.to_string())
    } else {
        backend_error(err)
    }
}

/// Maps a failed command on `element`; a detached element is stale, not a
/// backend failure.
fn element_error(element: &Element, err: CmdError) -> Error {
    if is_stale(&err) {
        Error::stale_element(format!("{:?}", element.element_id()))
    } else {
        backend_error(err)
    }
}

fn is_stale(err: &CmdError) -> bool {
    matches!(err, CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::StaleElementReference))
}

fn backend_error(err: CmdError) -> Error {
    Error::backend(err.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use fantoccini::error::WebDriver;

    #[test]
    fn test_stale_reference_is_recognised() {
        let stale = CmdError::Standard(WebDriver::new(
            ErrorStatus::StaleElementReference,
            "element is not attached to the page document",
        ));
        assert!(is_stale(&stale));

        let closed = CmdError::Standard(WebDriver::new(ErrorStatus::InvalidSessionId, "gone"));
        assert!(!is_stale(&closed));
        assert!(matches!(backend_error(closed), Error::Backend { .. }));
    }

    #[test]
    fn test_missing_element_is_a_miss() {
        let miss = CmdError::Standard(WebDriver::new(ErrorStatus::NoSuchElement, "none"));
        assert!(query_error(&By::id("x"), miss).is_miss());
    }
}
