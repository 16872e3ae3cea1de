//! Label resolution: presence gate followed by the ordered strategy chain.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{Level, debug};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::query::By;

use super::options::{LabelGate, ResolverOptions};
use super::strategy::{Strategy, attribute_match};

// ============================================================================
// Types
// ============================================================================

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution<E> {
    /// The input control.
    pub element: E,

    /// Strategy that produced the element.
    pub strategy: Strategy,

    /// Strategies attempted, in order, ending with the winner.
    pub attempted: Vec<Strategy>,

    /// Label element confirmed by the presence gate.
    ///
    /// `None` only when [`LabelGate::Relaxed`] resolved without a label.
    pub label_element: Option<E>,
}

// ============================================================================
// LabelResolver
// ============================================================================

/// Resolves a human-readable label to the input control it describes.
///
/// Stateless apart from its options: it never keeps element handles between
/// calls, and the document it queries stays owned by the caller.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use label_locator::{LabelResolver, Node, StaticDocument, Strategy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> label_locator::Result<()> {
/// let page = StaticDocument::new(
///     Node::form()
///         .with_child(Node::label("First Name").with_attr("for", "fn"))
///         .with_child(Node::input().with_attr("id", "fn")),
/// );
///
/// let resolution = LabelResolver::new()
///     .locate(&page, "First Name", Duration::from_secs(10))
///     .await?;
///
/// assert_eq!(resolution.strategy, Strategy::ExplicitAssociation);
/// assert_eq!(page.attribute(&resolution.element, "id")?, Some("fn"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct LabelResolver {
    options: ResolverOptions,
}

impl LabelResolver {
    /// Creates a resolver with default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with custom options.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the options fail validation.
    pub fn with_options(options: ResolverOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Returns the resolver options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }
}

// ============================================================================
// LabelResolver - Resolution
// ============================================================================

impl LabelResolver {
    /// Resolves `label` to an input, waiting up to `timeout` for the label.
    ///
    /// # Errors
    ///
    /// - [`Error::LabelNotVisible`] if no visible label contains `label`
    ///   within `timeout`; no strategy runs
    /// - [`Error::FieldNotFound`] if the label exists but every strategy missed
    /// - any hard document error
    pub async fn resolve<D>(&self, document: &D, label: &str, timeout: Duration) -> Result<D::Element>
    where
        D: Document + ?Sized,
    {
        self.locate(document, label, timeout)
            .await
            .map(|resolution| resolution.element)
    }

    /// Resolves `label` using the configured default timeout.
    pub async fn resolve_default<D>(&self, document: &D, label: &str) -> Result<D::Element>
    where
        D: Document + ?Sized,
    {
        self.resolve(document, label, self.options.timeout).await
    }

    /// Resolves `label` and reports which strategy matched.
    ///
    /// Same contract as [`resolve`](Self::resolve).
    pub async fn locate<D>(
        &self,
        document: &D,
        label: &str,
        timeout: Duration,
    ) -> Result<Resolution<D::Element>>
    where
        D: Document + ?Sized,
    {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        debug!(label, timeout_ms, "Resolving input by label");

        let label_element = match self.presence_gate(document, label, timeout).await {
            Ok(element) => element,
            Err(Error::Timeout { .. }) => return self.gate_unmet(document, label, timeout_ms).await,
            Err(err) => return Err(err),
        };

        let mut attempted = Vec::with_capacity(4);
        for strategy in self.options.strategy_order.strategies() {
            attempted.push(strategy);

            match strategy.attempt(document, label, &label_element).await? {
                Some(element) => {
                    debug!(label, strategy = strategy.name(), "Strategy matched");
                    return Ok(Resolution {
                        element,
                        strategy,
                        attempted,
                        label_element: Some(label_element),
                    });
                }
                None => debug!(label, strategy = strategy.name(), "Strategy missed"),
            }
        }

        debug!(label, "No strategy matched");
        Err(Error::field_not_found(label))
    }
}

// ============================================================================
// LabelResolver - Internal
// ============================================================================

impl LabelResolver {
    /// Waits for a visible label containing `label`.
    async fn presence_gate<D>(&self, document: &D, label: &str, timeout: Duration) -> Result<D::Element>
    where
        D: Document + ?Sized,
    {
        let by = By::label(label);
        let element = document
            .wait_until_visible(&by, timeout, self.options.poll_interval)
            .await?;

        // First visible match wins; surface ambiguity for diagnosis only.
        if tracing::enabled!(Level::DEBUG)
            && let Ok(all) = document.find_all(&by).await
            && all.len() > 1
        {
            debug!(label, matches = all.len(), "Several labels contain this text, using the first visible");
        }

        Ok(element)
    }

    async fn gate_unmet<D>(
        &self,
        document: &D,
        label: &str,
        timeout_ms: u64,
    ) -> Result<Resolution<D::Element>>
    where
        D: Document + ?Sized,
    {
        if self.options.label_gate == LabelGate::Relaxed
            && let Some(element) = attribute_match(document, label).await?
        {
            debug!(label, "No label visible, matched input by attribute");
            return Ok(Resolution {
                element,
                strategy: Strategy::AttributeMatch,
                attempted: vec![Strategy::AttributeMatch],
                label_element: None,
            });
        }

        debug!(label, timeout_ms, "No visible label contains this text");
        Err(Error::label_not_visible(label, timeout_ms))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::document::{LiveDocument, Node, NodeRef, StaticDocument};
    use crate::query::Axis;
    use crate::resolver::options::StrategyOrder;

    const SHORT: Duration = Duration::from_millis(40);

    fn resolver() -> LabelResolver {
        LabelResolver::with_options(
            ResolverOptions::new()
                .with_timeout(SHORT)
                .with_poll_interval(Duration::from_millis(5)),
        )
        .unwrap()
    }

    fn id_of(document: &StaticDocument, element: &NodeRef) -> String {
        document
            .attribute(element, "id")
            .unwrap()
            .unwrap_or_default()
            .to_string()
    }

    /// Records every query and attribute read issued against a document.
    struct Recording<'a> {
        inner: &'a StaticDocument,
        queries: Mutex<Vec<String>>,
        attribute_reads: Mutex<Vec<String>>,
    }

    impl<'a> Recording<'a> {
        fn new(inner: &'a StaticDocument) -> Self {
            Self {
                inner,
                queries: Mutex::new(Vec::new()),
                attribute_reads: Mutex::new(Vec::new()),
            }
        }

        /// Queries issued after the presence gate, as `axis::strategy` or
        /// `strategy`.
        fn strategies_queried(&self) -> Vec<String> {
            self.queries
                .lock()
                .iter()
                .filter(|query| query.as_str() != "label")
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl Document for Recording<'_> {
        type Element = NodeRef;

        async fn find_all(&self, by: &By) -> Result<Vec<NodeRef>> {
            self.queries.lock().push(by.strategy().to_string());
            self.inner.find_all(by).await
        }

        async fn find_all_from(&self, anchor: &NodeRef, axis: Axis, by: &By) -> Result<Vec<NodeRef>> {
            self.queries.lock().push(format!("{axis}::{}", by.strategy()));
            self.inner.find_all_from(anchor, axis, by).await
        }

        async fn is_displayed(&self, element: &NodeRef) -> Result<bool> {
            self.inner.is_displayed(element).await
        }

        async fn get_attribute(&self, element: &NodeRef, name: &str) -> Result<Option<String>> {
            self.attribute_reads.lock().push(name.to_string());
            self.inner.get_attribute(element, name).await
        }

        async fn get_normalized_text(&self, element: &NodeRef) -> Result<String> {
            self.inner.get_normalized_text(element).await
        }
    }

    /// Fails every lookup other than the label query with a backend error.
    struct Broken<'a>(&'a StaticDocument);

    #[async_trait]
    impl Document for Broken<'_> {
        type Element = NodeRef;

        async fn find_all(&self, by: &By) -> Result<Vec<NodeRef>> {
            match by {
                By::Label(_) => self.0.find_all(by).await,
                _ => Err(Error::backend("session closed")),
            }
        }

        async fn find_all_from(&self, _: &NodeRef, _: Axis, _: &By) -> Result<Vec<NodeRef>> {
            Err(Error::backend("session closed"))
        }

        async fn is_displayed(&self, element: &NodeRef) -> Result<bool> {
            self.0.is_displayed(element).await
        }

        async fn get_attribute(&self, element: &NodeRef, name: &str) -> Result<Option<String>> {
            self.0.get_attribute(element, name).await
        }

        async fn get_normalized_text(&self, element: &NodeRef) -> Result<String> {
            self.0.get_normalized_text(element).await
        }
    }

    #[tokio::test]
    async fn test_explicit_association_wins() {
        // <label for="fn">First Name</label><input id="other"><input id="fn">
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("First Name").with_attr("for", "fn"),
            Node::input().with_attr("id", "other"),
            Node::input().with_attr("id", "fn"),
        ]));
        let recording = Recording::new(&document);

        let resolution = resolver()
            .locate(&recording, "First Name", Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(id_of(&document, &resolution.element), "fn");
        assert_eq!(resolution.strategy, Strategy::ExplicitAssociation);
        assert_eq!(resolution.attempted, [Strategy::ExplicitAssociation]);
        assert_eq!(recording.strategies_queried(), ["id"]);
    }

    #[tokio::test]
    async fn test_proximity_without_for() {
        // <div><label>Email</label><input type="email" id="email"></div>
        let document = StaticDocument::new(
            Node::div()
                .with_child(Node::label("Email"))
                .with_child(Node::input().with_attr("type", "email").with_attr("id", "email")),
        );

        let resolution = resolver().locate(&document, "Email", SHORT).await.unwrap();

        assert_eq!(id_of(&document, &resolution.element), "email");
        assert_eq!(resolution.strategy, Strategy::Proximity);
        assert_eq!(
            resolution.attempted,
            [Strategy::ExplicitAssociation, Strategy::Proximity]
        );
    }

    #[tokio::test]
    async fn test_proximity_is_not_scoped_to_container() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::div().with_child(Node::label("City")),
            Node::div().with_child(Node::div().with_child(Node::input().with_attr("id", "city"))),
        ]));

        let element = resolver().resolve(&document, "City", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &element), "city");
    }

    #[tokio::test]
    async fn test_missing_for_target_falls_through() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("Zip").with_attr("for", "does-not-exist"),
            Node::input().with_attr("id", "zip"),
        ]));

        let resolution = resolver().locate(&document, "Zip", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &resolution.element), "zip");
        assert_eq!(resolution.strategy, Strategy::Proximity);
    }

    #[tokio::test]
    async fn test_containment_when_nothing_follows() {
        // <label>Subscribe <input type="checkbox" id="sub"></label>
        let document = StaticDocument::new(Node::form().with_children([
            Node::input().with_attr("id", "earlier"),
            Node::label("Subscribe ")
                .with_child(Node::input().with_attr("type", "checkbox").with_attr("id", "sub")),
        ]));

        let resolution = resolver().locate(&document, "Subscribe", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &resolution.element), "sub");
        assert_eq!(resolution.strategy, Strategy::Containment);
    }

    #[tokio::test]
    async fn test_strategy_order_controls_nested_vs_following() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("Agree ").with_child(Node::input().with_attr("id", "nested")),
            Node::input().with_attr("id", "after"),
        ]));

        let proximity_first = resolver().resolve(&document, "Agree", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &proximity_first), "after");

        let containment_first = LabelResolver::with_options(
            resolver()
                .options()
                .clone()
                .with_strategy_order(StrategyOrder::ContainmentFirst),
        )
        .unwrap()
        .resolve(&document, "Agree", SHORT)
        .await
        .unwrap();
        assert_eq!(id_of(&document, &containment_first), "nested");
    }

    #[tokio::test]
    async fn test_proximity_follows_the_visible_label() {
        // Hidden mobile copy of the form rendered before the desktop copy.
        let document = StaticDocument::new(Node::form().with_children([
            Node::div().with_attr("style", "display:none").with_children([
                Node::label("Email"),
                Node::input().with_attr("id", "mobile-email"),
            ]),
            Node::div().with_children([
                Node::label("Email"),
                Node::input().with_attr("id", "desktop-email"),
            ]),
        ]));

        let resolution = resolver().locate(&document, "Email", SHORT).await.unwrap();

        assert_eq!(id_of(&document, &resolution.element), "desktop-email");
        assert_eq!(resolution.strategy, Strategy::Proximity);
        assert!(document.is_visible(&resolution.element).unwrap());
    }

    #[tokio::test]
    async fn test_containment_stays_inside_the_visible_label() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::div().with_attr("hidden", "").with_child(
                Node::label("Agree ").with_child(Node::input().with_attr("id", "hidden-agree")),
            ),
            Node::label("Agree"),
        ]));

        let err = resolver().resolve(&document, "Agree", SHORT).await.unwrap_err();
        assert!(matches!(err, Error::FieldNotFound { .. }));
    }

    #[tokio::test]
    async fn test_attribute_match_is_last_resort() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::input().with_attr("id", "phone").with_attr("placeholder", "Phone"),
            Node::label("Phone"),
        ]));
        let recording = Recording::new(&document);

        let resolution = resolver().locate(&recording, "Phone", SHORT).await.unwrap();

        assert_eq!(id_of(&document, &resolution.element), "phone");
        assert_eq!(resolution.strategy, Strategy::AttributeMatch);
        assert_eq!(
            resolution.attempted,
            [
                Strategy::ExplicitAssociation,
                Strategy::Proximity,
                Strategy::Containment,
                Strategy::AttributeMatch,
            ]
        );
        assert_eq!(
            recording.strategies_queried(),
            ["following::input", "descendant::input", "inputNamed"]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_is_field_not_found() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::input().with_attr("id", "unrelated"),
            Node::label("Nickname"),
        ]));
        let recording = Recording::new(&document);

        let err = resolver().resolve(&recording, "Nickname", SHORT).await.unwrap_err();

        assert!(matches!(&err, Error::FieldNotFound { label } if label == "Nickname"));
        assert!(err.is_not_found());
        assert!(!err.is_timeout());
        assert_eq!(*recording.attribute_reads.lock(), ["for"]);
        assert_eq!(
            recording.strategies_queried(),
            ["following::input", "descendant::input", "inputNamed"]
        );
    }

    #[tokio::test]
    async fn test_absent_label_times_out_before_strategies() {
        let document = StaticDocument::new(
            Node::form()
                .with_child(Node::label("Email"))
                .with_child(Node::input().with_attr("placeholder", "Mobile Number")),
        );
        let recording = Recording::new(&document);

        let started = tokio::time::Instant::now();
        let err = resolver()
            .resolve(&recording, "Mobile Number", SHORT)
            .await
            .unwrap_err();

        assert!(started.elapsed() >= SHORT);
        assert!(matches!(
            &err,
            Error::LabelNotVisible { label, timeout_ms: 40 } if label == "Mobile Number"
        ));
        assert!(err.is_timeout());
        assert!(recording.strategies_queried().is_empty());
        assert!(recording.attribute_reads.lock().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_label_does_not_pass_gate() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("Secret").with_attr("style", "display:none"),
            Node::input().with_attr("id", "secret"),
        ]));

        let err = resolver().resolve(&document, "Secret", SHORT).await.unwrap_err();
        assert!(matches!(err, Error::LabelNotVisible { .. }));
    }

    #[tokio::test]
    async fn test_relaxed_gate_reaches_attribute_only_forms() {
        let document = StaticDocument::new(
            Node::form().with_child(Node::input().with_attr("id", "q").with_attr("aria-label", "Search")),
        );

        let strict = resolver().resolve(&document, "Search", SHORT).await.unwrap_err();
        assert!(matches!(strict, Error::LabelNotVisible { .. }));

        let relaxed = LabelResolver::with_options(
            resolver().options().clone().with_label_gate(LabelGate::Relaxed),
        )
        .unwrap();
        let resolution = relaxed.locate(&document, "Search", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &resolution.element), "q");
        assert_eq!(resolution.strategy, Strategy::AttributeMatch);
        assert!(resolution.label_element.is_none());

        let missing = relaxed.resolve(&document, "Nothing", SHORT).await.unwrap_err();
        assert!(matches!(missing, Error::LabelNotVisible { .. }));
    }

    #[tokio::test]
    async fn test_decorated_label_matches_by_substring() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("First Name")
                .with_attr("for", "fn")
                .with_child(Node::element("span").with_text(" *")),
            Node::input().with_attr("id", "fn"),
        ]));

        let element = resolver().resolve(&document, "First Name", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &element), "fn");
    }

    #[tokio::test]
    async fn test_ambiguous_substring_takes_first_label() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("First Name").with_attr("for", "first"),
            Node::input().with_attr("id", "first"),
            Node::label("Last Name").with_attr("for", "last"),
            Node::input().with_attr("id", "last"),
        ]));

        let element = resolver().resolve(&document, "Name", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &element), "first");
    }

    #[tokio::test]
    async fn test_label_text_with_quotes() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label(r#"Driver's "licence" number"#),
            Node::input().with_attr("id", "dl"),
        ]));

        let element = resolver()
            .resolve(&document, r#"Driver's "licence""#, SHORT)
            .await
            .unwrap();
        assert_eq!(id_of(&document, &element), "dl");
    }

    #[tokio::test]
    async fn test_empty_label_never_matches() {
        let document = StaticDocument::new(
            Node::form()
                .with_child(Node::label("Email"))
                .with_child(Node::input()),
        );

        let err = resolver().resolve(&document, "", SHORT).await.unwrap_err();
        assert!(matches!(err, Error::LabelNotVisible { .. }));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("Email"),
            Node::input().with_attr("id", "email"),
        ]));
        let resolver = resolver();

        let first = resolver.locate(&document, "Email", SHORT).await.unwrap();
        let second = resolver.locate(&document, "Email", SHORT).await.unwrap();

        assert_eq!(first.element, second.element);
        assert_eq!(first.strategy, second.strategy);
    }

    #[tokio::test]
    async fn test_hard_errors_are_not_swallowed() {
        let document = StaticDocument::new(Node::form().with_children([
            Node::label("Email"),
            Node::input().with_attr("id", "email"),
        ]));

        let err = resolver()
            .resolve(&Broken(&document), "Email", SHORT)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
    }

    #[tokio::test]
    async fn test_waits_for_label_to_appear() {
        let page = LiveDocument::new(Node::form());
        let writer = page.clone();

        let render = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(25)).await;
            writer.replace(Node::form().with_children([
                Node::label("Password").with_attr("for", "pw"),
                Node::input().with_attr("id", "pw").with_attr("type", "password"),
            ]));
        });

        let element = resolver()
            .resolve(&page, "Password", Duration::from_secs(2))
            .await
            .unwrap();
        render.await.unwrap();

        let snapshot = page.snapshot();
        assert_eq!(snapshot.attribute(&element, "id").unwrap(), Some("pw"));
    }

    #[tokio::test]
    async fn test_resolve_default_uses_configured_timeout() {
        let document = StaticDocument::new(Node::form());
        let err = resolver()
            .resolve_default(&document, "Anything")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LabelNotVisible { timeout_ms: 40, .. }));
    }

    /// Serves the first label query, then fails every later one.
    struct OneShotLabels<'a> {
        inner: &'a StaticDocument,
        label_queries: Mutex<usize>,
    }

    #[async_trait]
    impl Document for OneShotLabels<'_> {
        type Element = NodeRef;

        async fn find_all(&self, by: &By) -> Result<Vec<NodeRef>> {
            if matches!(by, By::Label(_)) {
                let served = {
                    let mut count = self.label_queries.lock();
                    *count += 1;
                    *count
                };
                if served > 1 {
                    return Err(Error::backend("label query failed"));
                }
            }
            self.inner.find_all(by).await
        }

        async fn find_all_from(&self, anchor: &NodeRef, axis: Axis, by: &By) -> Result<Vec<NodeRef>> {
            self.inner.find_all_from(anchor, axis, by).await
        }

        async fn is_displayed(&self, element: &NodeRef) -> Result<bool> {
            self.inner.is_displayed(element).await
        }

        async fn get_attribute(&self, element: &NodeRef, name: &str) -> Result<Option<String>> {
            self.inner.get_attribute(element, name).await
        }

        async fn get_normalized_text(&self, element: &NodeRef) -> Result<String> {
            self.inner.get_normalized_text(element).await
        }
    }

    #[tokio::test]
    async fn test_debug_logging_does_not_change_outcome() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let document = StaticDocument::new(Node::form().with_children([
            Node::label("Email").with_attr("for", "email"),
            Node::input().with_attr("id", "email"),
            Node::label("Email (again)"),
        ]));
        let flaky = OneShotLabels {
            inner: &document,
            label_queries: Mutex::new(0),
        };

        let element = resolver().resolve(&flaky, "Email", SHORT).await.unwrap();
        assert_eq!(id_of(&document, &element), "email");
    }

    #[test]
    fn test_with_options_validates() {
        let err = LabelResolver::with_options(
            ResolverOptions::new().with_poll_interval(Duration::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
