//! Resolver configuration.
//!
//! Provides a type-safe interface for the knobs of label resolution: the
//! default bound on the presence wait, its polling interval, the order of
//! the proximity and containment strategies, and how strictly the label
//! presence gate applies.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use label_locator::{LabelGate, ResolverOptions, StrategyOrder};
//!
//! let options = ResolverOptions::new()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_poll_interval(Duration::from_millis(50))
//!     .with_strategy_order(StrategyOrder::ContainmentFirst)
//!     .with_label_gate(LabelGate::Relaxed);
//!
//! assert!(options.validate().is_ok());
//!
//! let loaded = ResolverOptions::from_json(r#"{"timeout_ms": 2500}"#).unwrap();
//! assert_eq!(loaded.timeout, Duration::from_millis(2500));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::strategy::Strategy;

// ============================================================================
// Constants
// ============================================================================

/// Default bound on the label presence wait (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interval between presence polls (100 milliseconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ============================================================================
// StrategyOrder
// ============================================================================

/// Order of the strategy chain.
///
/// Explicit association always runs first and attribute matching always
/// runs last; only proximity and containment may swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyOrder {
    /// Explicit, proximity, containment, attribute.
    #[default]
    ProximityFirst,

    /// Explicit, containment, proximity, attribute.
    ContainmentFirst,
}

impl StrategyOrder {
    /// Returns the strategies in the order they are attempted.
    #[must_use]
    pub const fn strategies(self) -> [Strategy; 4] {
        match self {
            Self::ProximityFirst => [
                Strategy::ExplicitAssociation,
                Strategy::Proximity,
                Strategy::Containment,
                Strategy::AttributeMatch,
            ],
            Self::ContainmentFirst => [
                Strategy::ExplicitAssociation,
                Strategy::Containment,
                Strategy::Proximity,
                Strategy::AttributeMatch,
            ],
        }
    }
}

// ============================================================================
// LabelGate
// ============================================================================

/// How the label presence gate applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelGate {
    /// A visible label must appear before any strategy runs.
    #[default]
    Required,

    /// When no label appears, attribute matching is still attempted before
    /// the wait failure is reported.
    ///
    /// Reaches forms that name inputs only by placeholder or `aria-label`.
    Relaxed,
}

// ============================================================================
// ResolverOptions
// ============================================================================

/// Label resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Bound used by [`LabelResolver::resolve_default`](super::LabelResolver::resolve_default).
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,

    /// Interval between presence polls.
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,

    /// Order of the proximity and containment strategies.
    pub strategy_order: StrategyOrder,

    /// Presence gate policy.
    pub label_gate: LabelGate,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ResolverOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            strategy_order: StrategyOrder::ProximityFirst,
            label_gate: LabelGate::Required,
        }
    }

    /// Loads options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the text is not valid options JSON
    /// - [`Error::Config`] if the values fail [`validate`](Self::validate)
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ResolverOptions {
    /// Sets the default presence timeout.
    #[inline]
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the presence polling interval.
    #[inline]
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Sets the strategy order.
    #[inline]
    #[must_use]
    pub const fn with_strategy_order(mut self, order: StrategyOrder) -> Self {
        self.strategy_order = order;
        self
    }

    /// Sets the presence gate policy.
    #[inline]
    #[must_use]
    pub const fn with_label_gate(mut self, gate: LabelGate) -> Self {
        self.label_gate = gate;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ResolverOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the timeout or poll interval is zero, or the poll
    /// interval exceeds the timeout.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::config("Timeout must be greater than zero"));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::config("Poll interval must be greater than zero"));
        }
        if self.poll_interval > self.timeout {
            return Err(Error::config(format!(
                "Poll interval ({}ms) exceeds timeout ({}ms)",
                self.poll_interval.as_millis(),
                self.timeout.as_millis()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Serializes a [`Duration`] as whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// ============================================================================
// Tests
// ============================================================================
