//! Label-to-input resolution.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | [`LabelResolver`] and [`Resolution`] |
//! | `options` | [`ResolverOptions`] and its policy enums |
//! | `strategy` | [`Strategy`] lookups |

// ============================================================================
// Submodules
// ============================================================================

/// Presence gate and strategy chain.
pub mod core;

/// Resolver configuration.
pub mod options;

/// Individual lookup strategies.
pub mod strategy;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::{LabelResolver, Resolution};
pub use options::{
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, LabelGate, ResolverOptions, StrategyOrder,
};
pub use strategy::Strategy;
