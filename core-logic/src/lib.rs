//! # Core Logic - Shared Utilities for the Node Keeper
//!
//! This crate provides the building blocks shared by keeper binaries:
//! proxy-bound HTTP execution with bounded retry, wallet and proxy list
//! loading, logging setup, and the event-sink seam.
//!
//! ## Modules
//!
//! - [`config`] - Proxy endpoint types
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Event sink and step-status definitions
//! - `utils` - Utility modules (http, retry, wallet, proxy, logger)

// Module declarations - internal modules marked pub(crate)
pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

// Selective exports - only public API types
pub use config::{ProxyEndpoint, ProxyScheme};
pub use error::{ConfigError, CoreError, NetworkError, WalletError};
pub use traits::{EventSink, StepStatus};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{
    setup_logger, ProxyPool, RequestOutcome, RequestSpec, ResilientHttpClient, TracingSink,
    WalletManager, WalletRecord,
};

// Export retry utilities for callers and tests
pub use utils::retry::{retry_fixed, AttemptResult, RetryPolicy};
