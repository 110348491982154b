//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

// Internal modules - not part of public API
pub(crate) mod http;
pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod retry;
pub(crate) mod wallet_manager;

// Selective exports - only public utilities
pub use http::{RequestOutcome, RequestSpec, ResilientHttpClient};
pub use logger::{setup_logger, TracingSink};
pub use proxy_manager::ProxyPool;
pub use wallet_manager::{WalletManager, WalletRecord};
