//! storesync - resilient resource synchronization for the storefront.
//!
//! The storefront and admin tabs all talk to the same remote REST API
//! and all face the same failure modes: rate limiting under bursty
//! traffic and images that may live at any of several locations. This
//! crate centralizes that handling in two reusable pieces:
//!
//! - [`SyncCache`]: read-through TTL caching of named resources with
//!   exponential backoff on rate-limited fetches; writes go straight
//!   through and refresh the entry from the server's echo.
//! - [`FallbackResolver`]: expands an image reference into an ordered
//!   candidate URL list and walks a [`FallbackChain`] through it as
//!   candidates fail to load.
//!
//! Payloads are opaque JSON; the UI layer, auth, and the API itself are
//! external collaborators.

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod retry;

pub use cache::{CacheEntry, ReadOptions, SyncCache, DEFAULT_TTL};
pub use config::SyncConfig;
pub use error::SyncError;
pub use fallback::{Advance, FallbackChain, FallbackResolver, LoadPhase};
pub use retry::{RetryPolicy, DEFAULT_MAX_RETRIES, INITIAL_BACKOFF_MS, MAX_BACKOFF_MS};
