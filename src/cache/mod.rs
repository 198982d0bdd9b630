//! In-memory caching module for remote resource state.
//!
//! This module provides the `SyncCache` for read-through caching of
//! named API resources. Entries are held as opaque JSON payloads and
//! considered stale after a per-read TTL (5 minutes by default).
//!
//! Cached resource kinds include whatever the UI binds to the API:
//! - Company info and contact details
//! - Product and certification listings
//! - Team members, banners, gallery metadata

pub mod entry;
pub mod sync;

pub use entry::CacheEntry;
pub use sync::{ReadOptions, SyncCache, DEFAULT_TTL};
