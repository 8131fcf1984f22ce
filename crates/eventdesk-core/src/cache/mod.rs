//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! derived registration data locally. Each entry is a JSON blob keyed by a
//! short string and stamped with the time it was written. Entries are
//! considered stale after 60 minutes.
//!
//! Cached data types include:
//! - Participants
//! - Families
//! - Arbitrary dashboard state through `save_blob` / `load_blob`

pub mod manager;

pub use manager::{CacheAges, CacheManager, CachedData};
