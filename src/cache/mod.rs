//! Local JSON file cache for wardrobe data.
//!
//! Every collection fetched from the API is written through to a cache
//! file so the closet stays browsable offline. Cached files carry a
//! timestamp used for staleness checks and the status-bar age display.

pub mod manager;

pub use manager::{CacheAges, CacheManager, CachedData};
