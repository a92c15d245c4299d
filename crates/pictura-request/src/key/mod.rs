//! Load and cache key derivation.
//!
//! Both keys are snapshots: deriving a key copies what it needs out of the
//! request, so mutating the request afterwards never changes a key that was
//! already handed out.

mod cache;
mod load;
mod opaque;

pub use cache::CacheKey;
pub use load::LoadKey;
pub use opaque::OpaqueKey;

use crate::request::ImageRequest;

/// Key for deduplicating raw data loads of `request`.
pub fn load_key(request: &ImageRequest) -> LoadKey {
    LoadKey::of(request)
}

/// Key for locating decoded and processed images of `request`.
pub fn cache_key(request: &ImageRequest) -> CacheKey {
    CacheKey::of(request)
}
