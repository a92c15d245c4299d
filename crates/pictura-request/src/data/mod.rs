//! Plain data carried by a request.
//!
//! These types hold no behaviour beyond accessors; the request and the key
//! derivation are built on top of them.

pub mod priority;
pub mod progress;
pub mod resource;
pub mod user_info;

pub use priority::Priority;
pub use progress::{Progress, ProgressHandler};
pub use resource::{CachePolicy, DEFAULT_TIMEOUT, Resource, TransportDescriptor};
pub use user_info::{IMAGE_ID_KEY, UserInfo};
