//! Copy-on-write image request descriptors with load and cache key derivation.
//!
//! # Architecture
//!
//! - [`data`] - Plain request data: resource, priority, progress, user info
//! - [`processor`] - Named image transforms and ordered chains
//! - [`request`] - The [`ImageRequest`] copy-on-write value type
//! - [`key`] - [`LoadKey`] and [`CacheKey`] derivation
//!
//! # Key Features
//!
//! - **Cheap copies**: cloning a request bumps a reference count; the state
//!   is cloned on the first write to a shared request
//! - **Two equivalence classes**: [`LoadKey`] deduplicates raw loads,
//!   [`CacheKey`] identifies processed images
//! - **Identity hints**: [`IMAGE_ID_KEY`] decouples image identity from
//!   volatile locators
//! - **Mechanism-only**: no I/O, decoding or cache stores
//!
//! # Example
//!
//! ```
//! use pictura_request::{CachePolicy, ImageRequest, TransportDescriptor};
//!
//! let a = ImageRequest::parse("http://x/1.png").unwrap();
//! let b = ImageRequest::from_transport(
//!     TransportDescriptor::new(a.url().clone())
//!         .cache_policy(CachePolicy::ReloadIgnoringLocalCacheData),
//! );
//!
//! assert_eq!(a.cache_key(), b.cache_key());
//! assert_ne!(a.load_key(), b.load_key());
//! ```

pub mod config;
pub mod data;
mod error;
pub mod image;
pub mod key;
pub mod processor;
pub mod request;

pub use config::RequestConfig;
pub use data::{
    CachePolicy, IMAGE_ID_KEY, Priority, Progress, ProgressHandler, Resource, TransportDescriptor,
    UserInfo,
};
pub use error::{RequestError, Result};
pub use image::{ContentMode, Image, Size};
pub use key::{CacheKey, LoadKey, OpaqueKey, cache_key, load_key};
pub use processor::{AnonymousProcessor, Processor, ProcessorChain, ProcessorState, default_chain};
pub use request::ImageRequest;

#[cfg(feature = "decompression")]
pub use processor::Decompressor;

pub use url::Url;
