//! The image request value type.
//!
//! [`ImageRequest`] is a handle to a reference-counted `RequestState`.
//! Cloning a request only bumps the count. Every mutator goes through
//! `ImageRequest::state_mut`, which clones the state first when it is
//! shared, so a mutation is never visible through another handle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::config::RequestConfig;
use crate::data::{
    IMAGE_ID_KEY, Priority, Progress, ProgressHandler, Resource, TransportDescriptor, UserInfo,
    user_info,
};
use crate::error::Result;
use crate::image::Image;
use crate::key::{CacheKey, LoadKey, OpaqueKey};
use crate::processor::{AnonymousProcessor, Processor, ProcessorChain, ProcessorState};

#[cfg(feature = "decompression")]
use crate::image::{ContentMode, Size};
#[cfg(feature = "decompression")]
use crate::processor::Decompressor;

#[derive(Clone)]
struct RequestState {
    resource: Resource,
    /// Absolute locator, kept in sync with `resource`.
    locator: Arc<str>,
    processors: ProcessorState,
    memory_cache_reads: bool,
    memory_cache_writes: bool,
    priority: Priority,
    cache_key: Option<OpaqueKey>,
    load_key: Option<OpaqueKey>,
    progress: Option<ProgressHandler>,
    user_info: UserInfo,
}

impl RequestState {
    fn new(resource: Resource) -> Self {
        Self {
            locator: resource.absolute_string(),
            resource,
            processors: ProcessorState::Unset,
            memory_cache_reads: true,
            memory_cache_writes: true,
            priority: Priority::default(),
            cache_key: None,
            load_key: None,
            progress: None,
            user_info: UserInfo::new(),
        }
    }
}

/// Describes one image to load and how to process it.
///
/// # Examples
///
/// ```
/// use pictura_request::{ImageRequest, Priority};
///
/// let a = ImageRequest::parse("https://example.com/cat.png").unwrap();
/// let mut b = a.clone();
/// b.set_priority(Priority::High);
///
/// assert_eq!(a.priority(), Priority::Normal);
/// assert_eq!(b.priority(), Priority::High);
/// assert_eq!(a.cache_key(), b.cache_key());
/// ```
#[derive(Clone)]
pub struct ImageRequest {
    state: Arc<RequestState>,
}

impl ImageRequest {
    pub fn new(url: Url) -> Self {
        Self::from_resource(url)
    }

    pub fn from_transport(transport: TransportDescriptor) -> Self {
        Self::from_resource(transport)
    }

    pub fn from_resource(resource: impl Into<Resource>) -> Self {
        Self {
            state: Arc::new(RequestState::new(resource.into())),
        }
    }

    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// Build a request for `url` with the pipeline defaults in `config`.
    ///
    /// The resource stays a bare locator when the configured transport
    /// parameters are the bare-locator defaults.
    pub fn with_config(url: Url, config: &RequestConfig) -> Self {
        let transport = config.transport(url);
        let resource = if transport == TransportDescriptor::new(transport.url.clone()) {
            Resource::Url(transport.url)
        } else {
            Resource::Transport(transport)
        };

        let mut state = RequestState::new(resource);
        state.priority = config.priority;
        state.memory_cache_reads = config.memory_cache_reads;
        state.memory_cache_writes = config.memory_cache_writes;
        Self {
            state: Arc::new(state),
        }
    }

    /// Request `url` downscaled to `target_size`.
    #[cfg(feature = "decompression")]
    pub fn with_target_size(url: Url, target_size: Size, content_mode: ContentMode) -> Self {
        Self::from_resource(url).with_decompressor(target_size, content_mode)
    }

    /// Request `transport` downscaled to `target_size`.
    #[cfg(feature = "decompression")]
    pub fn transport_with_target_size(
        transport: TransportDescriptor,
        target_size: Size,
        content_mode: ContentMode,
    ) -> Self {
        Self::from_resource(transport).with_decompressor(target_size, content_mode)
    }

    #[cfg(feature = "decompression")]
    fn with_decompressor(mut self, target_size: Size, content_mode: ContentMode) -> Self {
        let chain = ProcessorChain::new().then(Decompressor::resizing(target_size, content_mode));
        self.state_mut().processors = ProcessorState::Chain(chain);
        self
    }

    fn state_mut(&mut self) -> &mut RequestState {
        if Arc::get_mut(&mut self.state).is_none() {
            tracing::trace!(
                handles = Arc::strong_count(&self.state),
                "cloning shared request state before mutation"
            );
        }
        Arc::make_mut(&mut self.state)
    }

    /// Whether both handles currently alias the same state.
    pub fn shares_state_with(&self, other: &ImageRequest) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    // Resource

    pub fn resource(&self) -> &Resource {
        &self.state.resource
    }

    pub fn url(&self) -> &Url {
        self.state.resource.url()
    }

    /// Absolute locator string, computed when the resource was set.
    pub fn locator(&self) -> &str {
        &self.state.locator
    }

    pub(crate) fn locator_arc(&self) -> &Arc<str> {
        &self.state.locator
    }

    /// The descriptor the transport should execute.
    pub fn transport(&self) -> TransportDescriptor {
        self.state.resource.to_transport()
    }

    pub fn set_resource(&mut self, resource: impl Into<Resource>) {
        let resource = resource.into();
        let state = self.state_mut();
        state.locator = resource.absolute_string();
        state.resource = resource;
    }

    // Processors

    /// The chain the pipeline applies, resolving unset to the default chain.
    pub fn processors(&self) -> &ProcessorChain {
        self.state.processors.effective()
    }

    pub fn processor_state(&self) -> &ProcessorState {
        &self.state.processors
    }

    /// Append `processor` to the effective chain.
    pub fn process_with<P: Processor + 'static>(&mut self, processor: P) {
        self.push_processor(Arc::new(processor));
    }

    pub fn push_processor(&mut self, processor: Arc<dyn Processor>) {
        self.state_mut().processors.push(processor);
    }

    /// Append a processor built from `key` and `closure`.
    pub fn process_with_fn<F>(&mut self, key: impl Into<String>, closure: F)
    where
        F: Fn(Image) -> Option<Image> + Send + Sync + 'static,
    {
        self.process_with(AnonymousProcessor::new(key, closure));
    }

    /// Replace the stored processors. `None` disables processing entirely.
    pub fn set_processors(&mut self, processors: impl Into<ProcessorState>) {
        self.state_mut().processors = processors.into();
    }

    /// Go back to the default chain.
    pub fn reset_processors(&mut self) {
        self.state_mut().processors = ProcessorState::Unset;
    }

    // Scheduling and caching flags

    pub fn priority(&self) -> Priority {
        self.state.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.state_mut().priority = priority;
    }

    pub fn memory_cache_reads(&self) -> bool {
        self.state.memory_cache_reads
    }

    pub fn set_memory_cache_reads(&mut self, allowed: bool) {
        self.state_mut().memory_cache_reads = allowed;
    }

    pub fn memory_cache_writes(&self) -> bool {
        self.state.memory_cache_writes
    }

    pub fn set_memory_cache_writes(&mut self, allowed: bool) {
        self.state_mut().memory_cache_writes = allowed;
    }

    // Key overrides

    pub fn cache_key_override(&self) -> Option<&OpaqueKey> {
        self.state.cache_key.as_ref()
    }

    /// Replace cache key derivation with `key`; `None` restores derivation.
    pub fn set_cache_key(&mut self, key: Option<OpaqueKey>) {
        self.state_mut().cache_key = key;
    }

    pub fn load_key_override(&self) -> Option<&OpaqueKey> {
        self.state.load_key.as_ref()
    }

    /// Replace load key derivation with `key`; `None` restores derivation.
    pub fn set_load_key(&mut self, key: Option<OpaqueKey>) {
        self.state_mut().load_key = key;
    }

    // Progress

    pub fn progress_handler(&self) -> Option<&ProgressHandler> {
        self.state.progress.as_ref()
    }

    pub fn set_progress_handler(&mut self, handler: Option<ProgressHandler>) {
        self.state_mut().progress = handler;
    }

    pub fn on_progress<F>(&mut self, handler: F)
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.set_progress_handler(Some(Arc::new(handler)));
    }

    /// Invoke the progress handler, if any.
    pub fn notify_progress(&self, completed: u64, total: Option<u64>) {
        if let Some(handler) = &self.state.progress {
            tracing::trace!(completed, ?total, locator = %self.state.locator, "progress");
            handler(&Progress::new(completed, total));
        }
    }

    // User info

    pub fn user_info(&self) -> &UserInfo {
        &self.state.user_info
    }

    pub fn user_info_mut(&mut self) -> &mut UserInfo {
        &mut self.state_mut().user_info
    }

    pub fn set_user_info(&mut self, user_info: UserInfo) {
        self.state_mut().user_info = user_info;
    }

    /// Identity hint used in place of the locator by the cache key.
    pub fn image_id(&self) -> Option<&str> {
        user_info::image_id(&self.state.user_info)
    }

    pub fn set_image_id(&mut self, image_id: impl Into<String>) {
        self.user_info_mut()
            .insert(IMAGE_ID_KEY.to_string(), Value::String(image_id.into()));
    }

    // Keys

    pub fn load_key(&self) -> LoadKey {
        LoadKey::of(self)
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::of(self)
    }

    // Builders

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.set_priority(priority);
        self
    }

    #[must_use]
    pub fn with_processor<P: Processor + 'static>(mut self, processor: P) -> Self {
        self.process_with(processor);
        self
    }

    #[must_use]
    pub fn with_processors(mut self, processors: impl Into<ProcessorState>) -> Self {
        self.set_processors(processors);
        self
    }

    #[must_use]
    pub fn with_image_id(mut self, image_id: impl Into<String>) -> Self {
        self.set_image_id(image_id);
        self
    }

    #[must_use]
    pub fn with_cache_key(mut self, key: OpaqueKey) -> Self {
        self.set_cache_key(Some(key));
        self
    }

    #[must_use]
    pub fn with_load_key(mut self, key: OpaqueKey) -> Self {
        self.set_load_key(Some(key));
        self
    }
}

impl From<Url> for ImageRequest {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

impl From<TransportDescriptor> for ImageRequest {
    fn from(transport: TransportDescriptor) -> Self {
        Self::from_transport(transport)
    }
}

impl fmt::Debug for ImageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = &self.state;
        f.debug_struct("ImageRequest")
            .field("resource", &state.resource)
            .field("processors", &state.processors)
            .field("priority", &state.priority)
            .field("memory_cache_reads", &state.memory_cache_reads)
            .field("memory_cache_writes", &state.memory_cache_writes)
            .field("cache_key", &state.cache_key)
            .field("load_key", &state.load_key)
            .field("progress", &state.progress.as_ref().map(|_| "{ ... }"))
            .field("user_info", &state.user_info)
            .finish()
    }
}
