//! Request defaults shared by a pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::data::{CachePolicy, Priority, TransportDescriptor};
use crate::error::Result;

/// Defaults applied by [`ImageRequest::with_config`](crate::ImageRequest::with_config).
///
/// Missing fields fall back to their defaults, so a partial TOML document is
/// valid.
///
/// # Examples
///
/// ```
/// use pictura_request::{Priority, RequestConfig};
///
/// let config = RequestConfig::from_toml_str(r#"
///     priority = "high"
///     memory_cache_writes = false
/// "#).unwrap();
///
/// assert_eq!(config.priority, Priority::High);
/// assert!(config.memory_cache_reads);
/// assert!(!config.memory_cache_writes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Default: normal
    pub priority: Priority,

    /// Whether the pipeline may read decoded images from its memory cache.
    ///
    /// Default: true
    pub memory_cache_reads: bool,

    /// Whether the pipeline may store decoded images in its memory cache.
    ///
    /// Default: true
    pub memory_cache_writes: bool,

    /// Default: use_protocol_cache_policy
    pub cache_policy: CachePolicy,

    /// Default: 60000
    pub timeout_ms: u64,

    /// Default: true
    pub allows_cellular_access: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            priority: Priority::default(),
            memory_cache_reads: true,
            memory_cache_writes: true,
            cache_policy: CachePolicy::default(),
            timeout_ms: 60_000,
            allows_cellular_access: true,
        }
    }
}

impl RequestConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Transport descriptor for `url` carrying these defaults.
    pub fn transport(&self, url: Url) -> TransportDescriptor {
        TransportDescriptor::new(url)
            .cache_policy(self.cache_policy)
            .timeout(self.timeout())
            .allows_cellular_access(self.allows_cellular_access)
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn memory_cache_reads(mut self, allowed: bool) -> Self {
        self.memory_cache_reads = allowed;
        self
    }

    #[must_use]
    pub fn memory_cache_writes(mut self, allowed: bool) -> Self {
        self.memory_cache_writes = allowed;
        self
    }

    #[must_use]
    pub fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn allows_cellular_access(mut self, allows: bool) -> Self {
        self.allows_cellular_access = allows;
        self
    }
}
