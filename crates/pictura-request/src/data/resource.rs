use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default transport timeout applied to bare locators.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Cache policy forwarded to the HTTP transport.
///
/// Only the transport interprets these; for this crate they are opaque
/// discriminators of the [`LoadKey`](crate::LoadKey).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Follow the caching rules of the protocol.
    #[default]
    UseProtocolCachePolicy,
    /// Ignore locally cached data and load from the origin.
    ReloadIgnoringLocalCacheData,
    /// Ignore local and intermediate caches.
    ReloadIgnoringLocalAndRemoteCacheData,
    /// Use cached data regardless of age, load otherwise.
    ReturnCacheDataElseLoad,
    /// Use cached data regardless of age, never load.
    ReturnCacheDataDontLoad,
    /// Revalidate cached data with the origin before use.
    ReloadRevalidatingCacheData,
}

/// A locator together with the parameters used to fetch it.
///
/// # Examples
///
/// ```
/// use pictura_request::{CachePolicy, TransportDescriptor};
/// use std::time::Duration;
///
/// let url = "https://example.com/a.png".parse().unwrap();
/// let transport = TransportDescriptor::new(url)
///     .cache_policy(CachePolicy::ReloadIgnoringLocalCacheData)
///     .timeout(Duration::from_secs(15))
///     .header("Accept", "image/webp");
/// assert_eq!(transport.headers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportDescriptor {
    pub url: Url,

    /// Default: [`CachePolicy::UseProtocolCachePolicy`]
    pub cache_policy: CachePolicy,

    /// Default: 60s
    pub timeout: Duration,

    /// Default: true
    pub allows_cellular_access: bool,

    /// Sent with every attempt. Default: empty
    pub headers: Arc<[(String, String)]>,
}

impl TransportDescriptor {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            cache_policy: CachePolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            allows_cellular_access: true,
            headers: Arc::new([]),
        }
    }

    #[must_use]
    pub fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn allows_cellular_access(mut self, allows: bool) -> Self {
        self.allows_cellular_access = allows;
        self
    }

    /// Add a single header, keeping the existing ones.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Replace all headers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }
}

/// What a request points at: a bare locator or a full transport descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Url(Url),
    Transport(TransportDescriptor),
}

impl Resource {
    pub fn url(&self) -> &Url {
        match self {
            Resource::Url(url) => url,
            Resource::Transport(transport) => &transport.url,
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        match self {
            Resource::Url(_) => CachePolicy::default(),
            Resource::Transport(transport) => transport.cache_policy,
        }
    }

    pub fn allows_cellular_access(&self) -> bool {
        match self {
            Resource::Url(_) => true,
            Resource::Transport(transport) => transport.allows_cellular_access,
        }
    }

    pub fn timeout(&self) -> Duration {
        match self {
            Resource::Url(_) => DEFAULT_TIMEOUT,
            Resource::Transport(transport) => transport.timeout,
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        match self {
            Resource::Url(_) => &[],
            Resource::Transport(transport) => &transport.headers,
        }
    }

    /// The descriptor the transport should execute. Bare locators resolve to
    /// a descriptor with default parameters.
    pub fn to_transport(&self) -> TransportDescriptor {
        match self {
            Resource::Url(url) => TransportDescriptor::new(url.clone()),
            Resource::Transport(transport) => transport.clone(),
        }
    }

    /// Absolute string form of the locator.
    pub(crate) fn absolute_string(&self) -> Arc<str> {
        Arc::from(self.url().as_str())
    }
}

impl From<Url> for Resource {
    fn from(url: Url) -> Self {
        Resource::Url(url)
    }
}

impl From<TransportDescriptor> for Resource {
    fn from(transport: TransportDescriptor) -> Self {
        Resource::Transport(transport)
    }
}
