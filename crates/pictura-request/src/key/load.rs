use std::sync::Arc;

use crate::data::CachePolicy;
use crate::key::OpaqueKey;
use crate::request::ImageRequest;

/// Equivalence class used to deduplicate raw data loads.
///
/// Two derived keys are equal iff the absolute locator, the cache policy and
/// the cellular-access flag are equal. Headers, timeout and processors do not
/// discriminate: they do not change the bytes on the wire. A request with a
/// load key override compares only by that override.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadKey(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Custom(OpaqueKey),
    Derived {
        locator: Arc<str>,
        cache_policy: CachePolicy,
        allows_cellular_access: bool,
    },
}

impl LoadKey {
    /// Snapshot the load identity of `request`.
    pub fn of(request: &ImageRequest) -> Self {
        if let Some(key) = request.load_key_override() {
            tracing::trace!(?key, "load key taken from override");
            return LoadKey(Repr::Custom(key.clone()));
        }

        let resource = request.resource();
        LoadKey(Repr::Derived {
            locator: request.locator_arc().clone(),
            cache_policy: resource.cache_policy(),
            allows_cellular_access: resource.allows_cellular_access(),
        })
    }

    pub fn is_override(&self) -> bool {
        matches!(self.0, Repr::Custom(_))
    }

    /// The locator this key was derived from, `None` for overrides.
    pub fn locator(&self) -> Option<&str> {
        match &self.0 {
            Repr::Custom(_) => None,
            Repr::Derived { locator, .. } => Some(&**locator),
        }
    }
}
