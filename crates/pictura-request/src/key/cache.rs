use std::hash::{Hash, Hasher};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::key::OpaqueKey;
use crate::processor::ProcessorChain;
use crate::request::ImageRequest;

/// Equivalence class used to locate decoded and processed images.
///
/// Two derived keys are equal iff their image identities (identity hint if
/// present, absolute locator otherwise) are equal and their effective
/// processor chains have the same identifier sequence. Transport parameters
/// do not discriminate. A request with a cache key override compares only by
/// that override.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Repr);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Custom(OpaqueKey),
    Derived {
        identity: Arc<str>,
        processors: ProcessorChain,
    },
}

// Hashes the chain length only; equal chains always have equal lengths.
impl Hash for Repr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Repr::Custom(key) => key.hash(state),
            Repr::Derived {
                identity,
                processors,
            } => {
                identity.hash(state);
                processors.len().hash(state);
            }
        }
    }
}

impl CacheKey {
    /// Snapshot the image identity of `request`.
    pub fn of(request: &ImageRequest) -> Self {
        if let Some(key) = request.cache_key_override() {
            tracing::trace!(?key, "cache key taken from override");
            return CacheKey(Repr::Custom(key.clone()));
        }

        let identity = match request.image_id() {
            Some(id) => Arc::from(id),
            None => request.locator_arc().clone(),
        };
        CacheKey(Repr::Derived {
            identity,
            processors: request.processors().clone(),
        })
    }

    pub fn is_override(&self) -> bool {
        matches!(self.0, Repr::Custom(_))
    }

    /// Identity hint or locator, `None` for overrides.
    pub fn identity(&self) -> Option<&str> {
        match &self.0 {
            Repr::Custom(_) => None,
            Repr::Derived { identity, .. } => Some(&**identity),
        }
    }

    pub fn processor_identifiers(&self) -> Vec<&str> {
        match &self.0 {
            Repr::Custom(_) => Vec::new(),
            Repr::Derived { processors, .. } => processors.identifiers().collect(),
        }
    }

    /// Lowercase hex SHA-256 of the identity and processor identifiers,
    /// stable across processes. Suitable as a disk cache file name.
    ///
    /// Overridden keys have no stable byte form and return `None`.
    pub fn digest(&self) -> Option<String> {
        let Repr::Derived {
            identity,
            processors,
        } = &self.0
        else {
            return None;
        };

        let mut hasher = Sha256::new();
        update_framed(&mut hasher, identity.as_bytes());
        for identifier in processors.identifiers() {
            update_framed(&mut hasher, identifier.as_bytes());
        }
        Some(hex::encode(hasher.finalize()))
    }
}

fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
