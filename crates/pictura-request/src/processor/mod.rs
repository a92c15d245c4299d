//! Image processors and ordered processor chains.
//!
//! A request stores its processors in a [`ProcessorState`]: unset (use the
//! platform default), explicitly none, or an explicit [`ProcessorChain`].
//! Only the *effective* chain matters to callers and to the cache key.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::image::Image;

#[cfg(feature = "decompression")]
mod decompress;

#[cfg(feature = "decompression")]
pub use decompress::Decompressor;

/// A named, pure image transform.
///
/// # Identifier contract
///
/// `identifier` takes part in [`CacheKey`](crate::CacheKey) equality, so it
/// must be:
/// - stable: the same configuration always yields the same identifier,
/// - distinct: different configurations yield different identifiers.
///
/// This is not checked. Violations silently merge or split cache entries.
pub trait Processor: Send + Sync {
    fn identifier(&self) -> &str;

    /// Returns `None` when the image cannot be processed.
    fn process(&self, image: Image) -> Option<Image>;
}

type Closure = Arc<dyn Fn(Image) -> Option<Image> + Send + Sync>;

/// A processor built from an identifier and a closure.
#[derive(Clone)]
pub struct AnonymousProcessor {
    key: String,
    closure: Closure,
}

impl AnonymousProcessor {
    pub fn new<F>(key: impl Into<String>, closure: F) -> Self
    where
        F: Fn(Image) -> Option<Image> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            closure: Arc::new(closure),
        }
    }
}

impl Processor for AnonymousProcessor {
    fn identifier(&self) -> &str {
        &self.key
    }

    fn process(&self, image: Image) -> Option<Image> {
        (self.closure)(image)
    }
}

impl fmt::Debug for AnonymousProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnonymousProcessor")
            .field("key", &self.key)
            .field("closure", &"{ ... }")
            .finish()
    }
}

/// An ordered sequence of processors.
///
/// Two chains are equal iff their identifier sequences are equal. Order is
/// significant because processors do not commute.
#[derive(Clone, Default)]
pub struct ProcessorChain {
    processors: Vec<Arc<dyn Processor>>,
}

static EMPTY_CHAIN: ProcessorChain = ProcessorChain {
    processors: Vec::new(),
};

static DEFAULT_CHAIN: Lazy<ProcessorChain> = Lazy::new(|| {
    #[cfg(feature = "decompression")]
    {
        tracing::debug!("initializing default processor chain with decompressor");
        ProcessorChain::new().then(Decompressor::new())
    }
    #[cfg(not(feature = "decompression"))]
    {
        tracing::debug!("initializing empty default processor chain");
        ProcessorChain::new()
    }
});

/// The chain applied to requests that never set processors.
///
/// A single pass-through `Decompressor` with the `decompression` feature,
/// empty otherwise.
pub fn default_chain() -> &'static ProcessorChain {
    &DEFAULT_CHAIN
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Processor>> {
        self.processors.iter()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.processors.iter().map(|p| p.identifier())
    }

    pub fn push(&mut self, processor: Arc<dyn Processor>) {
        self.processors.push(processor);
    }

    /// Append a processor, consuming the chain.
    #[must_use]
    pub fn then<P: Processor + 'static>(mut self, processor: P) -> Self {
        self.push(Arc::new(processor));
        self
    }

    /// `self ++ other`, preserving the order of both.
    #[must_use]
    pub fn concat(mut self, other: &ProcessorChain) -> Self {
        self.processors.extend(other.processors.iter().cloned());
        self
    }

    /// Run every processor in order, stopping at the first failure.
    pub fn apply(&self, image: Image) -> Option<Image> {
        self.processors
            .iter()
            .try_fold(image, |image, processor| processor.process(image))
    }
}

impl PartialEq for ProcessorChain {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.identifiers().eq(other.identifiers())
    }
}

impl Eq for ProcessorChain {}

impl fmt::Debug for ProcessorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.identifiers()).finish()
    }
}

impl FromIterator<Arc<dyn Processor>> for ProcessorChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Processor>>>(iter: I) -> Self {
        Self {
            processors: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Arc<dyn Processor>>> for ProcessorChain {
    fn from(processors: Vec<Arc<dyn Processor>>) -> Self {
        Self { processors }
    }
}

/// Stored processor configuration of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProcessorState {
    /// Use [`default_chain`].
    #[default]
    Unset,
    /// Apply no processing at all.
    None,
    Chain(ProcessorChain),
}

impl ProcessorState {
    pub fn effective(&self) -> &ProcessorChain {
        match self {
            ProcessorState::Unset => default_chain(),
            ProcessorState::None => &EMPTY_CHAIN,
            ProcessorState::Chain(chain) => chain,
        }
    }

    /// Append to the effective chain, materializing it first if needed.
    pub fn push(&mut self, processor: Arc<dyn Processor>) {
        match self {
            ProcessorState::Chain(chain) => chain.push(processor),
            ProcessorState::Unset | ProcessorState::None => {
                let mut chain = self.effective().clone();
                chain.push(processor);
                *self = ProcessorState::Chain(chain);
            }
        }
    }
}

impl From<ProcessorChain> for ProcessorState {
    fn from(chain: ProcessorChain) -> Self {
        ProcessorState::Chain(chain)
    }
}

impl From<Option<ProcessorChain>> for ProcessorState {
    fn from(chain: Option<ProcessorChain>) -> Self {
        match chain {
            Some(chain) => ProcessorState::Chain(chain),
            None => ProcessorState::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Size;

    fn named(key: &str) -> Arc<dyn Processor> {
        Arc::new(AnonymousProcessor::new(key, Some))
    }

    fn chain(keys: &[&str]) -> ProcessorChain {
        keys.iter().map(|k| named(k)).collect()
    }

    #[test]
    fn test_chain_equality_is_ordered() {
        assert_eq!(chain(&["a", "b"]), chain(&["a", "b"]));
        assert_ne!(chain(&["a", "b"]), chain(&["b", "a"]));
        assert_ne!(chain(&["a"]), chain(&["a", "a"]));
    }

    #[test]
    fn test_concat_is_associative() {
        let (a, b, c) = (chain(&["a"]), chain(&["b", "c"]), chain(&["d"]));
        let left = a.clone().concat(&b).concat(&c);
        let right = a.concat(&b.concat(&c));
        assert_eq!(left, right);
        assert_eq!(left.identifiers().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_apply_runs_in_order_and_short_circuits() {
        let half = AnonymousProcessor::new("half", |image: Image| {
            let size = image.size();
            Some(image.resized(Size::new(size.width / 2, size.height / 2)))
        });
        let reject = AnonymousProcessor::new("reject", |_| None);

        let image = Image::filled(Size::new(8, 8), [0, 0, 0, 255]);
        let chain = ProcessorChain::new().then(half.clone()).then(half.clone());
        assert_eq!(chain.apply(image.clone()).unwrap().size(), Size::new(2, 2));

        let chain = ProcessorChain::new().then(reject).then(half);
        assert!(chain.apply(image).is_none());
    }

    #[test]
    fn test_state_effective() {
        assert_eq!(ProcessorState::Unset.effective(), default_chain());
        assert!(ProcessorState::None.effective().is_empty());
        assert_eq!(
            ProcessorState::Chain(chain(&["x"])).effective(),
            &chain(&["x"])
        );
    }

    #[test]
    fn test_push_materializes_effective_chain() {
        let mut state = ProcessorState::Unset;
        state.push(named("x"));
        let expected = default_chain().clone().concat(&chain(&["x"]));
        assert_eq!(state.effective(), &expected);

        let mut state = ProcessorState::None;
        state.push(named("x"));
        assert_eq!(state.effective(), &chain(&["x"]));

        let mut state = ProcessorState::Chain(chain(&["a"]));
        state.push(named("b"));
        assert_eq!(state.effective(), &chain(&["a", "b"]));
    }

    #[cfg(feature = "decompression")]
    #[test]
    fn test_default_chain_is_single_decompressor() {
        assert_eq!(default_chain().len(), 1);
        assert_eq!(
            default_chain().identifiers().next(),
            Some(Decompressor::new().identifier())
        );
    }

    #[cfg(not(feature = "decompression"))]
    #[test]
    fn test_default_chain_is_empty() {
        assert!(default_chain().is_empty());
    }
}
