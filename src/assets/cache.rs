//! Memoizing asset cache.
//!
//! The cache keeps one canonical decoded object per locator and never hands
//! it out. Every successful [`AssetCache::resolve`] returns a deep clone that
//! the caller owns, may move around freely, and must dispose when done.
//!
//! Concurrent resolves of the same uncached locator share a single decode:
//! the first caller registers the decode as in flight, later callers wait on
//! the same shared future, and each of them gets its own clone of the result.
//! Failed decodes are not cached, so a later resolve tries again.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use super::decoder::AssetDecoder;
use crate::error::DecodeError;
use crate::gfx::scene::SceneObject;

type PendingDecode = Shared<LocalBoxFuture<'static, Result<Rc<SceneObject>, DecodeError>>>;

/// Counters describing how resolves were served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resolves served from a canonical object without I/O
    pub hits: u64,
    /// Resolves that had to wait for a decode
    pub misses: u64,
    /// Decodes actually started
    pub decodes: u64,
    /// Resolves that ended in a decode error
    pub failures: u64,
}

/// Locator-keyed cache of decoded scene objects
pub struct AssetCache {
    decoder: Rc<dyn AssetDecoder>,
    templates: RefCell<HashMap<String, Rc<SceneObject>>>,
    in_flight: RefCell<HashMap<String, PendingDecode>>,
    stats: Cell<CacheStats>,
}

impl AssetCache {
    pub fn new(decoder: Rc<dyn AssetDecoder>) -> Self {
        Self {
            decoder,
            templates: RefCell::new(HashMap::new()),
            in_flight: RefCell::new(HashMap::new()),
            stats: Cell::new(CacheStats::default()),
        }
    }

    /// Resolve `locator` to an independent scene object.
    ///
    /// Returns a clone of the canonical object when it is cached, otherwise
    /// decodes (or joins an in-flight decode), stores the result and returns a
    /// clone of it.
    pub async fn resolve(&self, locator: &str) -> Result<SceneObject, DecodeError> {
        if let Some(template) = self.template(locator) {
            self.record(|s| s.hits += 1);
            log::debug!("Cache hit for '{}'", locator);
            return Ok(template.deep_clone());
        }

        self.record(|s| s.misses += 1);
        let pending = self.pending_decode(locator);
        let result = pending.clone().await;
        self.retire(locator, &pending);

        match result {
            Ok(decoded) => {
                let template = Rc::clone(
                    self.templates
                        .borrow_mut()
                        .entry(locator.to_string())
                        .or_insert(decoded),
                );
                Ok(template.deep_clone())
            }
            Err(e) => {
                self.record(|s| s.failures += 1);
                log::warn!("Failed to resolve '{}': {}", locator, e);
                Err(e)
            }
        }
    }

    /// Whether a canonical object is stored for `locator`
    pub fn contains(&self, locator: &str) -> bool {
        self.templates.borrow().contains_key(locator)
    }

    /// Whether a decode for `locator` is currently running
    pub fn is_decoding(&self, locator: &str) -> bool {
        self.in_flight.borrow().contains_key(locator)
    }

    /// Number of cached canonical objects
    pub fn len(&self) -> usize {
        self.templates.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.borrow().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    fn template(&self, locator: &str) -> Option<Rc<SceneObject>> {
        self.templates.borrow().get(locator).cloned()
    }

    fn pending_decode(&self, locator: &str) -> PendingDecode {
        let mut in_flight = self.in_flight.borrow_mut();
        if let Some(pending) = in_flight.get(locator) {
            log::debug!("Joining in-flight decode of '{}'", locator);
            return pending.clone();
        }

        self.record(|s| s.decodes += 1);
        log::debug!("Decoding '{}'", locator);

        let pending = self
            .decoder
            .decode(locator)
            .map(|result| result.map(Rc::new))
            .boxed_local()
            .shared();
        in_flight.insert(locator.to_string(), pending.clone());
        pending
    }

    /// Remove the in-flight entry for `locator` if it is still `pending`.
    ///
    /// A waiter on a failed decode can finish after a newer decode of the
    /// same locator was registered; that entry must stay.
    fn retire(&self, locator: &str, pending: &PendingDecode) {
        let mut in_flight = self.in_flight.borrow_mut();
        if in_flight
            .get(locator)
            .is_some_and(|current| current.ptr_eq(pending))
        {
            in_flight.remove(locator);
        }
    }

    fn record<F: FnOnce(&mut CacheStats)>(&self, update: F) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}
