//! Memoization of World selector resolutions.
//!
//! A resolution is a pure function of the World address and the World function selector, so
//! an entry is never invalidated or overwritten once inserted.

use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::{map::HashMap, Address, FixedBytes, Selector};
use once_cell::sync::Lazy;

use crate::SystemFunction;

/// The cache shared by every interceptor that does not bring its own.
static SHARED: Lazy<Arc<ResolutionCache>> = Lazy::new(Default::default);

/// Identifies one resolution: the World address followed by the World function selector.
///
/// The address is part of the key, so two World deployments that expose the same selector are
/// cached independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(FixedBytes<24>);

impl CacheKey {
    /// Creates the key of `world_function_selector` on the World at `world_address`.
    pub fn new(world_address: Address, world_function_selector: Selector) -> Self {
        let mut key = FixedBytes::<24>::ZERO;
        key[..Address::len_bytes()].copy_from_slice(world_address.as_slice());
        key[Address::len_bytes()..].copy_from_slice(world_function_selector.as_slice());
        Self(key)
    }

    /// The World address of this key.
    pub fn world_address(&self) -> Address {
        Address::from_slice(&self.0[..Address::len_bytes()])
    }

    /// The World function selector of this key.
    pub fn world_function_selector(&self) -> Selector {
        Selector::from_slice(&self.0[Address::len_bytes()..])
    }

    /// The raw concatenated key.
    pub const fn as_bytes(&self) -> &FixedBytes<24> {
        &self.0
    }
}

/// A thread-safe map from [`CacheKey`] to the resolved [`SystemFunction`].
///
/// The map grows for as long as the cache lives. Inserts are first-writer-wins: a second insert
/// for a present key leaves the stored value untouched, which makes concurrent resolutions of the
/// same key harmless.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<CacheKey, SystemFunction>>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    pub fn shared() -> Arc<Self> {
        SHARED.clone()
    }

    /// Returns the resolution stored under `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<SystemFunction> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key).copied()
    }

    /// Stores `value` under `key` unless the key is already present, and returns the value that
    /// ends up stored.
    pub fn insert(&self, key: CacheKey, value: SystemFunction) -> SystemFunction {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner).entry(key).or_insert(value)
    }

    /// Returns `true` if a resolution is stored under `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).contains_key(key)
    }

    /// The number of stored resolutions.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
