//! Memoization of simulation results.
//!
//! A [`MemoCache`] maps a call signature to a previously computed result.
//! The signature is the function name, the argument and result types, and
//! the argument tuple serialized with `bincode`. Two calls whose arguments
//! are equal by value therefore share an entry even when they are distinct
//! objects, and any difference in value, order or type produces a
//! different signature.
//!
//! Floating-point arguments compare by bit pattern, not by `==`: `0.0`
//! and `-0.0` are different keys, while a NaN matches an identical NaN.
//!
//! Only what is passed as `args` takes part in the signature. Live state
//! such as a random source is captured by the `compute` closure instead,
//! which is what makes a cached random draw reusable.
//!
//! The cache is an explicit object, usually shared through an `Arc`. It
//! is unbounded unless built with [`MemoCache::with_capacity`], in which
//! case the least recently used entry is evicted on overflow.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CallSignature {
    function: &'static str,
    arg_type: &'static str,
    result_type: &'static str,
    args: Vec<u8>,
}

impl CallSignature {
    fn new<A: Serialize, T>(function: &'static str, args: &A) -> bincode::Result<Self> {
        Ok(Self {
            function,
            arg_type: type_name::<A>(),
            result_type: type_name::<T>(),
            args: bincode::serialize(args)?,
        })
    }
}

struct Entry {
    value: Box<dyn Any + Send + Sync>,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CallSignature, Entry>,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl CacheState {
    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(signature, _)| signature.clone());
        if let Some(signature) = oldest {
            self.entries.remove(&signature);
            self.evictions += 1;
            debug!(function = signature.function, "evicted cache entry");
        }
    }
}

/// Counters describing cache activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Thread-safe memoization cache keyed by call signature.
///
/// # Examples
/// ```
/// use prob_laws::memo::MemoCache;
///
/// let cache = MemoCache::new();
/// let mut calls = 0;
/// for _ in 0..3 {
///     let sum: Result<i64, ()> = cache.memoize("sum", (2_i64, 3_i64), |&(a, b)| {
///         calls += 1;
///         Ok(a + b)
///     });
///     assert_eq!(sum, Ok(5));
/// }
/// assert_eq!(calls, 1);
/// ```
pub struct MemoCache {
    state: Mutex<CacheState>,
    capacity: Option<NonZeroUsize>,
}

impl MemoCache {
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: None,
        }
    }

    /// Creates a cache holding at most `capacity` entries, evicting the
    /// least recently used entry when full.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: Some(capacity),
        }
    }

    /// Returns the cached result for `(function, args)`, or runs `compute`
    /// and stores its result.
    ///
    /// Errors from `compute` are returned as-is and never stored, so the
    /// next identical call computes again. If `args` cannot be serialized
    /// the call runs uncached.
    ///
    /// A single lock covers lookup, computation and insertion, so
    /// concurrent identical calls compute once. `compute` must not call
    /// back into the same cache.
    pub fn memoize<A, T, E, F>(&self, function: &'static str, args: A, compute: F) -> Result<T, E>
    where
        A: Serialize,
        T: Clone + Send + Sync + 'static,
        F: FnOnce(&A) -> Result<T, E>,
    {
        let signature = match CallSignature::new::<A, T>(function, &args) {
            Ok(signature) => signature,
            Err(e) => {
                warn!(function, error = %e, "cannot build cache key, computing uncached");
                return compute(&args);
            }
        };

        let mut guard = self.lock();
        let state = &mut *guard;
        state.clock += 1;
        let now = state.clock;

        if let Some(entry) = state.entries.get_mut(&signature) {
            if let Some(value) = entry.value.downcast_ref::<T>() {
                entry.last_used = now;
                state.hits += 1;
                debug!(function, "cache hit");
                return Ok(value.clone());
            }
        }

        state.misses += 1;
        debug!(function, "cache miss");
        let value = compute(&args)?;

        if !state.entries.contains_key(&signature) {
            if let Some(capacity) = self.capacity {
                while state.entries.len() >= capacity.get() {
                    state.evict_least_recent();
                }
            }
        }
        state.entries.insert(
            signature,
            Entry {
                value: Box::new(value.clone()),
                last_used: now,
            },
        );
        Ok(value)
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            entries: state.entries.len(),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity, `None` when unbounded.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Entries are inserted only after a computation completes, so a
        // poisoned map is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
