//! Cache Configuration
//!
//! A cache is described by two things: how many entries it may hold and
//! which eviction policy chooses what to drop when it is full.
//!
//! # Design Philosophy
//!
//! The configuration struct has public fields, so it can be written out
//! literally. `capacity` is a `NonZeroUsize`, which makes a zero-sized cache
//! unrepresentable; [`CacheConfig::new`] is the validating entry point for a
//! capacity that arrives as a plain integer.
//!
//! # Examples
//!
//! ```
//! use storage_cache::config::CacheConfig;
//! use storage_cache::PolicyKind;
//! use core::num::NonZeroUsize;
//!
//! let config = CacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//!     policy: PolicyKind::Lfu,
//! };
//! assert_eq!(config.capacity.get(), 1000);
//!
//! // Validated construction from untrusted input
//! assert!(CacheConfig::new(0, PolicyKind::Lru).is_err());
//! ```

use core::fmt;
use core::num::NonZeroUsize;

use crate::error::CacheError;
use crate::policy::PolicyKind;

/// Configuration for a bounded read-through cache.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries held at once.
/// - `policy`: Eviction policy used once the cache is full.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    pub capacity: NonZeroUsize,
    /// Which entry to drop when a new key arrives at a full cache.
    pub policy: PolicyKind,
}

impl CacheConfig {
    /// Builds a configuration, rejecting a zero capacity.
    pub fn new(capacity: usize, policy: PolicyKind) -> Result<Self, CacheError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or(CacheError::InvalidArgument("capacity must be positive"))?;
        Ok(CacheConfig { capacity, policy })
    }

    /// Builds a configuration from a policy name such as `"lru"` or `"LFU"`.
    pub fn from_names(capacity: usize, policy: &str) -> Result<Self, CacheError> {
        let policy = policy.parse::<PolicyKind>()?;
        Self::new(capacity, policy)
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .finish()
    }
}
