//! Error taxonomy for cache operations.
//!
//! Only two things can go wrong when talking to a cache: the caller handed
//! over something unusable, or the requested key exists neither in the cache
//! nor in the backing storage. Storage itself never reports errors; transport
//! failures are the storage implementation's business and surface as absence.

use thiserror::Error;

/// Errors returned by [`Cache`](crate::Cache) and
/// [`CacheFactory`](crate::CacheFactory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The caller passed a missing key, a zero capacity or an unknown policy.
    ///
    /// Always detected before any cache state is touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The key is absent from both the cache and the backing storage.
    #[error("item not found in cache or storage")]
    ItemNotFound,
}

impl CacheError {
    /// Returns `true` for [`CacheError::InvalidArgument`].
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CacheError::InvalidArgument(_))
    }

    /// Returns `true` for [`CacheError::ItemNotFound`].
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::ItemNotFound)
    }
}
