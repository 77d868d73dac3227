//! Process-lifetime cache of contract decimal precision.
//!
//! Precision is immutable per deployed contract, so entries are never
//! evicted. Thread-safe via `RwLock<HashMap<..>>`; two tasks filling the same
//! entry concurrently both succeed and the last write wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use crate::contract::{Contract, Platform};

/// Contract address → decimal precision.
pub struct DecimalCache {
    platform: Platform,
    entries: RwLock<HashMap<String, u32>>,
}

impl DecimalCache {
    /// A cache for `platform`, pre-seeded with its native coin.
    pub fn new(platform: Platform) -> Self {
        let native = Contract::native(platform);
        let mut entries = HashMap::new();
        if let Some(decimals) = native.native_decimals() {
            entries.insert(platform.normalize_address(native.address()), decimals);
        }
        Self {
            platform,
            entries: RwLock::new(entries),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Cached precision for the contract at `address`.
    pub fn get(&self, address: &str) -> Option<u32> {
        let key = self.platform.normalize_address(address);
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied()
    }

    pub fn insert(&self, address: &str, decimals: u32) {
        let key = self.platform.normalize_address(address);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, decimals);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached precision, or run `fetch` and cache what it yields.
    ///
    /// The lock is not held while `fetch` runs. Errors are returned to the
    /// caller and leave the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, address: &str, fetch: F) -> Result<u32, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u32, E>>,
    {
        if let Some(decimals) = self.get(address) {
            return Ok(decimals);
        }
        let decimals = fetch().await?;
        tracing::debug!(platform = %self.platform, address, decimals, "caching contract decimals");
        self.insert(address, decimals);
        Ok(decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

    #[test]
    fn native_is_pre_seeded() {
        let cache = DecimalCache::new(Platform::Ethereum);
        assert_eq!(cache.get(Contract::Eth.address()), Some(18));
        assert_eq!(cache.len(), 1);

        let cache = DecimalCache::new(Platform::Tron);
        assert_eq!(cache.get(Contract::Trx.address()), Some(6));
    }

    #[test]
    fn keys_are_normalized() {
        let cache = DecimalCache::new(Platform::Ethereum);
        cache.insert("0xDAC17F958D2EE523A2206206994597C13D831EC7", 6);
        assert_eq!(cache.get(USDT), Some(6));
    }

    #[tokio::test]
    async fn fetches_once_then_hits() {
        let cache = DecimalCache::new(Platform::Ethereum);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let d = cache
                .get_or_fetch(USDT, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(6)
                })
                .await
                .unwrap();
            assert_eq!(d, 6);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn native_never_fetches() {
        let cache = DecimalCache::new(Platform::Ethereum);
        let d = cache
            .get_or_fetch(Contract::Eth.address(), || async { Err::<u32, _>("should not run") })
            .await
            .unwrap();
        assert_eq!(d, 18);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = DecimalCache::new(Platform::Ethereum);
        let err = cache
            .get_or_fetch(USDT, || async { Err::<u32, _>("node down") })
            .await
            .unwrap_err();
        assert_eq!(err, "node down");
        assert_eq!(cache.get(USDT), None);
    }

    #[tokio::test]
    async fn concurrent_first_writes_agree() {
        let cache = Arc::new(DecimalCache::new(Platform::Ethereum));
        let tasks = (0..16).map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_fetch(USDT, || async {
                        tokio::task::yield_now().await;
                        Ok::<_, String>(6)
                    })
                    .await
            })
        });
        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), 6);
        }
        assert_eq!(cache.get(USDT), Some(6));
        assert_eq!(cache.len(), 2);
    }
}
