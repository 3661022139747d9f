//! Per-key admission control
//!
//! One token bucket per API key, shared by every concurrent request
//! presenting that key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::RwLock;

/// Bucket capacity for every key
pub const BUCKET_CAPACITY: u32 = 100;

/// Tokens restored per second; a drained bucket refills in one second
pub const REFILL_RATE: f64 = 100.0;

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket with continuous elapsed-time refill
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_rate: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity: f64::from(capacity),
            refill_rate,
            state: Mutex::new(BucketState {
                tokens: f64::from(capacity),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Consume one token if available.
    ///
    /// Refill is computed from elapsed time under the same lock as the
    /// consumption, so concurrent callers never double-spend a token.
    pub fn allow(&self) -> bool {
        let mut state = self.state.lock().unwrap();

        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Registry holding one limiter per API key.
///
/// Entries are created lazily on first sight of a key and live for the
/// process lifetime.
#[derive(Debug)]
pub struct RateLimiterRegistry {
    limiters: RwLock<HashMap<String, Arc<TokenBucket>>>,
    capacity: u32,
    refill_rate: f64,
}

impl RateLimiterRegistry {
    pub fn new() -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            capacity: BUCKET_CAPACITY,
            refill_rate: REFILL_RATE,
        }
    }

    /// Get the limiter for a key, creating it on first access.
    ///
    /// Racing first-time callers all end up with the same bucket: the fast
    /// path is a shared read, and insertion goes through `entry` under the
    /// write lock, so a loser of the race observes the winner's instance
    /// rather than inserting a second one.
    pub async fn get_limiter(&self, api_key: &str) -> Arc<TokenBucket> {
        {
            let limiters = self.limiters.read().await;
            if let Some(limiter) = limiters.get(api_key) {
                return Arc::clone(limiter);
            }
        }

        let mut limiters = self.limiters.write().await;
        Arc::clone(
            limiters
                .entry(api_key.to_string())
                .or_insert_with(|| Arc::new(TokenBucket::new(self.capacity, self.refill_rate))),
        )
    }

    /// Number of keys currently tracked
    pub async fn len(&self) -> usize {
        self.limiters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.limiters.read().await.is_empty()
    }
}

impl Default for RateLimiterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_bucket_admits_capacity_then_rejects() {
        let bucket = TokenBucket::new(BUCKET_CAPACITY, 0.0);

        for i in 0..100 {
            assert!(bucket.allow(), "call {} should be admitted", i + 1);
        }
        assert!(!bucket.allow(), "call 101 should be rejected");
    }

    #[test]
    fn test_bucket_refills_over_time() {
        let bucket = TokenBucket::new(BUCKET_CAPACITY, REFILL_RATE);

        while bucket.allow() {}
        assert!(!bucket.allow());

        std::thread::sleep(Duration::from_secs(1));
        assert!(bucket.allow(), "bucket should refill after a second");
    }

    #[test]
    fn test_refill_capped_at_capacity() {
        let bucket = TokenBucket::new(2, 100.0);

        // A second of refill would restore 100 tokens; the bucket holds 2
        std::thread::sleep(Duration::from_secs(1));

        assert!(bucket.allow());
        assert!(bucket.allow());
        assert!(!bucket.allow());
    }

    #[tokio::test]
    async fn test_same_key_shares_one_bucket() {
        let registry = RateLimiterRegistry::new();

        let first = registry.get_limiter("sk_abc").await;
        let second = registry.get_limiter("sk_abc").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_get_distinct_buckets() {
        let registry = RateLimiterRegistry::new();

        let a = registry.get_limiter("sk_a").await;
        let b = registry.get_limiter("sk_b").await;

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_yields_one_instance() {
        let registry = Arc::new(RateLimiterRegistry::new());

        let mut handles = Vec::new();
        for _ in 0..50 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.get_limiter("sk_contested").await
            }));
        }

        let mut limiters = Vec::new();
        for handle in handles {
            limiters.push(handle.await.unwrap());
        }

        let first = &limiters[0];
        for limiter in &limiters {
            assert!(Arc::ptr_eq(first, limiter));
        }
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_token_pool() {
        let registry = Arc::new(RateLimiterRegistry::new());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let limiter = registry.get_limiter("sk_pool").await;
                let mut admitted = 0u32;
                for _ in 0..50 {
                    if limiter.allow() {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }

        // 200 attempts against a 100-token pool; the refill during the test
        // window admits at most a handful extra.
        assert!(total >= 100);
        assert!(total < 150, "admitted {} out of 200, pool not shared", total);
    }
}
