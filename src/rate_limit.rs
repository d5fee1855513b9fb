//! Sliding-window admission control keyed by client identity.
//!
//! Each key owns a deque of the instants at which its requests were admitted
//! (oldest first). A call evicts instants that fell out of the trailing
//! window, then admits only if fewer than `max_requests` remain.
//!
//! State is process-local and never persisted: a restart empties every
//! bucket. Keys are spread over a fixed set of mutex-guarded shards so that
//! the evict/check/append sequence is atomic per key while unrelated keys
//! rarely contend.

use std::collections::hash_map::RandomState;
use std::collections::{HashMap, VecDeque};
use std::hash::BuildHasher;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

const SHARD_COUNT: usize = 16;

type Bucket = VecDeque<Instant>;

pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    shards: Box<[Mutex<HashMap<String, Bucket>>]>,
    hasher: RandomState,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(HashMap::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            max_requests,
            window,
            shards,
            hasher: RandomState::new(),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject one request for `key` at the current instant.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// Admit or reject one request for `key` as if it arrived at `now`.
    ///
    /// Rejections are not recorded, so a client hammering a closed window
    /// does not extend its own lockout.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut shard = self.shard_for(key).lock();
        let bucket = shard.entry(key.to_string()).or_default();

        evict_stale(bucket, now, self.window);

        if bucket.len() >= self.max_requests {
            return false;
        }
        bucket.push_back(now);
        true
    }

    /// Drop buckets with no admissions inside the window as of `now`.
    /// Returns the number of keys removed.
    pub fn purge_idle(&self, now: Instant) -> usize {
        let mut removed = 0;
        for shard in self.shards.iter() {
            let mut map = shard.lock();
            let before = map.len();
            map.retain(|_, bucket| {
                evict_stale(bucket, now, self.window);
                !bucket.is_empty()
            });
            removed += before - map.len();
        }
        removed
    }

    /// Number of keys currently holding a bucket (empty ones included).
    pub fn tracked_keys(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    fn shard_for(&self, key: &str) -> &Mutex<HashMap<String, Bucket>> {
        let idx = (self.hasher.hash_one(key) as usize) % self.shards.len();
        &self.shards[idx]
    }
}

/// Pop instants strictly older than `now - window` from the front.
fn evict_stale(bucket: &mut Bucket, now: Instant, window: Duration) {
    while let Some(&oldest) = bucket.front() {
        if now.saturating_duration_since(oldest) > window {
            bucket.pop_front();
        } else {
            break;
        }
    }
}
