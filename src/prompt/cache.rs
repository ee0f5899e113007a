//! Memoisation of base prompts per `(user, content type)`.
//!
//! Read-mostly. Concurrent misses for the same key may both recompute and
//! both store; the last writer wins and the values are identical, so no
//! per-key locking is done. Callers that mutate profile, pillar, audience or
//! style data must call [`PromptCache::invalidate`] for that user.
//!
//! Each user has a generation counter bumped by `invalidate`. A builder reads
//! it with [`PromptCache::generation`] before fetching and stores through
//! [`PromptCache::put_if_current`], so a prompt built from data read before an
//! invalidation is never stored after it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::profile::ContentType;

/// Default time-to-live for cached base prompts (10 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

type CacheKey = (String, ContentType);

#[derive(Debug, Clone)]
struct CacheEntry {
    prompt: String,
    created_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    generations: HashMap<String, u64>,
}

impl CacheState {
    fn generation(&self, user_id: &str) -> u64 {
        self.generations.get(user_id).copied().unwrap_or(0)
    }

    /// Drop expired entries, then insert.
    fn store(&mut self, key: CacheKey, prompt: String, ttl: Duration) {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.created_at.elapsed() < ttl);
        let swept = before.saturating_sub(self.entries.len());
        if swept > 0 {
            debug!(swept, "swept expired base prompts");
        }
        self.entries.insert(
            key,
            CacheEntry {
                prompt,
                created_at: Instant::now(),
            },
        );
    }
}

/// Shared base-prompt cache. Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct PromptCache {
    state: Arc<RwLock<CacheState>>,
    ttl: Duration,
}

impl PromptCache {
    /// Create an empty cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            ttl,
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached base prompt, if present and younger than the TTL.
    ///
    /// Expired entries are evicted on access.
    pub async fn get(&self, user_id: &str, content_type: &ContentType) -> Option<String> {
        let key = (user_id.to_owned(), content_type.clone());
        {
            let state = self.state.read().await;
            let entry = state.entries.get(&key)?;
            if entry.created_at.elapsed() < self.ttl {
                return Some(entry.prompt.clone());
            }
        }

        let mut state = self.state.write().await;
        // Re-check under the write lock: a fresh put may have landed meanwhile.
        if state
            .entries
            .get(&key)
            .is_some_and(|e| e.created_at.elapsed() >= self.ttl)
        {
            state.entries.remove(&key);
            debug!(user_id, content_type = %content_type, "evicted expired base prompt");
        }
        None
    }

    /// Current invalidation generation for a user.
    pub async fn generation(&self, user_id: &str) -> u64 {
        self.state.read().await.generation(user_id)
    }

    /// Store or overwrite the base prompt for a key.
    ///
    /// Expired entries for every key are swept first.
    pub async fn put(&self, user_id: &str, content_type: &ContentType, prompt: String) {
        let mut state = self.state.write().await;
        state.store((user_id.to_owned(), content_type.clone()), prompt, self.ttl);
    }

    /// Store the prompt only if the user has not been invalidated since
    /// `generation` was read. Returns whether the prompt was stored.
    pub async fn put_if_current(
        &self,
        user_id: &str,
        content_type: &ContentType,
        prompt: String,
        generation: u64,
    ) -> bool {
        let mut state = self.state.write().await;
        if state.generation(user_id) != generation {
            debug!(
                user_id,
                content_type = %content_type,
                "discarded base prompt built before invalidation"
            );
            return false;
        }
        state.store((user_id.to_owned(), content_type.clone()), prompt, self.ttl);
        true
    }

    /// Remove every entry for a user across all content types and bump the
    /// user's generation.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, user_id: &str) -> usize {
        let mut state = self.state.write().await;
        let next = state.generation(user_id).saturating_add(1);
        state.generations.insert(user_id.to_owned(), next);
        let before = state.entries.len();
        state.entries.retain(|(uid, _), _| uid != user_id);
        let removed = before.saturating_sub(state.entries.len());
        debug!(user_id, removed, generation = next, "invalidated cached base prompts");
        removed
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        self.state.write().await.entries.clear();
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

impl Default for PromptCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
