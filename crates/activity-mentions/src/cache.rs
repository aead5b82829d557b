//! Username cache using moka
//!
//! Sits in front of any [`UserDirectory`]. Only resolved names are cached, so
//! a user who registers after being mentioned is found on the next lookup.

use crate::directory::UserDirectory;
use crate::error::MentionError;
use activity_model::UserId;
use async_trait::async_trait;
use moka::future::Cache;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryCacheStats {
    /// Number of cached usernames
    pub entry_count: u64,
}

/// Caching directory wrapper
#[derive(Clone)]
pub struct CachedUserDirectory {
    inner: Arc<dyn UserDirectory>,
    cache: Cache<String, UserId>,
}

impl CachedUserDirectory {
    /// Create with max capacity and no expiration
    #[inline]
    #[must_use]
    pub fn new(inner: Arc<dyn UserDirectory>, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
        }
    }

    /// Create with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(inner: Arc<dyn UserDirectory>, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drop a cached username (after a rename)
    #[inline]
    pub async fn invalidate(&self, username: &str) {
        self.cache.invalidate(username).await;
    }

    /// Drop every cached username
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> DirectoryCacheStats {
        DirectoryCacheStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

impl fmt::Debug for CachedUserDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedUserDirectory")
            .field("entry_count", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UserDirectory for CachedUserDirectory {
    async fn lookup(&self, username: &str) -> Result<Option<UserId>, MentionError> {
        if let Some(id) = self.cache.get(username).await {
            return Ok(Some(id));
        }

        let found = self.inner.lookup(username).await?;
        if let Some(id) = found {
            self.cache.insert(username.to_string(), id).await;
        }
        Ok(found)
    }

    async fn resolve(&self, usernames: &[String]) -> Result<HashMap<String, UserId>, MentionError> {
        let mut resolved = HashMap::with_capacity(usernames.len());
        let mut misses = Vec::new();

        for name in usernames {
            match self.cache.get(name.as_str()).await {
                Some(id) => {
                    resolved.insert(name.clone(), id);
                }
                None => misses.push(name.clone()),
            }
        }

        if !misses.is_empty() {
            tracing::debug!(
                "Username cache: {} hits, {} misses",
                resolved.len(),
                misses.len()
            );
            for (name, id) in self.inner.resolve(&misses).await? {
                self.cache.insert(name.clone(), id).await;
                resolved.insert(name, id);
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MockUserDirectory;
    use mockall::predicate::{eq, function};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn repeated_resolve_hits_cache() {
        let mut inner = MockUserDirectory::new();
        inner
            .expect_resolve()
            .with(function(|names: &[String]| names == ["alice", "bob"]))
            .times(1)
            .returning(|_| Ok(HashMap::from([("alice".to_string(), UserId(1))])));

        let cached = CachedUserDirectory::new(Arc::new(inner), 100);

        let first = cached.resolve(&names(&["alice", "bob"])).await.unwrap();
        assert_eq!(first.get("alice"), Some(&UserId(1)));
        assert!(first.get("bob").is_none());

        // alice now cached, bob still a miss
        let mut inner_again = MockUserDirectory::new();
        inner_again
            .expect_resolve()
            .with(function(|names: &[String]| names == ["bob"]))
            .times(1)
            .returning(|_| Ok(HashMap::new()));
        let cached = CachedUserDirectory {
            inner: Arc::new(inner_again),
            cache: cached.cache.clone(),
        };

        let second = cached.resolve(&names(&["alice", "bob"])).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second["alice"], UserId(1));
    }

    #[tokio::test]
    async fn fully_cached_resolve_skips_inner() {
        let mut inner = MockUserDirectory::new();
        inner
            .expect_lookup()
            .with(eq("alice"))
            .times(1)
            .returning(|_| Ok(Some(UserId(1))));
        inner.expect_resolve().never();

        let cached = CachedUserDirectory::new(Arc::new(inner), 100);
        assert_eq!(cached.lookup("alice").await.unwrap(), Some(UserId(1)));

        let resolved = cached.resolve(&names(&["alice"])).await.unwrap();
        assert_eq!(resolved["alice"], UserId(1));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let mut inner = MockUserDirectory::new();
        inner
            .expect_lookup()
            .times(2)
            .returning(|_| Ok(Some(UserId(5))));

        let cached = CachedUserDirectory::new(Arc::new(inner), 100);
        cached.lookup("eve").await.unwrap();
        cached.invalidate("eve").await;
        cached.lookup("eve").await.unwrap();
    }

    #[tokio::test]
    async fn inner_errors_are_not_cached() {
        let mut inner = MockUserDirectory::new();
        let mut calls = 0;
        inner.expect_lookup().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(MentionError::Directory("timeout".into()))
            } else {
                Ok(Some(UserId(9)))
            }
        });

        let cached = CachedUserDirectory::new(Arc::new(inner), 100);
        assert!(cached.lookup("zed").await.is_err());
        assert_eq!(cached.lookup("zed").await.unwrap(), Some(UserId(9)));
    }
}
