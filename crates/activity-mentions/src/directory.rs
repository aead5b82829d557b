//! Username directories
//!
//! Usernames are resolved with one point query per distinct name instead of
//! loading the whole users collection.

use crate::error::MentionError;
use activity_model::{fields, UserId};
use activity_store::{DocumentStore, Query};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Resolves usernames to user identifiers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a single username
    async fn lookup(&self, username: &str) -> Result<Option<UserId>, MentionError>;

    /// Look up many usernames; unknown names are absent from the map
    async fn resolve(&self, usernames: &[String]) -> Result<HashMap<String, UserId>, MentionError> {
        let mut resolved = HashMap::with_capacity(usernames.len());
        for name in usernames {
            if let Some(id) = self.lookup(name).await? {
                resolved.insert(name.clone(), id);
            }
        }
        Ok(resolved)
    }
}

/// Directory backed by the users collection of a [`DocumentStore`]
#[derive(Clone)]
pub struct StoreUserDirectory {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl StoreUserDirectory {
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Debug for StoreUserDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreUserDirectory")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UserDirectory for StoreUserDirectory {
    async fn lookup(&self, username: &str) -> Result<Option<UserId>, MentionError> {
        let query = Query::collection(self.collection.as_str()).where_eq(fields::USERNAME, username);
        let docs = self.store.query(&query).await?;

        let Some(doc) = docs.first() else {
            return Ok(None);
        };
        if docs.len() > 1 {
            tracing::warn!("Username '{}' matches {} user documents", username, docs.len());
        }

        doc.data
            .get(fields::USER_ID)
            .and_then(serde_json::Value::as_u64)
            .map(|id| Some(UserId(id)))
            .ok_or_else(|| MentionError::InvalidUser {
                username: username.to_string(),
                reason: format!("document {} has no numeric id", doc.id),
            })
    }

    async fn resolve(&self, usernames: &[String]) -> Result<HashMap<String, UserId>, MentionError> {
        let lookups = usernames.iter().map(|name| async move {
            self.lookup(name).await.map(|id| id.map(|id| (name.clone(), id)))
        });

        let resolved = try_join_all(lookups).await?;
        Ok(resolved.into_iter().flatten().collect())
    }
}
