//! Activity fan-out dispatcher
//!
//! Turns [`ActivityRequest`]s into record writes and deletes. Each request
//! is one branch: its reads happen first, then at most one batch commit.
//! Branches of a single call are independent; a failure in one never rolls
//! back another.

use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::legacy::ActivityArgs;
use crate::outcome::{BranchOutcome, BranchStatus, DispatchReport};
use crate::request::{
    ActivityChange, ActivityRequest, CommentChange, CommentContent, CommentRef, PostChange, PostContent,
    ReactionActivity, ReactionChange, ReactionRef, ReplyChange, ReplyContent, ReplyRef,
};
use activity_mentions::{
    CachedUserDirectory, MentionExtractor, MentionResolver, StoreUserDirectory, UserDirectory,
};
use activity_model::{fields, ActivityKind, ActivityRecord, CommentTarget, Network};
use activity_store::{DocumentStore, Query, StoredDocument, WriteBatch};
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Dispatches activity requests against a document store
#[derive(Clone)]
pub struct ActivityDispatcher {
    store: Arc<dyn DocumentStore>,
    mentions: MentionResolver,
    config: DispatcherConfig,
}

impl ActivityDispatcher {
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, mentions: MentionResolver, config: DispatcherConfig) -> Self {
        Self {
            store,
            mentions,
            config,
        }
    }

    /// Build the dispatcher and its username directory from configuration
    ///
    /// Usernames are looked up in `config.users_collection` of the same
    /// store, behind a moka cache unless `user_cache.enabled` is false.
    ///
    /// # Errors
    /// Returns [`DispatchError::Config`] if the configuration does not validate
    pub fn from_config(store: Arc<dyn DocumentStore>, config: DispatcherConfig) -> Result<Self, DispatchError> {
        config.validate()?;

        let directory: Arc<dyn UserDirectory> = Arc::new(StoreUserDirectory::new(
            Arc::clone(&store),
            config.users_collection.as_str(),
        ));
        let directory: Arc<dyn UserDirectory> = if config.user_cache.enabled {
            Arc::new(CachedUserDirectory::with_ttl(
                directory,
                config.user_cache.capacity,
                config.user_cache.ttl(),
            ))
        } else {
            directory
        };

        let extractor = MentionExtractor::with_scan_limit(config.mention_scan_limit);
        let mentions = MentionResolver::with_extractor(extractor, directory);
        Ok(Self::new(store, mentions, config))
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn mentions(&self) -> &MentionResolver {
        &self.mentions
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Largest batch a branch may commit
    #[inline]
    #[must_use]
    pub fn batch_limit(&self) -> usize {
        self.config.max_batch_ops.min(self.store.max_batch_ops())
    }

    /// Compute the batch a request would commit, without committing it
    ///
    /// # Errors
    /// Returns error if the request is invalid, a read fails, or the batch
    /// exceeds [`Self::batch_limit`]
    pub async fn plan(&self, request: &ActivityRequest) -> Result<WriteBatch, DispatchError> {
        request.validate()?;

        let network = &request.network;
        let batch = match &request.change {
            ActivityChange::Reaction(ReactionChange::Create(r)) => self.plan_reaction(network, r)?,
            ActivityChange::Reaction(ReactionChange::Delete(r)) => self.plan_reaction_delete(network, r).await?,
            ActivityChange::Post(PostChange::Create(p)) => self.plan_post(network, p, false).await?,
            ActivityChange::Post(PostChange::Edit(p)) => self.plan_post(network, p, true).await?,
            ActivityChange::Comment(CommentChange::Create(c)) => self.plan_comment(network, c).await?,
            ActivityChange::Comment(CommentChange::Edit(c)) => self.plan_comment_edit(network, c).await?,
            ActivityChange::Comment(CommentChange::Delete(c)) => self.plan_comment_delete(network, c).await?,
            ActivityChange::Reply(ReplyChange::Create(r)) => self.plan_reply(network, r, false).await?,
            ActivityChange::Reply(ReplyChange::Edit(r)) => self.plan_reply(network, r, true).await?,
            ActivityChange::Reply(ReplyChange::Delete(r)) => self.plan_reply_delete(network, r).await?,
        };

        let max = self.batch_limit();
        if batch.len() > max {
            return Err(DispatchError::BatchTooLarge { len: batch.len(), max });
        }
        Ok(batch)
    }

    /// Dispatch one branch
    ///
    /// Never returns an error: failures are logged and carried in the
    /// outcome's status.
    pub async fn dispatch(&self, request: &ActivityRequest) -> BranchOutcome {
        let branch = request.branch();
        let action = request.action();

        let status = match self.apply(request).await {
            Ok(status) => status,
            Err(e @ DispatchError::InvalidParams(_)) => {
                tracing::warn!("Rejected {} {} on {}: {}", action, branch, request.network, e);
                BranchStatus::Failed(e)
            }
            Err(e) => {
                tracing::error!("Failed {} {} on {}: {}", action, branch, request.network, e);
                BranchStatus::Failed(e)
            }
        };

        BranchOutcome { branch, action, status }
    }

    /// Dispatch independent branches concurrently
    pub async fn dispatch_all(&self, requests: &[ActivityRequest]) -> DispatchReport {
        join_all(requests.iter().map(|request| self.dispatch(request)))
            .await
            .into_iter()
            .collect()
    }

    /// Dispatch on the runtime without waiting
    ///
    /// Failures are logged whether or not the handle is awaited.
    pub fn spawn(self: &Arc<Self>, requests: Vec<ActivityRequest>) -> JoinHandle<DispatchReport> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            let report = dispatcher.dispatch_all(&requests).await;
            if !report.is_success() {
                tracing::error!("Background dispatch finished with failures: {}", report);
            }
            report
        })
    }

    /// Select branches from flat route arguments and dispatch them
    ///
    /// Arguments that select no branch produce an empty report.
    ///
    /// # Errors
    /// Returns [`DispatchError::InvalidParams`] if the network is blank
    pub async fn record(&self, args: ActivityArgs) -> Result<DispatchReport, DispatchError> {
        let action = args.action;
        let requests = match args.into_requests() {
            Ok(requests) => requests,
            Err(e) => {
                tracing::warn!("Rejected {} activity: {}", action, e);
                return Err(e);
            }
        };

        if requests.is_empty() {
            tracing::debug!("No branch selected for {} activity", action);
        }
        Ok(self.dispatch_all(&requests).await)
    }

    async fn apply(&self, request: &ActivityRequest) -> Result<BranchStatus, DispatchError> {
        let batch = self.plan(request).await?;
        if batch.is_empty() {
            tracing::debug!("Nothing to apply for {} {}", request.action(), request.branch());
            return Ok(BranchStatus::NoOp);
        }

        let receipt = self.store.commit(batch).await?;
        tracing::info!(
            "Committed {} {} on {}: {} written, {} deleted",
            request.action(),
            request.branch(),
            request.network,
            receipt.written,
            receipt.deleted
        );
        Ok(receipt.into())
    }

    // Queries

    fn activities(&self, network: &Network, kind: ActivityKind) -> Query {
        Query::collection(self.config.activities_collection.as_str())
            .where_eq(fields::NETWORK, network)
            .where_eq(fields::TYPE, kind.as_str())
    }

    fn push(&self, batch: &mut WriteBatch, record: &ActivityRecord) -> Result<(), DispatchError> {
        batch.set(
            self.config.activities_collection.as_str(),
            self.store.generate_id(),
            record.to_document()?,
        );
        Ok(())
    }

    fn remove(&self, batch: &mut WriteBatch, stale: &[StoredDocument]) {
        batch.delete_all(&self.config.activities_collection, stale);
    }

    // Reaction

    fn plan_reaction(&self, network: &Network, r: &ReactionActivity) -> Result<WriteBatch, DispatchError> {
        let mut record = ActivityRecord::new(ActivityKind::Reacted, network.clone(), &r.post)
            .by(r.actor)
            .with_reaction(r.reaction_id.as_str(), r.reaction_author_id);

        match (&r.comment, &r.reply) {
            (Some(comment), Some(reply)) => record = record.with_comment(comment).with_reply(reply),
            (Some(comment), None) => record = record.with_comment(comment),
            (None, Some(reply)) => {
                tracing::debug!(
                    "Dropping reply {} context from reaction {}: no comment context",
                    reply.reply_id,
                    r.reaction_id
                );
            }
            (None, None) => {}
        }

        let mut batch = WriteBatch::new();
        self.push(&mut batch, &record)?;
        Ok(batch)
    }

    async fn plan_reaction_delete(&self, network: &Network, r: &ReactionRef) -> Result<WriteBatch, DispatchError> {
        let query = self
            .activities(network, ActivityKind::Reacted)
            .where_eq(fields::BY, r.actor)
            .where_eq(fields::REACTION_ID, r.reaction_id.as_str())
            .where_eq(fields::REACTION_AUTHOR_ID, r.reaction_author_id);

        let stale = self.store.query(&query).await?;
        let mut batch = WriteBatch::new();
        self.remove(&mut batch, &stale);
        Ok(batch)
    }

    // Post

    /// On edit, every prior post-level MENTIONED record for the post is replaced,
    /// whoever wrote it; comment and reply mentions are kept.
    async fn plan_post(&self, network: &Network, p: &PostContent, replace: bool) -> Result<WriteBatch, DispatchError> {
        let mut batch = WriteBatch::new();

        if replace {
            // Post-level mentions only: comment and reply mentions carry comment_id
            let query = self
                .activities(network, ActivityKind::Mentioned)
                .where_eq(fields::POST_ID, &p.post.post_id)
                .where_eq(fields::POST_AUTHOR_ID, p.post.post_author_id)
                .where_missing(fields::COMMENT_ID);
            let stale = self.store.query(&query).await?;
            self.remove(&mut batch, &stale);
        }

        let mentions = self.mentions.resolve(&p.content).await?;
        if !mentions.is_empty() {
            let record = ActivityRecord::new(ActivityKind::Mentioned, network.clone(), &p.post)
                .by(p.actor)
                .with_mentions(mentions);
            self.push(&mut batch, &record)?;
        }
        Ok(batch)
    }

    // Comment

    async fn plan_comment(&self, network: &Network, c: &CommentContent) -> Result<WriteBatch, DispatchError> {
        let mentions = self.mentions.resolve(&c.content).await?;
        let mut batch = WriteBatch::new();

        let own = CommentTarget::new(c.comment.comment_id.as_str(), c.actor);
        let commented = ActivityRecord::new(ActivityKind::Commented, network.clone(), &c.post)
            .by(c.actor)
            .with_comment(&own);
        self.push(&mut batch, &commented)?;

        if !mentions.is_empty() {
            let mentioned = ActivityRecord::new(ActivityKind::Mentioned, network.clone(), &c.post)
                .by(c.actor)
                .with_comment(&c.comment)
                .with_mentions(mentions);
            self.push(&mut batch, &mentioned)?;
        }
        Ok(batch)
    }

    async fn plan_comment_edit(&self, network: &Network, c: &CommentContent) -> Result<WriteBatch, DispatchError> {
        let query = self
            .activities(network, ActivityKind::Mentioned)
            .where_eq(fields::BY, c.actor)
            .where_eq(fields::COMMENT_ID, c.comment.comment_id.as_str())
            .where_eq(fields::COMMENT_AUTHOR_ID, c.actor)
            .where_missing(fields::REPLY_ID);

        let (stale, mentions) = futures::try_join!(
            async { self.store.query(&query).await.map_err(DispatchError::from) },
            async { self.mentions.resolve(&c.content).await.map_err(DispatchError::from) },
        )?;

        let mut batch = WriteBatch::new();
        self.remove(&mut batch, &stale);
        if !mentions.is_empty() {
            let record = ActivityRecord::new(ActivityKind::Mentioned, network.clone(), &c.post)
                .by(c.actor)
                .with_comment(&c.comment)
                .with_mentions(mentions);
            self.push(&mut batch, &record)?;
        }
        Ok(batch)
    }

    async fn plan_comment_delete(&self, network: &Network, c: &CommentRef) -> Result<WriteBatch, DispatchError> {
        let own = self
            .activities(network, ActivityKind::Commented)
            .where_eq(fields::BY, c.actor)
            .where_eq(fields::COMMENT_ID, c.comment_id.as_str());
        let mentioned = self
            .activities(network, ActivityKind::Mentioned)
            .where_eq(fields::COMMENT_ID, c.comment_id.as_str())
            .where_eq(fields::COMMENT_AUTHOR_ID, c.actor);
        let reacted = self
            .activities(network, ActivityKind::Reacted)
            .where_eq(fields::COMMENT_ID, c.comment_id.as_str())
            .where_eq(fields::COMMENT_AUTHOR_ID, c.actor);

        self.plan_scoped_delete(&own, &mentioned, &reacted).await
    }

    // Reply

    async fn plan_reply(&self, network: &Network, r: &ReplyContent, replace: bool) -> Result<WriteBatch, DispatchError> {
        let mut batch = WriteBatch::new();

        if replace {
            let query = self
                .activities(network, ActivityKind::Mentioned)
                .where_eq(fields::REPLY_ID, r.reply.reply_id.as_str())
                .where_eq(fields::REPLY_AUTHOR_ID, r.actor)
                .where_eq(fields::BY, r.actor);
            let stale = self.store.query(&query).await?;
            self.remove(&mut batch, &stale);
        } else {
            let replied = ActivityRecord::new(ActivityKind::Replied, network.clone(), &r.post)
                .by(r.actor)
                .with_comment(&r.comment)
                .with_reply(&r.reply);
            self.push(&mut batch, &replied)?;
        }

        let mentions = self.mentions.resolve(&r.content).await?;
        if !mentions.is_empty() {
            let mentioned = ActivityRecord::new(ActivityKind::Mentioned, network.clone(), &r.post)
                .by(r.actor)
                .with_comment(&r.comment)
                .with_reply(&r.reply)
                .with_mentions(mentions);
            self.push(&mut batch, &mentioned)?;
        }
        Ok(batch)
    }

    async fn plan_reply_delete(&self, network: &Network, r: &ReplyRef) -> Result<WriteBatch, DispatchError> {
        let own = self
            .activities(network, ActivityKind::Replied)
            .where_eq(fields::BY, r.actor)
            .where_eq(fields::REPLY_ID, r.reply_id.as_str());
        let mentioned = self
            .activities(network, ActivityKind::Mentioned)
            .where_eq(fields::REPLY_ID, r.reply_id.as_str())
            .where_eq(fields::REPLY_AUTHOR_ID, r.actor);
        let reacted = self
            .activities(network, ActivityKind::Reacted)
            .where_eq(fields::REPLY_ID, r.reply_id.as_str())
            .where_eq(fields::REPLY_AUTHOR_ID, r.actor);

        self.plan_scoped_delete(&own, &mentioned, &reacted).await
    }

    async fn plan_scoped_delete(&self, own: &Query, mentioned: &Query, reacted: &Query) -> Result<WriteBatch, DispatchError> {
        let (own, mentioned, reacted) = futures::try_join!(
            self.store.query(own),
            self.store.query(mentioned),
            self.store.query(reacted),
        )?;

        let mut batch = WriteBatch::new();
        self.remove(&mut batch, &own);
        self.remove(&mut batch, &mentioned);
        self.remove(&mut batch, &reacted);
        Ok(batch)
    }
}

impl fmt::Debug for ActivityDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityDispatcher")
            .field("store", &self.store)
            .field("mentions", &self.mentions)
            .field("config", &self.config)
            .finish()
    }
}
