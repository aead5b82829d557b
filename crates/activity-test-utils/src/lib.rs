//! Testing utilities for the activity workspace
//!
//! Shared fixtures: a seeded users table, post/comment/reply targets and a
//! dispatcher wired to an in-memory store.

#![allow(missing_docs)]

use activity_dispatch::{ActivityChange, ActivityDispatcher, ActivityRequest, DispatcherConfig};
use activity_model::{
    ActivityKind, ActivityRecord, CommentTarget, Network, PostTarget, PostType, ReplyTarget, User, UserId,
};
use activity_store::{InMemoryStore, ACTIVITIES_COLLECTION};
use std::sync::Arc;

pub const ALICE: UserId = UserId(1);
pub const BOB: UserId = UserId(2);
pub const CAROL: UserId = UserId(3);
pub const DAVE: UserId = UserId(4);

/// Users present in every seeded store
pub fn users() -> Vec<User> {
    vec![
        User::new(ALICE, "alice"),
        User::new(BOB, "bob"),
        User::new(CAROL, "carol-w"),
        User::new(DAVE, "dave_99"),
    ]
}

pub fn network() -> Network {
    Network::new("polkadot").unwrap()
}

pub fn other_network() -> Network {
    Network::new("kusama").unwrap()
}

/// Referendum 42 authored by alice
pub fn post() -> PostTarget {
    PostTarget::new(42u64, PostType::ReferendumsV2, ALICE)
}

pub fn post_by(author: UserId) -> PostTarget {
    PostTarget::new(7u64, PostType::Discussions, author)
}

pub fn comment(id: &str, author: UserId) -> CommentTarget {
    CommentTarget::new(id, author)
}

pub fn reply(id: &str, author: UserId) -> ReplyTarget {
    ReplyTarget::new(id, author)
}

pub fn request(change: impl Into<ActivityChange>) -> ActivityRequest {
    ActivityRequest::new(network(), change)
}

/// Dispatcher over a seeded in-memory store
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub dispatcher: Arc<ActivityDispatcher>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        store.seed_users_into(&config.users_collection, &users());
        let dispatcher = ActivityDispatcher::from_config(store.clone(), config).unwrap();
        Self {
            store,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Every stored activity record
    pub fn records(&self) -> Vec<ActivityRecord> {
        self.store
            .records(&self.dispatcher.config().activities_collection)
            .unwrap()
    }

    /// Stored activity records of one kind
    pub fn records_of(&self, kind: ActivityKind) -> Vec<ActivityRecord> {
        self.records().into_iter().filter(|r| r.kind == kind).collect()
    }

    /// Insert a record directly, bypassing the dispatcher
    pub fn seed_record(&self, record: &ActivityRecord) {
        self.store
            .insert_record(&self.dispatcher.config().activities_collection, record)
            .unwrap();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// MENTIONED record on the fixture post
pub fn post_mention(by: UserId, mentions: Vec<UserId>) -> ActivityRecord {
    ActivityRecord::new(ActivityKind::Mentioned, network(), &post())
        .by(by)
        .with_mentions(mentions)
}

/// REACTED record on a comment of the fixture post
pub fn comment_reaction(by: UserId, reaction_id: &str, target: &CommentTarget) -> ActivityRecord {
    ActivityRecord::new(ActivityKind::Reacted, network(), &post())
        .by(by)
        .with_reaction(reaction_id, by)
        .with_comment(target)
}

/// Default activity collection name
pub fn activities() -> &'static str {
    ACTIVITIES_COLLECTION
}
