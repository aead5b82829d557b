//! Activity Dispatch
//!
//! Fans user actions on governance posts out into `user_activities` records.
//!
//! # Flow
//!
//! ```text
//! ActivityArgs ──into_requests──► [ActivityRequest; 0..=4]
//!                                        │
//!                          ActivityDispatcher::dispatch_all
//!                                        │  (branches run concurrently)
//!                    ┌──────────┬────────┴──┬───────────┐
//!                 reaction     post      comment      reply
//!                    │          │           │           │
//!               reads, then one atomic WriteBatch per branch
//!                                        │
//!                                 DispatchReport
//! ```
//!
//! - [`ActivityRequest`]: One target kind plus the action taken on it
//! - [`ActivityDispatcher`]: Plans and commits each branch
//! - [`DispatchReport`]: Per-branch outcomes, including partial application
//! - [`ActivityArgs`]: Flat route arguments and the rules that select branches
//! - [`DispatcherConfig`]: Collection names, limits and username cache settings
//!
//! # Example
//!
//! ```rust,ignore
//! use activity_dispatch::{ActivityDispatcher, ActivityRequest, CommentChange, CommentRef, DispatcherConfig};
//!
//! let dispatcher = ActivityDispatcher::from_config(store, DispatcherConfig::default())?;
//! let request = ActivityRequest::new(network, CommentChange::Delete(CommentRef::new(actor, "c1")));
//!
//! let outcome = dispatcher.dispatch(&request).await;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod dispatcher;
mod error;
mod legacy;
mod outcome;
mod request;

pub use config::{DispatcherConfig, UserCacheConfig};
pub use dispatcher::ActivityDispatcher;
pub use error::{ConfigError, DispatchError};
pub use legacy::ActivityArgs;
pub use outcome::{BranchOutcome, BranchStatus, DispatchReport};
pub use request::{
    ActivityAction, ActivityChange, ActivityRequest, BranchKind, CommentChange, CommentContent, CommentRef,
    PostChange, PostContent, ReactionActivity, ReactionChange, ReactionRef, ReplyChange, ReplyContent, ReplyRef,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
