//! Activity Store
//!
//! The seam between the activity pipeline and the managed document database.
//!
//! # Core Concepts
//!
//! - [`DocumentStore`]: Async trait for equality queries and atomic batch commits
//! - [`Query`] / [`Filter`]: AND-combined equality (and absence) filters on one collection
//! - [`WriteBatch`]: Ordered set/delete operations applied all-or-nothing
//! - [`InMemoryStore`]: Fake store with fault injection, used by tests and the CLI
//!
//! # Example
//!
//! ```rust,ignore
//! use activity_store::{DocumentStore, InMemoryStore, Query, WriteBatch};
//!
//! let store = InMemoryStore::new();
//! let stale = store
//!     .query(&Query::collection("user_activities").where_eq("type", "MENTIONED"))
//!     .await?;
//!
//! let mut batch = WriteBatch::new();
//! batch.delete_all("user_activities", &stale);
//! store.commit(batch).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod batch;
mod error;
mod memory;
mod query;
mod store;

pub use batch::{CommitReceipt, WriteBatch, WriteOp};
pub use error::StoreError;
pub use memory::{InMemoryStore, StoreStats};
pub use query::{Filter, FilterOp, Query};
pub use store::{DocumentStore, StoredDocument, DEFAULT_MAX_BATCH_OPS};

/// Default activity collection name
pub const ACTIVITIES_COLLECTION: &str = "user_activities";

/// Default user collection name
pub const USERS_COLLECTION: &str = "users";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
