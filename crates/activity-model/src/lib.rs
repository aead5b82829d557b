//! Activity Model
//!
//! Typed activity records and the identifiers they reference.
//!
//! # Core Concepts
//!
//! - [`ActivityRecord`]: One user-facing event (reaction, comment, reply, mention)
//! - [`ActivityKind`]: `REACTED`, `COMMENTED`, `REPLIED`, `MENTIONED`
//! - [`UserId`], [`PostId`], [`Network`], [`DocumentId`]: Identifiers
//! - [`PostTarget`], [`CommentTarget`], [`ReplyTarget`]: What an activity points at
//! - [`Document`]: The field map a record is stored as
//!
//! # Example
//!
//! ```rust,ignore
//! use activity_model::{ActivityKind, ActivityRecord, Network, PostTarget, PostType, UserId};
//!
//! let network = Network::new("polkadot")?;
//! let post = PostTarget::new(12u64, PostType::ReferendumsV2, UserId(7));
//! let record = ActivityRecord::new(ActivityKind::Commented, network, &post)
//!     .by(UserId(9))
//!     .with_comment(&comment);
//!
//! let doc = record.to_document()?;
//! assert_eq!(doc["type"], "COMMENTED");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod ids;
mod record;
mod user;

pub mod fields;

pub use error::ModelError;
pub use ids::{DocumentId, Network, PostId, PostType, UserId};
pub use record::{ActivityKind, ActivityRecord, CommentTarget, Document, PostTarget, ReplyTarget};
pub use user::User;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
