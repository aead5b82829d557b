//! Activity Mentions
//!
//! Turns free-text content into the set of users it mentions.
//!
//! # Pipeline
//!
//! ```text
//! content → MentionExtractor → usernames → UserDirectory → UserIds
//!                                              ↑
//!                                 CachedUserDirectory (moka)
//! ```
//!
//! - [`MentionExtractor`]: Finds `user/<name>` references in HTML or plain text
//! - [`UserDirectory`]: Resolves usernames with point lookups
//! - [`StoreUserDirectory`]: Directory backed by the `users` collection
//! - [`CachedUserDirectory`]: Caches resolved usernames in front of another directory
//! - [`MentionResolver`]: Extractor + directory
//!
//! # Example
//!
//! ```rust,ignore
//! use activity_mentions::{MentionResolver, StoreUserDirectory};
//!
//! let directory = StoreUserDirectory::new(store.clone(), "users");
//! let resolver = MentionResolver::new(Arc::new(directory));
//!
//! let ids = resolver.resolve("thanks user/alice and user/bob").await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cache;
mod directory;
mod error;
mod extract;
mod resolver;

pub use cache::{CachedUserDirectory, DirectoryCacheStats};
pub use directory::{StoreUserDirectory, UserDirectory};
pub use error::MentionError;
pub use extract::{ContentFormat, Extraction, MentionExtractor, DEFAULT_SCAN_LIMIT, MENTION_PREFIX};
pub use resolver::MentionResolver;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
