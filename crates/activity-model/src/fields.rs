//! Stored field names
//!
//! Activity and user documents share these names with the pages that read
//! them, so they are fixed strings rather than derived from Rust field names.

pub const BY: &str = "by";
pub const NETWORK: &str = "network";
pub const TYPE: &str = "type";
pub const POST_ID: &str = "post_id";
pub const POST_AUTHOR_ID: &str = "post_author_id";
pub const POST_TYPE: &str = "post_type";
pub const COMMENT_ID: &str = "comment_id";
pub const COMMENT_AUTHOR_ID: &str = "comment_author_id";
pub const REPLY_ID: &str = "reply_id";
pub const REPLY_AUTHOR_ID: &str = "reply_author_id";
pub const REACTION_ID: &str = "reaction_id";
pub const REACTION_AUTHOR_ID: &str = "reaction_author_id";
pub const MENTIONS: &str = "mentions";

/// User document fields
pub const USER_ID: &str = "id";
pub const USERNAME: &str = "username";
