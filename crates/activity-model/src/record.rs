//! Activity records
//!
//! An [`ActivityRecord`] is what ends up in the `user_activities` collection.
//! Optional context is omitted from the stored document rather than written
//! as null, so equality filters on absent fields never match.

use crate::error::ModelError;
use crate::ids::{Network, PostId, PostType, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored document: field name to JSON value
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Kind of user-facing event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Reacted,
    Commented,
    Replied,
    Mentioned,
}

impl ActivityKind {
    /// Stored text form
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reacted => "REACTED",
            Self::Commented => "COMMENTED",
            Self::Replied => "REPLIED",
            Self::Mentioned => "MENTIONED",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post an activity points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTarget {
    pub post_id: PostId,
    pub post_type: PostType,
    pub post_author_id: UserId,
}

impl PostTarget {
    #[inline]
    #[must_use]
    pub fn new(post_id: impl Into<PostId>, post_type: PostType, post_author_id: UserId) -> Self {
        Self {
            post_id: post_id.into(),
            post_type,
            post_author_id,
        }
    }
}

/// Comment an activity points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentTarget {
    pub comment_id: String,
    pub comment_author_id: UserId,
}

impl CommentTarget {
    #[inline]
    #[must_use]
    pub fn new(comment_id: impl Into<String>, comment_author_id: UserId) -> Self {
        Self {
            comment_id: comment_id.into(),
            comment_author_id,
        }
    }
}

/// Reply an activity points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub reply_id: String,
    pub reply_author_id: UserId,
}

impl ReplyTarget {
    #[inline]
    #[must_use]
    pub fn new(reply_id: impl Into<String>, reply_author_id: UserId) -> Self {
        Self {
            reply_id: reply_id.into(),
            reply_author_id,
        }
    }
}

/// One stored user activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// User who performed the action
    #[serde(rename = "by", default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<UserId>,
    pub network: Network,
    pub post_author_id: UserId,
    pub post_id: PostId,
    pub post_type: PostType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_author_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_author_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_author_id: Option<UserId>,
    /// Users referenced by `user/<name>` in the content
    #[serde(rename = "mentions", default, skip_serializing_if = "Option::is_none")]
    pub mentioned_user_ids: Option<Vec<UserId>>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

impl ActivityRecord {
    /// Create a record for a post with no actor or optional context
    #[must_use]
    pub fn new(kind: ActivityKind, network: Network, post: &PostTarget) -> Self {
        Self {
            actor: None,
            network,
            post_author_id: post.post_author_id,
            post_id: post.post_id.clone(),
            post_type: post.post_type.clone(),
            comment_author_id: None,
            comment_id: None,
            reply_author_id: None,
            reply_id: None,
            reaction_id: None,
            reaction_author_id: None,
            mentioned_user_ids: None,
            kind,
        }
    }

    /// Set the acting user
    #[inline]
    #[must_use]
    pub fn by(mut self, actor: impl Into<Option<UserId>>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Attach comment context
    #[inline]
    #[must_use]
    pub fn with_comment(mut self, comment: &CommentTarget) -> Self {
        self.comment_id = Some(comment.comment_id.clone());
        self.comment_author_id = Some(comment.comment_author_id);
        self
    }

    /// Attach reply context
    #[inline]
    #[must_use]
    pub fn with_reply(mut self, reply: &ReplyTarget) -> Self {
        self.reply_id = Some(reply.reply_id.clone());
        self.reply_author_id = Some(reply.reply_author_id);
        self
    }

    /// Attach reaction context
    #[inline]
    #[must_use]
    pub fn with_reaction(mut self, reaction_id: impl Into<String>, reaction_author_id: UserId) -> Self {
        self.reaction_id = Some(reaction_id.into());
        self.reaction_author_id = Some(reaction_author_id);
        self
    }

    /// Attach mentioned users
    #[inline]
    #[must_use]
    pub fn with_mentions(mut self, mentions: Vec<UserId>) -> Self {
        self.mentioned_user_ids = Some(mentions);
        self
    }

    /// Encode as a stored document
    ///
    /// # Errors
    /// Returns error if the record does not encode to a field map
    pub fn to_document(&self) -> Result<Document, ModelError> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(ModelError::NotAnObject),
        }
    }

    /// Decode a stored document
    ///
    /// # Errors
    /// Returns [`ModelError::MalformedDocument`] when required fields are missing
    pub fn from_document(document: &Document) -> Result<Self, ModelError> {
        let value = serde_json::Value::Object(document.clone());
        Ok(serde_json::from_value(value)?)
    }
}
