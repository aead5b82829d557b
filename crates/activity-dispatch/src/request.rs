//! Typed activity requests
//!
//! One [`ActivityRequest`] describes one branch of work: a target kind
//! (reaction, post, comment, reply) paired with the action taken on it.
//! Each variant carries exactly the identifiers its branch needs, so a
//! request that type-checks only fails validation on blank identifiers.

use crate::error::DispatchError;
use activity_model::{CommentTarget, Network, PostId, PostTarget, ReplyTarget, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action a user took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Create,
    Edit,
    Delete,
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "CREATE",
            Self::Edit => "EDIT",
            Self::Delete => "DELETE",
        })
    }
}

/// Target kind a branch operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    Reaction,
    Post,
    Comment,
    Reply,
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reaction => "reaction",
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Reply => "reply",
        })
    }
}

/// One branch of dispatch work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRequest {
    pub network: Network,
    pub change: ActivityChange,
}

impl ActivityRequest {
    #[inline]
    #[must_use]
    pub fn new(network: Network, change: impl Into<ActivityChange>) -> Self {
        Self {
            network,
            change: change.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn branch(&self) -> BranchKind {
        self.change.branch()
    }

    #[inline]
    #[must_use]
    pub fn action(&self) -> ActivityAction {
        self.change.action()
    }

    /// Reject blank identifiers
    ///
    /// # Errors
    /// Returns [`DispatchError::InvalidParams`] naming the blank field
    pub fn validate(&self) -> Result<(), DispatchError> {
        self.change.validate()
    }
}

/// What changed, by target kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ActivityChange {
    Reaction(ReactionChange),
    Post(PostChange),
    Comment(CommentChange),
    Reply(ReplyChange),
}

impl ActivityChange {
    #[must_use]
    pub fn branch(&self) -> BranchKind {
        match self {
            Self::Reaction(_) => BranchKind::Reaction,
            Self::Post(_) => BranchKind::Post,
            Self::Comment(_) => BranchKind::Comment,
            Self::Reply(_) => BranchKind::Reply,
        }
    }

    #[must_use]
    pub fn action(&self) -> ActivityAction {
        match self {
            Self::Reaction(ReactionChange::Create(_))
            | Self::Post(PostChange::Create(_))
            | Self::Comment(CommentChange::Create(_))
            | Self::Reply(ReplyChange::Create(_)) => ActivityAction::Create,
            Self::Post(PostChange::Edit(_))
            | Self::Comment(CommentChange::Edit(_))
            | Self::Reply(ReplyChange::Edit(_)) => ActivityAction::Edit,
            Self::Reaction(ReactionChange::Delete(_))
            | Self::Comment(CommentChange::Delete(_))
            | Self::Reply(ReplyChange::Delete(_)) => ActivityAction::Delete,
        }
    }

    fn validate(&self) -> Result<(), DispatchError> {
        match self {
            Self::Reaction(ReactionChange::Create(r)) => {
                require("reaction_id", &r.reaction_id)?;
                check_post(&r.post)?;
                if let Some(comment) = &r.comment {
                    require("comment_id", &comment.comment_id)?;
                }
                if let Some(reply) = &r.reply {
                    require("reply_id", &reply.reply_id)?;
                }
                Ok(())
            }
            Self::Reaction(ReactionChange::Delete(r)) => require("reaction_id", &r.reaction_id),
            Self::Post(PostChange::Create(p) | PostChange::Edit(p)) => check_post(&p.post),
            Self::Comment(CommentChange::Create(c) | CommentChange::Edit(c)) => {
                check_post(&c.post)?;
                require("comment_id", &c.comment.comment_id)?;
                own_author("comment_author_id", c.comment.comment_author_id, c.actor)
            }
            Self::Comment(CommentChange::Delete(c)) => require("comment_id", &c.comment_id),
            Self::Reply(ReplyChange::Create(r) | ReplyChange::Edit(r)) => {
                check_post(&r.post)?;
                require("comment_id", &r.comment.comment_id)?;
                require("reply_id", &r.reply.reply_id)?;
                own_author("reply_author_id", r.reply.reply_author_id, r.actor)
            }
            Self::Reply(ReplyChange::Delete(r)) => require("reply_id", &r.reply_id),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), DispatchError> {
    if value.trim().is_empty() {
        return Err(DispatchError::invalid(format!("{field} is empty")));
    }
    Ok(())
}

/// Edits and deletes find records by the actor, so the written author must be the actor
fn own_author(field: &str, author: UserId, actor: UserId) -> Result<(), DispatchError> {
    if author != actor {
        return Err(DispatchError::invalid(format!("{field} {author} does not match actor {actor}")));
    }
    Ok(())
}

fn check_post(post: &PostTarget) -> Result<(), DispatchError> {
    match &post.post_id {
        PostId::Hash(hash) => require("post_id", hash),
        PostId::Index(_) => Ok(()),
    }
}

// Reaction

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionChange {
    Create(ReactionActivity),
    Delete(ReactionRef),
}

/// A new reaction on a post, comment or reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionActivity {
    pub actor: UserId,
    pub reaction_id: String,
    pub reaction_author_id: UserId,
    pub post: PostTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentTarget>,
    /// Only recorded when `comment` is also present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyTarget>,
}

impl ReactionActivity {
    #[must_use]
    pub fn new(actor: UserId, reaction_id: impl Into<String>, post: PostTarget) -> Self {
        Self {
            actor,
            reaction_id: reaction_id.into(),
            reaction_author_id: actor,
            post,
            comment: None,
            reply: None,
        }
    }

    #[must_use]
    pub fn authored_by(mut self, reaction_author_id: UserId) -> Self {
        self.reaction_author_id = reaction_author_id;
        self
    }

    #[must_use]
    pub fn on_comment(mut self, comment: CommentTarget) -> Self {
        self.comment = Some(comment);
        self
    }

    #[must_use]
    pub fn on_reply(mut self, comment: CommentTarget, reply: ReplyTarget) -> Self {
        self.comment = Some(comment);
        self.reply = Some(reply);
        self
    }
}

/// Identifies the reaction records to remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRef {
    pub actor: UserId,
    pub reaction_id: String,
    pub reaction_author_id: UserId,
}

impl ReactionRef {
    #[must_use]
    pub fn new(actor: UserId, reaction_id: impl Into<String>) -> Self {
        Self {
            actor,
            reaction_id: reaction_id.into(),
            reaction_author_id: actor,
        }
    }
}

// Post

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostChange {
    Create(PostContent),
    Edit(PostContent),
}

/// Post body whose mentions are recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<UserId>,
    pub post: PostTarget,
    pub content: String,
}

impl PostContent {
    #[must_use]
    pub fn new(actor: impl Into<Option<UserId>>, post: PostTarget, content: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            post,
            content: content.into(),
        }
    }
}

// Comment

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentChange {
    Create(CommentContent),
    Edit(CommentContent),
    Delete(CommentRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentContent {
    pub actor: UserId,
    pub post: PostTarget,
    pub comment: CommentTarget,
    pub content: String,
}

impl CommentContent {
    #[must_use]
    pub fn new(actor: UserId, post: PostTarget, comment: CommentTarget, content: impl Into<String>) -> Self {
        Self {
            actor,
            post,
            comment,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRef {
    pub actor: UserId,
    pub comment_id: String,
}

impl CommentRef {
    #[must_use]
    pub fn new(actor: UserId, comment_id: impl Into<String>) -> Self {
        Self {
            actor,
            comment_id: comment_id.into(),
        }
    }
}

// Reply

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyChange {
    Create(ReplyContent),
    Edit(ReplyContent),
    Delete(ReplyRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyContent {
    pub actor: UserId,
    pub post: PostTarget,
    pub comment: CommentTarget,
    pub reply: ReplyTarget,
    pub content: String,
}

impl ReplyContent {
    #[must_use]
    pub fn new(
        actor: UserId,
        post: PostTarget,
        comment: CommentTarget,
        reply: ReplyTarget,
        content: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            post,
            comment,
            reply,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub actor: UserId,
    pub reply_id: String,
}

impl ReplyRef {
    #[must_use]
    pub fn new(actor: UserId, reply_id: impl Into<String>) -> Self {
        Self {
            actor,
            reply_id: reply_id.into(),
        }
    }
}

macro_rules! into_change {
    ($($inner:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$inner> for ActivityChange {
                fn from(change: $inner) -> Self {
                    Self::$variant(change)
                }
            }
        )*
    };
}

into_change! {
    ReactionChange => Reaction,
    PostChange => Post,
    CommentChange => Comment,
    ReplyChange => Reply,
}
