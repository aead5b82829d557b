//! Flat activity arguments sent by API routes
//!
//! Routes send one loosely typed object whose populated fields decide which
//! branches fire. [`ActivityArgs::into_requests`] applies those field-presence
//! rules and produces typed requests. Several branches can fire from one
//! object, for example a reaction that also carries comment context.
//!
//! Identifier checks follow the two forms routes rely on:
//! - *present*: set, non-empty, non-zero, and numeric (numeric strings count)
//! - *a number*: a JSON number, zero included

use crate::error::DispatchError;
use crate::request::{
    ActivityAction, ActivityChange, ActivityRequest, CommentChange, CommentContent, CommentRef, PostChange, PostContent,
    ReactionActivity, ReactionChange, ReactionRef, ReplyChange, ReplyContent, ReplyRef,
};
use activity_model::{CommentTarget, Network, PostId, PostTarget, PostType, ReplyTarget, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat activity arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_author_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_author_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_author_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_author_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub action: ActivityAction,
}

impl ActivityArgs {
    /// Arguments with only a network and action set
    #[must_use]
    pub fn new(network: impl Into<String>, action: ActivityAction) -> Self {
        Self {
            user_id: None,
            network: network.into(),
            post_author_id: None,
            post_id: None,
            post_type: None,
            comment_author_id: None,
            comment_id: None,
            reply_id: None,
            reply_author_id: None,
            reaction_id: None,
            reaction_author_id: None,
            content: None,
            action,
        }
    }

    /// Build the typed requests these arguments select
    ///
    /// Returns zero to four requests, in reaction, post, comment, reply order.
    ///
    /// # Errors
    /// Returns [`DispatchError::InvalidParams`] if the network is blank
    pub fn into_requests(self) -> Result<Vec<ActivityRequest>, DispatchError> {
        let network = Network::new(self.network.as_str())
            .map_err(|_| DispatchError::invalid("network is empty"))?;

        let changes = [
            self.reaction_change().map(ActivityChange::from),
            self.post_change().map(ActivityChange::from),
            self.comment_change().map(ActivityChange::from),
            self.reply_change().map(ActivityChange::from),
            self.reply_delete_change().map(ActivityChange::from),
        ];

        Ok(changes
            .into_iter()
            .flatten()
            .map(|change| ActivityRequest::new(network.clone(), change))
            .collect())
    }

    fn reaction_change(&self) -> Option<ReactionChange> {
        let reaction_id = non_empty(self.reaction_id.as_deref())?;
        let reaction_author_id = present_id(self.reaction_author_id.as_ref())?;
        let actor = present_id(self.user_id.as_ref())?;

        match self.action {
            ActivityAction::Create => {
                let Some(post) = self.post_target() else {
                    tracing::debug!("Reaction {} has no post context", reaction_id);
                    return None;
                };
                let mut activity = ReactionActivity::new(actor, reaction_id, post).authored_by(reaction_author_id);
                if let Some(comment) = self.comment_target(present_id) {
                    activity = match self.reply_target(present_id) {
                        Some(reply) => activity.on_reply(comment, reply),
                        None => activity.on_comment(comment),
                    };
                }
                Some(ReactionChange::Create(activity))
            }
            ActivityAction::Delete => Some(ReactionChange::Delete(ReactionRef {
                actor,
                reaction_id: reaction_id.to_string(),
                reaction_author_id,
            })),
            ActivityAction::Edit => None,
        }
    }

    fn post_change(&self) -> Option<PostChange> {
        if self.has_comment_id() || self.has_reply_id() || self.has_reaction_id() {
            return None;
        }
        let content = non_empty(self.content.as_deref())?;
        let post = self.post_target()?;
        let body = PostContent::new(present_id(self.user_id.as_ref()), post, content);

        match self.action {
            ActivityAction::Create => Some(PostChange::Create(body)),
            ActivityAction::Edit => Some(PostChange::Edit(body)),
            ActivityAction::Delete => None,
        }
    }

    fn comment_change(&self) -> Option<CommentChange> {
        if self.has_reply_id() || self.has_reaction_id() {
            return None;
        }
        let content = non_empty(self.content.as_deref())?;
        let actor = present_id(self.user_id.as_ref())?;
        parse_post_id(self.post_id.as_ref())?;
        number_id(self.post_author_id.as_ref())?;
        let comment = self.comment_target(number_id)?;

        match self.action {
            ActivityAction::Create | ActivityAction::Edit => {
                let post = self.post_target_with(number_id)?;
                let body = CommentContent::new(actor, post, comment, content);
                Some(if self.action == ActivityAction::Create {
                    CommentChange::Create(body)
                } else {
                    CommentChange::Edit(body)
                })
            }
            ActivityAction::Delete => Some(CommentChange::Delete(CommentRef::new(actor, comment.comment_id))),
        }
    }

    fn reply_change(&self) -> Option<ReplyChange> {
        if self.has_reaction_id() || !self.has_comment_id() {
            return None;
        }
        let content = non_empty(self.content.as_deref())?;
        let actor = number_id(self.user_id.as_ref())?;
        let post = self.post_target_with(number_id)?;
        let comment = self.comment_target(number_id)?;
        let reply = self.reply_target(number_id)?;
        let body = ReplyContent::new(actor, post, comment, reply, content);

        match self.action {
            ActivityAction::Create => Some(ReplyChange::Create(body)),
            ActivityAction::Edit => Some(ReplyChange::Edit(body)),
            ActivityAction::Delete => None,
        }
    }

    fn reply_delete_change(&self) -> Option<ReplyChange> {
        if self.action != ActivityAction::Delete
            || non_empty(self.content.as_deref()).is_some()
            || self.has_reaction_id()
            || self.has_comment_id()
            || parse_post_id(self.post_id.as_ref()).is_some()
        {
            return None;
        }
        let reply_id = non_empty(self.reply_id.as_deref())?;
        let actor = present_id(self.user_id.as_ref())?;
        Some(ReplyChange::Delete(ReplyRef::new(actor, reply_id)))
    }

    fn post_target(&self) -> Option<PostTarget> {
        self.post_target_with(present_id)
    }

    fn post_target_with(&self, author: fn(Option<&Value>) -> Option<UserId>) -> Option<PostTarget> {
        let post_id = parse_post_id(self.post_id.as_ref())?;
        let post_author_id = author(self.post_author_id.as_ref())?;
        let Some(post_type) = self.post_type.clone() else {
            tracing::debug!("Post {} has no post type", post_id);
            return None;
        };
        Some(PostTarget::new(post_id, post_type, post_author_id))
    }

    fn comment_target(&self, author: fn(Option<&Value>) -> Option<UserId>) -> Option<CommentTarget> {
        let comment_id = non_empty(self.comment_id.as_deref())?;
        let comment_author_id = author(self.comment_author_id.as_ref())?;
        Some(CommentTarget::new(comment_id, comment_author_id))
    }

    fn reply_target(&self, author: fn(Option<&Value>) -> Option<UserId>) -> Option<ReplyTarget> {
        let reply_id = non_empty(self.reply_id.as_deref())?;
        let reply_author_id = author(self.reply_author_id.as_ref())?;
        Some(ReplyTarget::new(reply_id, reply_author_id))
    }

    fn has_comment_id(&self) -> bool {
        non_empty(self.comment_id.as_deref()).is_some()
    }

    fn has_reply_id(&self) -> bool {
        non_empty(self.reply_id.as_deref()).is_some()
    }

    fn has_reaction_id(&self) -> bool {
        non_empty(self.reaction_id.as_deref()).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Set, non-zero and numeric; numeric strings are accepted
fn present_id(value: Option<&Value>) -> Option<UserId> {
    let id = match value? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (id != 0).then_some(UserId(id))
}

/// A JSON number, zero included
fn number_id(value: Option<&Value>) -> Option<UserId> {
    match value? {
        Value::Number(n) => n.as_u64().map(UserId),
        _ => None,
    }
}

fn parse_post_id(value: Option<&Value>) -> Option<PostId> {
    match value? {
        Value::Number(n) => n.as_u64().filter(|i| *i != 0).map(PostId::Index),
        Value::String(s) if !s.is_empty() => Some(PostId::Hash(s.clone())),
        _ => None,
    }
}
