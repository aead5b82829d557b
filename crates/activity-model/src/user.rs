use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// User as stored in the `users` collection
///
/// Other profile fields may be present in the document; only these two are
/// read here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}
