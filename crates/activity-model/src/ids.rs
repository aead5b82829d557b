//! Identifier types
//!
//! User and post identifiers mirror what the governance pages store: users are
//! numeric, posts are either an on-chain index or an opaque hash.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use ulid::Ulid;

/// Numeric user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// Raw numeric value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<UserId> for Value {
    fn from(id: UserId) -> Self {
        Value::from(id.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post identifier: on-chain index or off-chain hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    /// Numeric index (referenda, motions, discussions)
    Index(u64),
    /// String identifier (tips, hashes)
    Hash(String),
}

impl From<u64> for PostId {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PostId {
    fn from(hash: &str) -> Self {
        Self::Hash(hash.to_string())
    }
}

impl From<String> for PostId {
    fn from(hash: String) -> Self {
        Self::Hash(hash)
    }
}

impl From<&PostId> for Value {
    fn from(id: &PostId) -> Self {
        match id {
            PostId::Index(i) => Value::from(*i),
            PostId::Hash(h) => Value::from(h.as_str()),
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Hash(h) => f.write_str(h),
        }
    }
}

/// Deployment/chain namespace
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Network(String);

impl Network {
    /// Create a network namespace
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyNetwork`] for empty or blank names
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyNetwork);
        }
        Ok(Self(name))
    }

    /// Name as text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Network {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Network> for String {
    fn from(network: Network) -> Self {
        network.0
    }
}

impl From<&Network> for Value {
    fn from(network: &Network) -> Self {
        Value::from(network.0.as_str())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generated document identifier (ULID for sortability)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate new document ID
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Wrap an existing identifier
    #[inline]
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proposal / post category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostType {
    Discussions,
    ReferendumsV2,
    FellowshipReferendums,
    TreasuryProposals,
    Bounties,
    ChildBounties,
    Tips,
    DemocracyProposals,
    CouncilMotions,
    TechCommitteeProposals,
    Grants,
    /// Any category not listed above, kept verbatim
    Other(String),
}

impl PostType {
    /// Stored text form
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Discussions => "discussions",
            Self::ReferendumsV2 => "referendums_v2",
            Self::FellowshipReferendums => "fellowship_referendums",
            Self::TreasuryProposals => "treasury_proposals",
            Self::Bounties => "bounties",
            Self::ChildBounties => "child_bounties",
            Self::Tips => "tips",
            Self::DemocracyProposals => "democracy_proposals",
            Self::CouncilMotions => "council_motions",
            Self::TechCommitteeProposals => "tech_committee_proposals",
            Self::Grants => "grants",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for PostType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "discussions" => Self::Discussions,
            "referendums_v2" => Self::ReferendumsV2,
            "fellowship_referendums" => Self::FellowshipReferendums,
            "treasury_proposals" => Self::TreasuryProposals,
            "bounties" => Self::Bounties,
            "child_bounties" => Self::ChildBounties,
            "tips" => Self::Tips,
            "democracy_proposals" => Self::DemocracyProposals,
            "council_motions" => Self::CouncilMotions,
            "tech_committee_proposals" => Self::TechCommitteeProposals,
            "grants" => Self::Grants,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for PostType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PostType> for String {
    fn from(post_type: PostType) -> Self {
        match post_type {
            PostType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_rejects_blank() {
        assert!(Network::new("").is_err());
        assert!(Network::new("   ").is_err());
        assert_eq!(Network::new("kusama").unwrap().as_str(), "kusama");
    }

    #[test]
    fn network_deserialize_validates() {
        let err = serde_json::from_str::<Network>("\"\"");
        assert!(err.is_err());
        let ok: Network = serde_json::from_str("\"polkadot\"").unwrap();
        assert_eq!(ok.to_string(), "polkadot");
    }

    #[test]
    fn post_id_is_untagged() {
        let index: PostId = serde_json::from_str("42").unwrap();
        assert_eq!(index, PostId::Index(42));

        let hash: PostId = serde_json::from_str("\"0xabc\"").unwrap();
        assert_eq!(hash, PostId::Hash("0xabc".to_string()));

        assert_eq!(Value::from(&index), Value::from(42u64));
    }

    #[test]
    fn post_type_keeps_unknown_categories() {
        assert_eq!(PostType::from("tips"), PostType::Tips);
        let other = PostType::from("alliance_motion");
        assert_eq!(other, PostType::Other("alliance_motion".to_string()));
        assert_eq!(String::from(other), "alliance_motion");
    }

    #[test]
    fn document_id_generation() {
        let id1 = DocumentId::generate();
        let id2 = DocumentId::generate();
        assert_ne!(id1, id2);
    }
}
