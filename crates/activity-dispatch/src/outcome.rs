//! Per-branch dispatch results

use crate::error::DispatchError;
use crate::request::{ActivityAction, BranchKind};
use activity_store::CommitReceipt;
use std::fmt;

/// What happened to one branch
#[derive(Debug)]
pub enum BranchStatus {
    /// Batch committed
    Committed { written: usize, deleted: usize },
    /// Nothing to write or delete
    NoOp,
    /// Branch failed before or during commit; nothing was applied
    Failed(DispatchError),
}

impl From<CommitReceipt> for BranchStatus {
    fn from(receipt: CommitReceipt) -> Self {
        Self::Committed {
            written: receipt.written,
            deleted: receipt.deleted,
        }
    }
}

/// Result of dispatching one request
#[derive(Debug)]
pub struct BranchOutcome {
    pub branch: BranchKind,
    pub action: ActivityAction,
    pub status: BranchStatus,
}

impl BranchOutcome {
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.status, BranchStatus::Failed(_))
    }

    #[inline]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self.status, BranchStatus::Committed { .. })
    }

    /// Failure cause, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&DispatchError> {
        match &self.status {
            BranchStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for BranchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: ", self.action, self.branch)?;
        match &self.status {
            BranchStatus::Committed { written, deleted } => {
                write!(f, "committed ({written} written, {deleted} deleted)")
            }
            BranchStatus::NoOp => f.write_str("no-op"),
            BranchStatus::Failed(e) => write!(f, "failed ({e})"),
        }
    }
}

/// Outcomes of every branch fired by one call
///
/// Branches commit independently. A report can therefore be partial: some
/// branches applied, others failed, with no rollback of the former.
#[derive(Debug, Default)]
pub struct DispatchReport {
    outcomes: Vec<BranchOutcome>,
}

impl DispatchReport {
    #[inline]
    #[must_use]
    pub fn new(outcomes: Vec<BranchOutcome>) -> Self {
        Self { outcomes }
    }

    #[inline]
    #[must_use]
    pub fn outcomes(&self) -> &[BranchOutcome] {
        &self.outcomes
    }

    #[inline]
    #[must_use]
    pub fn into_outcomes(self) -> Vec<BranchOutcome> {
        self.outcomes
    }

    /// No branch fired
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// No branch failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(BranchOutcome::is_failed)
    }

    /// At least one branch committed and at least one failed
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.outcomes.iter().any(BranchOutcome::is_failed)
            && self.outcomes.iter().any(BranchOutcome::is_committed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &BranchOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Documents written across committed branches
    #[must_use]
    pub fn written(&self) -> usize {
        self.receipts().map(|(w, _)| w).sum()
    }

    /// Documents deleted across committed branches
    #[must_use]
    pub fn deleted(&self) -> usize {
        self.receipts().map(|(_, d)| d).sum()
    }

    /// Outcome for a branch, if it fired
    #[must_use]
    pub fn branch(&self, kind: BranchKind) -> Option<&BranchOutcome> {
        self.outcomes.iter().find(|o| o.branch == kind)
    }

    fn receipts(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.outcomes.iter().filter_map(|o| match o.status {
            BranchStatus::Committed { written, deleted } => Some((written, deleted)),
            _ => None,
        })
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failures().count();
        let committed = self.outcomes.iter().filter(|o| o.is_committed()).count();
        write!(
            f,
            "{} branches: {} committed, {} no-op, {} failed",
            self.outcomes.len(),
            committed,
            self.outcomes.len() - committed - failed,
            failed
        )
    }
}

impl FromIterator<BranchOutcome> for DispatchReport {
    fn from_iter<I: IntoIterator<Item = BranchOutcome>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
