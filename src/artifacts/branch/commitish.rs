//! The commit-like capability
//!
//! Merge, rebase and replay accept anything that denotes a commit: a commit
//! identity denotes itself, a branch denotes its current head. This is a
//! small trait with exactly those two implementations, not a type
//! hierarchy.

use crate::areas::repository::Repository;
use crate::artifacts::branch::BranchId;
use crate::artifacts::objects::commit_id::CommitId;

/// Something that resolves to a commit plus a display name
pub trait Commitish {
    /// The commit this denotes, if it denotes one at all. A branch with no
    /// commits yet denotes nothing.
    fn commitish(&self, repository: &Repository) -> Option<CommitId>;

    /// Human-readable name for generated messages and errors.
    fn display_name(&self, repository: &Repository) -> String;

    /// The branch behind this value, when there is one. Replay uses it to
    /// apply its directional shortcut to registered downstreams.
    fn branch_id(&self) -> Option<BranchId> {
        None
    }
}

impl Commitish for CommitId {
    fn commitish(&self, _repository: &Repository) -> Option<CommitId> {
        Some(self.clone())
    }

    fn display_name(&self, _repository: &Repository) -> String {
        self.to_short_id()
    }
}

impl Commitish for BranchId {
    fn commitish(&self, repository: &Repository) -> Option<CommitId> {
        repository.branch_ref(*self).head().cloned()
    }

    fn display_name(&self, repository: &Repository) -> String {
        repository.branch_ref(*self).name().to_string()
    }

    fn branch_id(&self) -> Option<BranchId> {
        Some(*self)
    }
}
