//! Commit node
//!
//! A commit is one point in simulated history: an identity, a message, the
//! color of the branch that created it, and three kinds of outgoing edges:
//!
//! - `parents`: direct predecessors, fixed at construction. Empty for a root
//!   commit, one entry for ordinary/rebased/replayed commits, two or more for
//!   merge commits.
//! - `ancestors`: display-only edges to history this commit supersedes via
//!   rebase, replay or amend. Never consulted when deciding whether two
//!   commits are revisions of the same change.
//! - `replaces`: edges to the commit(s) this one is a rewritten revision of.
//!   The replay engine follows these to recognize "same logical change".
//!
//! `ancestors` and `replaces` are append-only: later operations may record
//! that this commit has been superseded, but entries are never reordered or
//! removed.

use crate::artifacts::objects::color::Color;
use crate::artifacts::objects::commit_id::CommitId;
use derive_new::new;

/// A single node in the commit graph
#[derive(Debug, Clone, new)]
pub struct Commit {
    id: CommitId,
    message: String,
    color: Color,
    /// Ordinal of the branch that created this commit; ties in parent
    /// ordering are broken by it so traversal stays deterministic.
    origin_ordinal: usize,
    parents: Vec<CommitId>,
    ancestors: Vec<CommitId>,
    replaces: Vec<CommitId>,
}

impl Commit {
    pub fn id(&self) -> &CommitId {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn origin_ordinal(&self) -> usize {
        self.origin_ordinal
    }

    pub fn parents(&self) -> &[CommitId] {
        &self.parents
    }

    pub fn ancestors(&self) -> &[CommitId] {
        &self.ancestors
    }

    pub fn replaces(&self) -> &[CommitId] {
        &self.replaces
    }

    /// A root commit has no parents; it opens a new lane in the layout.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Record that this commit supersedes `ancestor` for display purposes.
    /// Appending the same edge twice is a no-op.
    pub(crate) fn add_ancestor(&mut self, ancestor: CommitId) {
        if !self.ancestors.contains(&ancestor) {
            self.ancestors.push(ancestor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn gray() -> Color {
        "#808080".parse().unwrap()
    }

    fn id_of(chain: &mut crate::artifacts::objects::commit_id::IdentityChain) -> CommitId {
        chain.next_id()
    }

    #[rstest]
    fn root_commit_has_no_parents(gray: Color) {
        let mut chain = crate::artifacts::objects::commit_id::IdentityChain::new();
        let commit = Commit::new(
            id_of(&mut chain),
            "First commit".to_string(),
            gray,
            1,
            vec![],
            vec![],
            vec![],
        );

        assert!(commit.is_root());
        assert!(commit.ancestors().is_empty());
        assert!(commit.replaces().is_empty());
    }

    #[rstest]
    fn ancestor_edges_are_append_only_and_deduplicated(gray: Color) {
        let mut chain = crate::artifacts::objects::commit_id::IdentityChain::new();
        let superseded = id_of(&mut chain);
        let mut commit = Commit::new(
            id_of(&mut chain),
            "Rewritten".to_string(),
            gray,
            1,
            vec![],
            vec![],
            vec![],
        );

        commit.add_ancestor(superseded.clone());
        commit.add_ancestor(superseded.clone());

        assert_eq!(commit.ancestors(), &[superseded]);
    }
}
