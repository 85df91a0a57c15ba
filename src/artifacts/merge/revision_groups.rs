//! Revision grouping
//!
//! A revision group is the set of all rewritten copies of one logical
//! change, linked via `replaces` edges. Two branches may have rewritten the
//! same change independently, so groups must merge when their chains meet;
//! this is a disjoint-set (union-find) keyed by commit identity, merged
//! along every `replaces` edge rather than through ad hoc shared-container
//! aliasing.

use crate::artifacts::objects::commit_id::CommitId;
use std::collections::HashMap;

/// Disjoint-set over commit identities
#[derive(Debug, Default)]
pub(crate) struct RevisionGroups {
    /// Parent pointers; an absent entry is its own root.
    parents: HashMap<CommitId, CommitId>,
}

impl RevisionGroups {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Merge the groups containing `a` and `b`.
    pub(crate) fn union(&mut self, a: &CommitId, b: &CommitId) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parents.insert(root_a, root_b);
        }
    }

    /// Whether `a` and `b` are revisions of the same logical change.
    pub(crate) fn same_group(&mut self, a: &CommitId, b: &CommitId) -> bool {
        self.find(a) == self.find(b)
    }

    /// Representative of `id`'s group, with path compression.
    fn find(&mut self, id: &CommitId) -> CommitId {
        match self.parents.get(id).cloned() {
            None => id.clone(),
            Some(parent) => {
                let root = self.find(&parent);
                if root != parent {
                    self.parents.insert(id.clone(), root.clone());
                }
                root
            }
        }
    }
}
