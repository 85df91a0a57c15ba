//! Deduplicating postorder walk over the commit graph
//!
//! Given one or more starting commits and a set of edge kinds to follow,
//! [`postorder`] produces a sequence in which every reachable commit appears
//! exactly once, and only after all of its followed-edge predecessors, so
//! the result is a valid topological order of the followed subgraph.
//!
//! Parents are visited in ascending origin-branch ordinal, so the
//! oldest-branch lineage is enumerated first; that ordering governs the
//! left-to-right placement everything downstream relies on. When ancestor
//! edges are followed, their targets are treated as additional discovered
//! roots and appended to the outstanding work list, still subject to the
//! single-visit guarantee.

use crate::areas::repository::Repository;
use crate::artifacts::objects::commit_id::CommitId;
use bitflags::bitflags;
use std::collections::{HashSet, VecDeque};

bitflags! {
    /// Which edge kinds a walk follows
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EdgeKinds: u8 {
        /// Direct predecessor edges
        const PARENTS = 0b001;
        /// Display-only edges to superseded history; targets become
        /// additional roots
        const ANCESTORS = 0b010;
        /// Rewritten-revision edges
        const REPLACES = 0b100;
    }
}

enum Frame {
    Enter(CommitId),
    Emit(CommitId),
}

/// Walk the graph from `roots`, following `edges`, in deduplicated
/// postorder.
pub fn postorder(
    repository: &Repository,
    roots: impl IntoIterator<Item = CommitId>,
    edges: EdgeKinds,
) -> Vec<CommitId> {
    let mut pending: VecDeque<CommitId> = roots.into_iter().collect();
    let mut seen = HashSet::new();
    let mut order = Vec::new();

    while let Some(root) = pending.pop_front() {
        visit_from(repository, root, edges, &mut pending, &mut seen, &mut order);
    }

    order
}

fn visit_from(
    repository: &Repository,
    root: CommitId,
    edges: EdgeKinds,
    pending: &mut VecDeque<CommitId>,
    seen: &mut HashSet<CommitId>,
    order: &mut Vec<CommitId>,
) {
    let mut stack = vec![Frame::Enter(root)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                if !seen.insert(id.clone()) {
                    continue;
                }
                let commit = repository.node(&id);

                if edges.contains(EdgeKinds::ANCESTORS) {
                    for ancestor in commit.ancestors() {
                        pending.push_back(ancestor.clone());
                    }
                }

                stack.push(Frame::Emit(id));

                let mut predecessors: Vec<&CommitId> = Vec::new();
                if edges.contains(EdgeKinds::PARENTS) {
                    let mut parents: Vec<&CommitId> = commit.parents().iter().collect();
                    parents.sort_by_key(|parent| repository.node(parent).origin_ordinal());
                    predecessors.extend(parents);
                }
                if edges.contains(EdgeKinds::REPLACES) {
                    predecessors.extend(commit.replaces().iter());
                }

                // Reversed so the first predecessor is processed first.
                for predecessor in predecessors.into_iter().rev() {
                    stack.push(Frame::Enter(predecessor.clone()));
                }
            }
            Frame::Emit(id) => order.push(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    /// master: base <- left-tip, development forked at base: base <- right,
    /// then master merges development.
    #[fixture]
    fn diverged() -> (Repository, CommitId, CommitId, CommitId, CommitId) {
        let mut repository = Repository::new();
        let master = repository
            .branch("master", None, "#808080".parse().unwrap())
            .unwrap();
        let base = repository.commit(master, "base");
        let development = repository.branch_from(master, "development", None).unwrap();
        let left = repository.commit(master, "left");
        let right = repository.commit(development, "right");
        let merge = repository.merge(master, &development, None).unwrap();
        (repository, base, left, right, merge)
    }

    #[rstest]
    fn every_reachable_commit_appears_exactly_once(
        diverged: (Repository, CommitId, CommitId, CommitId, CommitId),
    ) {
        let (repository, ..) = diverged;
        let order = repository.traverse(EdgeKinds::PARENTS);

        let unique: HashSet<&CommitId> = order.iter().collect();
        assert_eq!(unique.len(), order.len());
        assert_eq!(order.len(), 4);
    }

    #[rstest]
    fn parents_precede_children(diverged: (Repository, CommitId, CommitId, CommitId, CommitId)) {
        let (repository, ..) = diverged;
        let order = repository.traverse(EdgeKinds::PARENTS);

        let position = |id: &CommitId| order.iter().position(|c| c == id).unwrap();
        for id in &order {
            for parent in repository.find_commit(id).unwrap().parents() {
                assert!(position(parent) < position(id));
            }
        }
    }

    #[rstest]
    fn oldest_branch_lineage_is_enumerated_first(
        diverged: (Repository, CommitId, CommitId, CommitId, CommitId),
    ) {
        let (repository, base, left, right, merge) = diverged;
        let order = repository.traverse(EdgeKinds::PARENTS);

        // master (ordinal 1) is older than development (ordinal 2), so the
        // merge commit's first-visited parent lineage is master's.
        assert_eq!(order, vec![base, left, right, merge]);
    }

    #[rstest]
    fn ancestor_targets_become_additional_roots() {
        let mut repository = Repository::new();
        let master = repository
            .branch("master", None, "#808080".parse().unwrap())
            .unwrap();
        repository.commit(master, "base");
        let development = repository.branch_from(master, "development", None).unwrap();
        repository.commit(development, "change");
        repository.commit(master, "conflicting change");
        let abandoned = repository.tip(development).unwrap();
        repository
            .rebase(development, &master, &HashSet::new())
            .unwrap();

        let with_ancestors = repository.traverse(EdgeKinds::PARENTS | EdgeKinds::ANCESTORS);
        let without = repository.traverse(EdgeKinds::PARENTS);

        assert!(with_ancestors.contains(&abandoned));
        assert!(!without.contains(&abandoned));
    }

    #[rstest]
    fn replaces_edges_reach_superseded_revisions() {
        let mut repository = Repository::new();
        let master = repository
            .branch("master", None, "#808080".parse().unwrap())
            .unwrap();
        repository.commit(master, "base");
        let original = repository.commit(master, "change");
        let amended = repository.replay_amend(master).unwrap();

        let chain = crate::artifacts::log::walk::postorder(
            &repository,
            [amended.clone()],
            EdgeKinds::REPLACES,
        );

        assert_eq!(chain, vec![original, amended]);
    }
}
