//! Conflict-aware two-branch reconciliation
//!
//! Replay reconciles two branches whose histories may have independently
//! rewritten the same logical change. Unlike rebase, which assumes one
//! author's linear unique commits, replay must avoid duplicating a change
//! that exists in two divergent rewritten forms, and must fall back to an
//! explicit merge when the two forms are genuinely irreconcilable by
//! ordering alone.
//!
//! The algorithm, in order:
//!
//! 1. Directional shortcut: replaying a registered downstream inverts the
//!    roles, so this branch's own commits keep their identities and the
//!    downstream's unique work is rewritten on top of them.
//! 2. Fast-forward shortcut: if the other tip is already part of this
//!    branch's history and no fixups were supplied, there is nothing to do.
//! 3. Reachability sets for both tips are snapshotted before any head
//!    moves; shared history is skipped entirely.
//! 4. Every unique commit is grouped with all revisions of the same change
//!    by unioning along `replaces` chains (see `revision_groups`).
//! 5. The other side's unique commits are resolved in DAG order: pure
//!    upstream work fast-forwards while possible; a commit whose group has
//!    a live counterpart here resolves to whichever revision supersedes
//!    the other along `replaces` edges, or to a synthesized merge commit
//!    when neither does, which permanently disables fast-forwarding.
//! 6. The remaining unique commits of this branch are replayed on top,
//!    fast-forwarding only while the running head is already a parent of
//!    the commit and the commit is not pinned as a fixup original.
//!
//! Finding two simultaneously live revisions of one change on a single side
//! is a modeling inconsistency and aborts loudly; it is never resolved by
//! picking one arbitrarily.

use crate::areas::repository::Repository;
use crate::artifacts::branch::BranchId;
use crate::artifacts::branch::commitish::Commitish;
use crate::artifacts::log::walk::{EdgeKinds, postorder};
use crate::artifacts::merge::ReplayFixups;
use crate::artifacts::merge::revision_groups::RevisionGroups;
use crate::artifacts::objects::commit_id::CommitId;
use anyhow::{anyhow, bail};
use std::collections::HashSet;

/// Macro for debug logging that is enabled with the debug_replay feature flag
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_replay")]
        {
            eprintln!($($arg)*);
        }
    };
}

impl Repository {
    /// Reconcile `branch` with `other`, deduplicating independently
    /// rewritten copies of the same logical change.
    ///
    /// Returns the resulting tip, or `None` when the replay was a no-op
    /// fast-forward. `fixups` maps commits to drop to the originals they
    /// amend.
    pub fn replay(
        &mut self,
        branch: BranchId,
        other: &dyn Commitish,
        fixups: &ReplayFixups,
    ) -> anyhow::Result<Option<CommitId>> {
        // Replay has a direction: always replay downstream onto upstream.
        if let Some(other_branch) = other.branch_id() {
            if self.branch_ref(branch).downstreams().contains(&other_branch) {
                debug_log!(
                    "replay: {} is a downstream of {}, inverting roles",
                    self.branch_ref(other_branch).name(),
                    self.branch_ref(branch).name()
                );
                let old = self.tip(branch)?;
                let other_tip = other.commitish(self).ok_or_else(|| {
                    anyhow!("cannot replay {}: it has no commits", other.display_name(self))
                })?;
                self.reset_to(branch, other_tip);
                self.replay(branch, &old, &ReplayFixups::new())?;
                let new_tip = self.tip(branch)?;
                self.node_mut(&new_tip).add_ancestor(old);
                return Ok(Some(new_tip));
            }
        }

        let other_tip = other.commitish(self).ok_or_else(|| {
            anyhow!("cannot replay {}: it has no commits", other.display_name(self))
        })?;
        let my_tip = self.tip(branch)?;

        // The other tip is already part of this history: nothing to do.
        if fixups.is_empty()
            && postorder(self, [my_tip.clone()], EdgeKinds::PARENTS).contains(&other_tip)
        {
            debug_log!("replay: {} already reachable, no-op", other_tip.to_short_id());
            return Ok(None);
        }

        // Snapshot both reachability sets before any head moves.
        let other_commits: HashSet<CommitId> =
            postorder(self, [other_tip.clone()], EdgeKinds::PARENTS)
                .into_iter()
                .collect();
        let my_order = postorder(self, [my_tip.clone()], EdgeKinds::PARENTS);
        let my_commits: HashSet<CommitId> = my_order.iter().cloned().collect();
        let common: HashSet<CommitId> =
            other_commits.intersection(&my_commits).cloned().collect();
        let my_unique: HashSet<CommitId> =
            my_commits.difference(&common).cloned().collect();

        // Group every rewritten revision of one logical change together.
        let mut groups = RevisionGroups::new();
        let mut grouped: HashSet<CommitId> = HashSet::new();
        for commit in other_commits.union(&my_commits) {
            if common.contains(commit) {
                continue;
            }
            for revision in postorder(self, [commit.clone()], EdgeKinds::REPLACES) {
                if !grouped.insert(revision.clone()) {
                    continue;
                }
                for replaced in self.node(&revision).replaces().to_vec() {
                    groups.union(&revision, &replaced);
                }
            }
        }

        // Fixups just get dropped; their originals are pinned below.
        let originals: HashSet<CommitId> = fixups.values().cloned().collect();
        let to_replay: Vec<CommitId> = my_order
            .into_iter()
            .filter(|commit| !other_commits.contains(commit) && !fixups.contains_key(commit))
            .collect();

        let old = my_tip;
        self.reset_to(branch, other_tip.clone());

        // Resolve the other side's unique commits in DAG order. Until a
        // conflict forces a new commit we can fast-forward through them.
        let upstream_order = postorder(self, [other_tip], EdgeKinds::PARENTS);
        let mut resolved: HashSet<CommitId> = HashSet::new();
        let mut fast_forward = true;
        for commit in upstream_order {
            if common.contains(&commit) {
                continue;
            }
            resolved.insert(commit.clone());

            let counterparts: Vec<CommitId> = my_unique
                .iter()
                .filter(|mine| groups.same_group(&commit, mine))
                .cloned()
                .collect();

            match counterparts.as_slice() {
                [] => {
                    // Pure upstream work.
                    debug_log!("replay: taking upstream {}", commit.to_short_id());
                    self.take_revision(branch, &commit, fast_forward, &old)?;
                }
                [counterpart] => {
                    let counterpart = counterpart.clone();
                    resolved.insert(counterpart.clone());

                    if self.is_later_revision(&commit, &counterpart) {
                        debug_log!(
                            "replay: upstream {} supersedes {}",
                            commit.to_short_id(),
                            counterpart.to_short_id()
                        );
                        self.take_revision(branch, &commit, fast_forward, &old)?;
                    } else if self.is_later_revision(&counterpart, &commit) {
                        debug_log!(
                            "replay: keeping {} over upstream {}",
                            counterpart.to_short_id(),
                            commit.to_short_id()
                        );
                        self.take_revision(branch, &counterpart, fast_forward, &old)?;
                    } else {
                        // Neither revision supersedes the other: merge them
                        // and stop fast-forwarding for good.
                        debug_log!(
                            "replay: merging irreconcilable revisions {} and {}",
                            commit.to_short_id(),
                            counterpart.to_short_id()
                        );
                        fast_forward = false;
                        let merged =
                            self.replay_merge(branch, &[commit.clone(), counterpart])?;
                        self.node_mut(&merged).add_ancestor(old.clone());
                    }
                }
                _ => bail!(
                    "replay found two live revisions of one change on branch {}",
                    self.branch_ref(branch).name()
                ),
            }
        }

        // Replay our own remaining unique commits on top.
        for commit in to_replay {
            if resolved.contains(&commit) {
                continue;
            }
            if fast_forward {
                let head = self.tip(branch)?;
                if !self.node(&commit).parents().contains(&head) || originals.contains(&commit) {
                    fast_forward = false;
                }
            }
            debug_log!(
                "replay: carrying over {} (fast_forward={})",
                commit.to_short_id(),
                fast_forward
            );
            self.take_revision(branch, &commit, fast_forward, &old)?;
        }

        let new_tip = self.tip(branch)?;
        self.node_mut(&new_tip).add_ancestor(old);
        Ok(Some(new_tip))
    }

    /// Replace the current tip with a rewritten copy of itself: same
    /// parents, `replaces` and ancestor edges back to the old tip. Models
    /// amending the last commit.
    pub fn replay_amend(&mut self, branch: BranchId) -> anyhow::Result<CommitId> {
        let old = self.tip(branch)?;
        let (message, parents) = {
            let node = self.node(&old);
            (node.message().to_string(), node.parents().to_vec())
        };
        let amended = self.create_commit(
            branch,
            message,
            parents,
            vec![old.clone()],
            vec![old],
        );
        Ok(amended)
    }

    /// Replay onto `original`'s parent while dropping the commits named in
    /// `fixups`, squashing each into the original it amends.
    pub fn fixup_replay(
        &mut self,
        branch: BranchId,
        original: &CommitId,
        fixups: &ReplayFixups,
    ) -> anyhow::Result<Option<CommitId>> {
        let base = self
            .node(original)
            .parents()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("cannot fixup-replay past a root commit"))?;
        self.replay(branch, &base, fixups)
    }

    /// Materialize a single replayed commit on `branch`.
    pub fn replay_commit(
        &mut self,
        branch: BranchId,
        commit: &CommitId,
    ) -> anyhow::Result<CommitId> {
        self.replay_merge(branch, std::slice::from_ref(commit))
    }

    /// Materialize one commit replacing several revisions at once. The
    /// message is taken from the first revision.
    pub fn replay_merge(
        &mut self,
        branch: BranchId,
        revisions: &[CommitId],
    ) -> anyhow::Result<CommitId> {
        let first = revisions
            .first()
            .ok_or_else(|| anyhow!("replay merge needs at least one revision"))?;
        let message = self.node(first).message().to_string();
        let parents = self.head_as_parents(branch);
        Ok(self.create_commit(branch, message, parents, vec![], revisions.to_vec()))
    }

    /// Take `revision` as the next step of a replay: fast-forward the head
    /// onto it while still contiguous, otherwise materialize an explicit
    /// replayed commit carrying the pre-replay tip as an ancestor.
    fn take_revision(
        &mut self,
        branch: BranchId,
        revision: &CommitId,
        fast_forward: bool,
        old: &CommitId,
    ) -> anyhow::Result<()> {
        if fast_forward {
            self.reset_to(branch, revision.clone());
        } else {
            let made = self.replay_commit(branch, revision)?;
            self.node_mut(&made).add_ancestor(old.clone());
        }
        Ok(())
    }

    /// Whether `later` is a later revision of `earlier` along `replaces`
    /// edges only.
    fn is_later_revision(&self, later: &CommitId, earlier: &CommitId) -> bool {
        postorder(self, [later.clone()], EdgeKinds::REPLACES).contains(earlier)
    }
}
