//! Repository aggregate
//!
//! The repository owns every commit and branch of one simulation, plus the
//! process-wide counters (identity chain, branch ordinals) that make
//! independent simulations reproducible and isolated from each other.
//!
//! All head-moving operations live here as repository methods taking a
//! [`BranchId`]: the arena owns the graph, so branch handles are plain
//! indices. Merge/rebase/replay operands are anything commit-like, either
//! a commit identity or another branch.
//!
//! Shared-state discipline: a commit's parents are fixed at construction;
//! its ancestor/replaces lists are append-only; a branch head is moved only
//! by operations on that branch. Every rebase/replay snapshots its
//! reachability sets before mutating any head, so a failed precondition
//! leaves the graph untouched.

use crate::artifacts::branch::commitish::Commitish;
use crate::artifacts::branch::{Branch, BranchId};
use crate::artifacts::log::walk::{EdgeKinds, postorder};
use crate::artifacts::objects::color::Color;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::commit_id::{CommitId, IdentityChain};
use anyhow::{anyhow, bail};
use std::collections::{HashMap, HashSet};

/// Aggregate root owning named branches and the commit arena
#[derive(Debug)]
pub struct Repository {
    commits: HashMap<CommitId, Commit>,
    /// Branches in creation order; `BranchId` indexes into this list.
    branches: Vec<Branch>,
    branch_names: HashMap<String, BranchId>,
    identities: IdentityChain,
    next_ordinal: usize,
}

impl Repository {
    pub fn new() -> Self {
        Self::with_identities(IdentityChain::new())
    }

    /// Repository whose identity chain starts from a custom seed, so that
    /// parallel simulations never mint colliding identities.
    pub fn with_identities(identities: IdentityChain) -> Self {
        Self {
            commits: HashMap::new(),
            branches: Vec::new(),
            branch_names: HashMap::new(),
            identities,
            next_ordinal: 0,
        }
    }

    /// Register a new branch. Fails if the name is already taken.
    pub fn branch(
        &mut self,
        name: &str,
        head: Option<CommitId>,
        color: Color,
    ) -> anyhow::Result<BranchId> {
        if self.branch_names.contains_key(name) {
            bail!("branch {} already exists", name);
        }

        self.next_ordinal += 1;
        let id = BranchId(self.branches.len());
        self.branches
            .push(Branch::new(name.to_string(), head, color, self.next_ordinal));
        self.branch_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Register a new branch starting at `branch`'s current tip and record
    /// it as a downstream of `branch`. The color defaults to the parent
    /// branch's color.
    pub fn branch_from(
        &mut self,
        branch: BranchId,
        name: &str,
        color: Option<Color>,
    ) -> anyhow::Result<BranchId> {
        let head = self.branch_ref(branch).head().cloned();
        let color = color.unwrap_or_else(|| self.branch_ref(branch).color());
        let downstream = self.branch(name, head, color)?;
        self.branches[branch.0].add_downstream(downstream);
        Ok(downstream)
    }

    /// Create a new commit on `branch` and advance its head.
    pub fn commit(&mut self, branch: BranchId, message: &str) -> CommitId {
        let parents = self.head_as_parents(branch);
        self.create_commit(branch, message.to_string(), parents, vec![], vec![])
    }

    /// Copy `commit` onto `branch` as a fresh commit. Records only a
    /// display-time ancestor edge, never a `replaces` edge: a cherry-pick is
    /// a fork of a copy, not a rewrite, so it stays invisible to replay
    /// deduplication.
    pub fn cherry_pick(&mut self, branch: BranchId, commit: &CommitId) -> CommitId {
        let parents = self.head_as_parents(branch);
        let message = self.node(commit).message().to_string();
        self.create_commit(branch, message, parents, vec![commit.clone()], vec![])
    }

    /// Merge a single commit-like operand into `branch`.
    ///
    /// Fast-forwards without creating a commit when this branch's tip is
    /// already contained in the operand's history.
    pub fn merge(
        &mut self,
        branch: BranchId,
        other: &dyn Commitish,
        message: Option<&str>,
    ) -> anyhow::Result<CommitId> {
        self.merge_many(branch, &[other], message)
    }

    /// Merge several commit-like operands into `branch` at once (an octopus
    /// merge when more than one is given).
    pub fn merge_many(
        &mut self,
        branch: BranchId,
        others: &[&dyn Commitish],
        message: Option<&str>,
    ) -> anyhow::Result<CommitId> {
        if others.is_empty() {
            bail!("merge needs at least one operand");
        }
        let my_tip = self.tip(branch)?;

        let mut other_tips = Vec::with_capacity(others.len());
        for other in others {
            let tip = other.commitish(self).ok_or_else(|| {
                anyhow!("cannot merge {}: it has no commits", other.display_name(self))
            })?;
            if tip == my_tip {
                bail!(
                    "cannot merge branch {} into itself",
                    self.branch_ref(branch).name()
                );
            }
            other_tips.push(tip);
        }

        // Fast-forward when the single operand already contains this tip.
        if let [tip] = other_tips.as_slice() {
            if postorder(self, [tip.clone()], EdgeKinds::PARENTS).contains(&my_tip) {
                let tip = tip.clone();
                self.reset_to(branch, tip.clone());
                return Ok(tip);
            }
        }

        let message = match message {
            Some(message) => message.to_string(),
            None => {
                let names: Vec<String> =
                    others.iter().map(|other| other.display_name(self)).collect();
                format!(
                    "Merging {} into {}",
                    names.join(", "),
                    self.branch_ref(branch).name()
                )
            }
        };

        let mut parents = vec![my_tip];
        parents.extend(other_tips);
        Ok(self.create_commit(branch, message, parents, vec![], vec![]))
    }

    /// Force `branch`'s head to whatever `target` denotes. No edge is
    /// recorded; this is the primitive under fast-forward and replay.
    pub fn reset(&mut self, branch: BranchId, target: &dyn Commitish) {
        let tip = target.commitish(self);
        self.branches[branch.0].set_head(tip);
    }

    /// Replay this branch's unique commits onto `onto`, in their original
    /// topological order, via cherry-pick. Commits named in `fixups` are
    /// dropped. The abandoned tip is recorded as an ancestor of the new
    /// tip.
    pub fn rebase(
        &mut self,
        branch: BranchId,
        onto: &dyn Commitish,
        fixups: &HashSet<CommitId>,
    ) -> anyhow::Result<CommitId> {
        let old = self.tip(branch)?;
        let onto_tip = onto.commitish(self).ok_or_else(|| {
            anyhow!("cannot rebase onto {}: it has no commits", onto.display_name(self))
        })?;

        // Snapshot reachability before moving the head.
        let upstream: HashSet<CommitId> = postorder(self, [onto_tip.clone()], EdgeKinds::PARENTS)
            .into_iter()
            .collect();
        let to_rebase: Vec<CommitId> = postorder(self, [old.clone()], EdgeKinds::PARENTS)
            .into_iter()
            .filter(|commit| !upstream.contains(commit) && !fixups.contains(commit))
            .collect();

        self.reset_to(branch, onto_tip);
        for commit in &to_rebase {
            self.cherry_pick(branch, commit);
        }

        let new_tip = self.tip(branch)?;
        self.node_mut(&new_tip).add_ancestor(old);
        Ok(new_tip)
    }

    /// Rebase onto `original`'s parent while dropping `fixup`, squashing
    /// the fixup into history.
    pub fn fixup_rebase(
        &mut self,
        branch: BranchId,
        original: &CommitId,
        fixup: &CommitId,
    ) -> anyhow::Result<CommitId> {
        let base = self
            .node(original)
            .parents()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("cannot fixup-rebase past a root commit"))?;
        self.rebase(branch, &base, &HashSet::from([fixup.clone()]))
    }

    /// Current tip of `branch`; an error if the branch has no commits yet.
    pub fn tip(&self, branch: BranchId) -> anyhow::Result<CommitId> {
        self.branch_ref(branch)
            .head()
            .cloned()
            .ok_or_else(|| anyhow!("branch {} has no commits", self.branch_ref(branch).name()))
    }

    /// Walk the whole reachable graph from every branch head, in branch
    /// creation order, following `edges`.
    pub fn traverse(&self, edges: EdgeKinds) -> Vec<CommitId> {
        postorder(self, self.heads(), edges)
    }

    /// Commits reachable (parent edges only) from the given branches'
    /// tips. The renderer treats everything else as superseded history and
    /// draws it dimmed.
    pub fn active_commits(&self, branches: &[BranchId]) -> HashSet<CommitId> {
        let roots: Vec<CommitId> = branches
            .iter()
            .filter_map(|branch| self.branch_ref(*branch).head().cloned())
            .collect();
        postorder(self, roots, EdgeKinds::PARENTS).into_iter().collect()
    }

    pub fn branch_ref(&self, branch: BranchId) -> &Branch {
        &self.branches[branch.0]
    }

    pub fn find_branch(&self, name: &str) -> Option<BranchId> {
        self.branch_names.get(name).copied()
    }

    /// Branches in creation order.
    pub fn branches(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        self.branches
            .iter()
            .enumerate()
            .map(|(index, branch)| (BranchId(index), branch))
    }

    pub fn find_commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.get(id)
    }

    /// Number of commits ever created in this repository.
    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Look up a commit minted by this repository.
    ///
    /// Panics if the id belongs to a different repository; internal callers
    /// only ever pass ids minted here.
    pub(crate) fn node(&self, id: &CommitId) -> &Commit {
        &self.commits[id]
    }

    pub(crate) fn node_mut(&mut self, id: &CommitId) -> &mut Commit {
        self.commits
            .get_mut(id)
            .unwrap_or_else(|| panic!("commit {} is foreign to this repository", id))
    }

    pub(crate) fn reset_to(&mut self, branch: BranchId, tip: CommitId) {
        self.branches[branch.0].set_head(Some(tip));
    }

    pub(crate) fn head_as_parents(&self, branch: BranchId) -> Vec<CommitId> {
        self.branch_ref(branch).head().cloned().into_iter().collect()
    }

    /// Mint an identity, store the commit and advance the branch head.
    pub(crate) fn create_commit(
        &mut self,
        branch: BranchId,
        message: String,
        parents: Vec<CommitId>,
        ancestors: Vec<CommitId>,
        replaces: Vec<CommitId>,
    ) -> CommitId {
        let id = self.identities.next_id();
        let (color, ordinal) = {
            let branch = self.branch_ref(branch);
            (branch.color(), branch.ordinal())
        };
        let commit = Commit::new(
            id.clone(),
            message,
            color,
            ordinal,
            parents,
            ancestors,
            replaces,
        );
        self.commits.insert(id.clone(), commit);
        self.reset_to(branch, id.clone());
        id
    }

    fn heads(&self) -> Vec<CommitId> {
        self.branches
            .iter()
            .filter_map(|branch| branch.head().cloned())
            .collect()
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
