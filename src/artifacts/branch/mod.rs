//! Branches
//!
//! A branch is a named mutable pointer into the commit graph. Every
//! operation that extends history moves the head in place; branches are
//! never deleted. Branches created from another branch are remembered as
//! that branch's `downstreams`, which gives replay its direction: upstream
//! work is landed first, downstream work is reapplied on top.

pub mod commitish;

use crate::artifacts::objects::color::Color;
use crate::artifacts::objects::commit_id::CommitId;
use std::collections::HashSet;

/// Index of a branch inside its repository's insertion-ordered registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchId(pub(crate) usize);

/// Named mutable reference to a commit
#[derive(Debug, Clone)]
pub struct Branch {
    name: String,
    head: Option<CommitId>,
    color: Color,
    /// Creation order across the whole repository; used as the tie-break
    /// key when sorting a commit's parents for traversal.
    ordinal: usize,
    downstreams: HashSet<BranchId>,
}

impl Branch {
    pub(crate) fn new(name: String, head: Option<CommitId>, color: Color, ordinal: usize) -> Self {
        Self {
            name,
            head,
            color,
            ordinal,
            downstreams: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn head(&self) -> Option<&CommitId> {
        self.head.as_ref()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Branches that were created from this one.
    pub fn downstreams(&self) -> &HashSet<BranchId> {
        &self.downstreams
    }

    pub(crate) fn set_head(&mut self, head: Option<CommitId>) {
        self.head = head;
    }

    pub(crate) fn add_downstream(&mut self, branch: BranchId) {
        self.downstreams.insert(branch);
    }
}
