//! History reconciliation
//!
//! - `replay`: bidirectional, conflict-aware reconciliation of two branches
//! - `revision_groups`: disjoint-set over `replaces` chains used by replay
//!   to recognize independently rewritten copies of one logical change

pub mod replay;
pub(crate) mod revision_groups;

use crate::artifacts::objects::commit_id::CommitId;
use std::collections::HashMap;

/// Fixup mapping for replay: commit to drop, keyed to the original commit
/// it amends. Dropped commits are skipped entirely; their originals are
/// pinned so the amendment is materialized instead of silently absorbed.
pub type ReplayFixups = HashMap<CommitId, CommitId>;
