//! Git-style history simulation and diagram layout
//!
//! Models commit history under git-like operations (commit, branch, merge,
//! rebase, cherry-pick, replay) as an evolving DAG, then computes a
//! deterministic lane/column layout of that DAG for diagram rendering.
//!
//! The crate is a library only: building a repository, issuing operations in
//! sequence and serializing the resulting layout to vector graphics are the
//! caller's job. The core hands the renderer a typed [`Layout`] plus the
//! identity, message and color of every commit.

pub mod areas;
pub mod artifacts;

pub use areas::repository::Repository;
pub use artifacts::branch::commitish::Commitish;
pub use artifacts::branch::{Branch, BranchId};
pub use artifacts::layout::{Layout, Placement};
pub use artifacts::log::walk::EdgeKinds;
pub use artifacts::merge::ReplayFixups;
pub use artifacts::objects::color::Color;
pub use artifacts::objects::commit::Commit;
pub use artifacts::objects::commit_id::{CommitId, IdentityChain};
