//! Commit graph node types
//!
//! - `color`: RGB provenance color carried by branches and commits
//! - `commit`: the immutable DAG node
//! - `commit_id`: opaque commit identities and the deterministic chain
//!   that mints them

pub mod color;
pub mod commit;
pub mod commit_id;
