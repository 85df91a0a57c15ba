//! Commit graph data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `branch`: Branch records and the commit-like capability
//! - `layout`: Lane/column placement of the full commit graph
//! - `log`: Deduplicating postorder traversal over selectable edge kinds
//! - `merge`: Replay reconciliation and revision grouping
//! - `objects`: Commit nodes, identities and colors

pub mod branch;
pub mod layout;
pub mod log;
pub mod merge;
pub mod objects;
