//! History traversal
//!
//! - `walk`: shared deduplicating postorder walk over a configurable set of
//!   edge kinds; every other component builds on it

pub mod walk;
