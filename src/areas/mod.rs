//! Aggregate roots
//!
//! - `repository`: owns every commit and branch of one simulation

pub mod repository;
