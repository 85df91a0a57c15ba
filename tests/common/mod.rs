//! Shared scenario builders and graph assertions for the end-to-end tests.

#![allow(dead_code)]

use simgit::{BranchId, Color, CommitId, EdgeKinds, Repository};
use std::collections::{HashMap, HashSet};

pub const GRAY: &str = "#808080";
pub const BLUE: &str = "#007fff";
pub const AMBER: &str = "#ffb900";

pub fn color(hex: &str) -> Color {
    hex.parse().unwrap()
}

/// master with the two commits every scenario starts from.
pub fn seeded() -> (Repository, BranchId) {
    let mut repository = Repository::new();
    let master = repository.branch("master", None, color(GRAY)).unwrap();
    repository.commit(master, "First commit");
    repository.commit(master, "Original branch point for feature");
    (repository, master)
}

/// Commits reachable from `branch` through parent edges.
pub fn reachable(repository: &Repository, branch: BranchId) -> HashSet<CommitId> {
    repository.active_commits(&[branch])
}

/// Messages of the commits reachable from `branch`, as a multiset.
pub fn reachable_messages(repository: &Repository, branch: BranchId) -> Vec<String> {
    let mut messages: Vec<String> = reachable(repository, branch)
        .iter()
        .map(|id| repository.find_commit(id).unwrap().message().to_string())
        .collect();
    messages.sort();
    messages
}

/// The single reachable commit on `branch` carrying `message`.
pub fn only_with_message(repository: &Repository, branch: BranchId, message: &str) -> CommitId {
    let matches: Vec<CommitId> = reachable(repository, branch)
        .into_iter()
        .filter(|id| repository.find_commit(id).unwrap().message() == message)
        .collect();
    assert_eq!(
        matches.len(),
        1,
        "expected exactly one reachable commit with message {message:?}"
    );
    matches.into_iter().next().unwrap()
}

/// Structural checks that hold for every history: each commit appears once
/// in a traversal, parents come before children, the layout places every
/// parent strictly left of each of its children, and no two commits share
/// a cell.
pub fn assert_well_formed(repository: &Repository) {
    let order = repository.traverse(EdgeKinds::all());
    let positions: HashMap<&CommitId, usize> =
        order.iter().enumerate().map(|(at, id)| (id, at)).collect();
    assert_eq!(positions.len(), order.len(), "a commit was visited twice");
    for id in &order {
        for parent in repository.find_commit(id).unwrap().parents() {
            assert!(
                positions[parent] < positions[id],
                "parent {parent} visited after its child {id}"
            );
        }
    }

    let layout = repository.place();
    let mut occupied: HashMap<(usize, usize), &CommitId> = HashMap::new();
    for (id, placement) in layout.iter() {
        for parent in repository.find_commit(id).unwrap().parents() {
            let parent_placement = layout.placement(parent).unwrap();
            assert!(
                parent_placement.column() < placement.column(),
                "parent {parent} is not left of its child {id}"
            );
        }
        if let Some(other) = occupied.insert((placement.lane(), placement.column()), id) {
            panic!(
                "{other} and {id} share lane {}, column {}",
                placement.lane(),
                placement.column()
            );
        }
    }
}
