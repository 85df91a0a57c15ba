//! Two-dimensional graph layout
//!
//! Assigns every commit a lane (vertical track) and a column (horizontal
//! slot) so a renderer can draw the graph without overlaps. Placement is a
//! pure function of the graph: two identical histories always produce
//! identical layouts.
//!
//! Lanes come first, from a walk that follows parent and ancestor edges
//! but not `replaces` edges, so superseded branches settle below the
//! active ones. Columns come second, from a walk that follows all three
//! edge kinds: each commit lands one column right of its rightmost
//! predecessor, and parents are then pulled toward their children when the
//! gap in their lane is free.

use crate::areas::repository::Repository;
use crate::artifacts::log::walk::EdgeKinds;
use crate::artifacts::objects::commit_id::CommitId;
use derive_new::new;
use std::collections::HashMap;

/// Macro for debug logging that is enabled with the debug_layout feature flag
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_layout")]
        {
            eprintln!($($arg)*);
        }
    };
}

/// A commit's position: lane is the vertical track, column the horizontal
/// slot. Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Placement {
    lane: usize,
    column: usize,
}

impl Placement {
    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// Complete placement of one repository's graph
#[derive(Debug, new)]
pub struct Layout {
    placements: HashMap<CommitId, Placement>,
    cells: HashMap<(usize, usize), CommitId>,
}

impl Layout {
    pub fn placement(&self, id: &CommitId) -> Option<Placement> {
        self.placements.get(id).copied()
    }

    /// Occupant of the given (lane, column) cell, if any.
    pub fn at(&self, lane: usize, column: usize) -> Option<&CommitId> {
        self.cells.get(&(lane, column))
    }

    /// Number of lanes in use (the highest assigned lane).
    pub fn lanes(&self) -> usize {
        self.placements
            .values()
            .map(Placement::lane)
            .max()
            .unwrap_or(0)
    }

    /// Width of the layout (the highest assigned column).
    pub fn columns(&self) -> usize {
        self.placements
            .values()
            .map(Placement::column)
            .max()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CommitId, &Placement)> {
        self.placements.iter()
    }
}

impl Repository {
    /// Compute the layout of the whole reachable graph.
    pub fn place(&self) -> Layout {
        let lanes = self.assign_lanes();
        self.assign_columns(&lanes)
    }

    /// Lane pass. Follows parent and ancestor edges only, so branches made
    /// obsolete by a rewrite appear below the branches that replaced them.
    fn assign_lanes(&self) -> HashMap<CommitId, usize> {
        let mut lanes: HashMap<CommitId, usize> = HashMap::new();
        let mut lane = 1;
        let mut last: Option<CommitId> = None;

        for id in self.traverse(EdgeKinds::PARENTS | EdgeKinds::ANCESTORS) {
            let commit = self.node(&id);
            if commit.is_root() {
                // Every root opens a lane of its own; only the very first
                // commit of the walk takes the initial one.
                if last.is_some() {
                    lane += 1;
                }
                lanes.insert(id.clone(), lane);
            } else {
                // A new lane starts wherever the walk jumps to a commit
                // that does not extend the one just visited, or where the
                // branch color changes.
                let extends_last = last
                    .as_ref()
                    .is_some_and(|previous| commit.parents().contains(previous));
                if extends_last {
                    if commit.color() != self.node(&commit.parents()[0]).color() {
                        lane += 1;
                    }
                } else {
                    lane += 1;
                }
                lanes.insert(id.clone(), lane);
            }
            last = Some(id);
        }

        lanes
    }

    /// Column pass. Each commit lands one column right of its rightmost
    /// parent or replaced revision; afterwards parents are pulled toward
    /// the commit when their lane has no occupant in between.
    fn assign_columns(&self, lanes: &HashMap<CommitId, usize>) -> Layout {
        let mut columns: HashMap<CommitId, usize> = HashMap::new();
        // Tightest right bound seen for each commit across all its
        // children, so pulling never crosses a later child.
        let mut bounds: HashMap<CommitId, usize> = HashMap::new();
        // Occupancy is checked against the position each commit was first
        // placed at; pulled parents keep their original cell reserved.
        let mut grid: HashMap<(usize, usize), CommitId> = HashMap::new();

        let order =
            self.traverse(EdgeKinds::PARENTS | EdgeKinds::ANCESTORS | EdgeKinds::REPLACES);
        for id in order {
            let commit = self.node(&id);
            let column = if commit.is_root() {
                1
            } else {
                commit
                    .parents()
                    .iter()
                    .chain(commit.replaces().iter())
                    .filter_map(|predecessor| columns.get(predecessor))
                    .max()
                    .map_or(1, |rightmost| rightmost + 1)
            };
            let lane = lanes.get(&id).copied().unwrap_or(0);
            columns.insert(id.clone(), column);
            grid.insert((lane, column), id.clone());
            debug_log!("placing {} at lane {}, column {}", id.to_short_id(), lane, column);

            for parent in commit.parents() {
                let bound = bounds.entry(parent.clone()).or_insert(usize::MAX);
                *bound = (*bound).min(column - 1);
            }
            for parent in commit.parents() {
                let Some(parent_column) = columns.get(parent).copied() else {
                    continue;
                };
                let parent_lane = lanes.get(parent).copied().unwrap_or(0);
                let blocked = (parent_column + 1..column)
                    .any(|between| grid.contains_key(&(parent_lane, between)));
                if !blocked {
                    let bound = bounds.get(parent).copied().unwrap_or(usize::MAX);
                    columns.insert(parent.clone(), (column - 1).min(bound));
                }
            }
        }

        let mut placements = HashMap::new();
        let mut cells = HashMap::new();
        for (id, column) in columns {
            let lane = lanes.get(&id).copied().unwrap_or(0);
            placements.insert(id.clone(), Placement::new(lane, column));
            cells.insert((lane, column), id);
        }
        Layout::new(placements, cells)
    }
}
