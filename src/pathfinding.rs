use std::collections::VecDeque;

use tracing::trace;

use crate::grid::{Grid, Position};

/// Expansion order for the breadth-first search: up, down, left, right.
///
/// Among several shortest paths the one found first under this order wins,
/// which keeps results reproducible.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Walkable 4-neighbours of `pos`, in [`NEIGHBOR_OFFSETS`] order
pub fn walkable_neighbors(grid: &Grid, pos: Position) -> impl Iterator<Item = Position> + '_ {
    NEIGHBOR_OFFSETS
        .iter()
        .map(move |&(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
        .filter(move |&next| grid.is_walkable(next))
}

/// Find a shortest 4-connected path from `start` to `goal`.
///
/// Returns the full route including both endpoints, or `None` when the goal
/// cannot be reached (or either endpoint is blocked). An unreachable goal is a
/// normal outcome, not an error.
pub fn solve(grid: &Grid, start: Position, goal: Position) -> Option<Vec<Position>> {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return None;
    }
    let start_id = grid.get_id(start)?;
    let goal_id = grid.get_id(goal)?;

    let cell_count = grid.cell_count();
    let mut visited = vec![false; cell_count];
    // parent[id] is the id the search arrived from; the start has none
    let mut parent: Vec<Option<usize>> = vec![None; cell_count];
    let mut queue = VecDeque::new();

    visited[start_id] = true;
    queue.push_back(start);

    let mut expanded = 0usize;
    while let Some(current) = queue.pop_front() {
        expanded += 1;
        let Some(current_id) = grid.get_id(current) else {
            continue;
        };

        if current_id == goal_id {
            let path = reconstruct_path(grid, &parent, goal_id);
            trace!(expanded, len = path.len(), "path found");
            return Some(path);
        }

        for next in walkable_neighbors(grid, current) {
            let Some(next_id) = grid.get_id(next) else {
                continue;
            };
            if visited[next_id] {
                continue;
            }
            visited[next_id] = true;
            parent[next_id] = Some(current_id);
            queue.push_back(next);
        }
    }

    trace!(expanded, "goal unreachable");
    None
}

fn reconstruct_path(grid: &Grid, parent: &[Option<usize>], goal_id: usize) -> Vec<Position> {
    let mut path = vec![grid.get_coords(goal_id)];
    let mut current = goal_id;
    while let Some(prev) = parent[current] {
        path.push(grid.get_coords(prev));
        current = prev;
    }
    path.reverse();
    path
}

/// Check that `path` is a usable route on `grid`: it runs from `start` to
/// `goal`, every step moves exactly one tile along one axis, every tile is
/// floor, and no tile repeats.
pub fn is_valid_path(grid: &Grid, path: &[Position], start: Position, goal: Position) -> bool {
    if path.first() != Some(&start) || path.last() != Some(&goal) {
        return false;
    }
    if path.iter().any(|&p| grid.is_blocked(p)) {
        return false;
    }
    if !path.windows(2).all(|w| w[0].is_adjacent(&w[1])) {
        return false;
    }
    let mut seen = std::collections::HashSet::with_capacity(path.len());
    path.iter().all(|p| seen.insert(*p))
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|pos| format!("({},{})", pos.x, pos.y))
        .collect::<Vec<_>>()
        .join(" -> ")
}
