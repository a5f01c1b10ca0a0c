use rand::Rng;
use tracing::info;

use crate::grid::{Cell, Grid, Position};

/// Probability that an interior cell starts as wall
pub const DEFAULT_WALL_PROBABILITY: f64 = 0.2;

/// The authoritative level: occupancy grid plus the two fixed endpoints.
///
/// Invariants held after every public operation:
/// - the outer ring of the grid is wall
/// - `start` and `goal` are floor, distinct, and strictly inside the border
#[derive(Debug, Clone)]
pub struct TileMap {
    grid: Grid,
    start: Position,
    goal: Position,
    wall_probability: f64,
}

impl TileMap {
    /// Create a map with border walls only. Call [`TileMap::initialize`] to
    /// scatter interior walls.
    ///
    /// Callers are expected to pass validated endpoints (see
    /// [`crate::config::Config::validate`]).
    pub fn new(cols: i32, rows: i32, start: Position, goal: Position, wall_probability: f64) -> Self {
        let mut map = TileMap {
            grid: Grid::bordered(cols, rows),
            start,
            goal,
            wall_probability: wall_probability.clamp(0.0, 1.0),
        };
        map.clear_endpoints();
        map
    }

    /// Build a map around an existing grid. The border and endpoints are
    /// forced back into their invariant state.
    pub fn from_grid(mut grid: Grid, start: Position, goal: Position) -> Self {
        for pos in grid.positions().collect::<Vec<_>>() {
            if grid.is_border(pos) {
                grid.set_cell(pos, Cell::Wall);
            }
        }
        let mut map = TileMap {
            grid,
            start,
            goal,
            wall_probability: DEFAULT_WALL_PROBABILITY,
        };
        map.clear_endpoints();
        map
    }

    /// Regenerate the whole grid: border walls, random interior walls, then
    /// floor under the endpoints.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut grid = Grid::bordered(self.grid.cols, self.grid.rows);
        for pos in grid.positions().collect::<Vec<_>>() {
            if !grid.is_border(pos) && rng.random_bool(self.wall_probability) {
                grid.set_cell(pos, Cell::Wall);
            }
        }
        self.grid = grid;
        self.clear_endpoints();

        info!(
            cols = self.grid.cols,
            rows = self.grid.rows,
            walls = self.grid.wall_count(),
            "Grid initialized"
        );
    }

    fn clear_endpoints(&mut self) {
        self.grid.set_cell(self.start, Cell::Floor);
        self.grid.set_cell(self.goal, Cell::Floor);
    }

    /// True if the tile may be changed by an edit tool
    pub fn is_editable(&self, pos: Position) -> bool {
        self.grid.in_bounds(pos) && !self.grid.is_border(pos) && pos != self.start && pos != self.goal
    }

    /// Set a cell from an edit tool. Out of bounds, border, and endpoint cells
    /// are silently left alone. Returns true if the grid changed.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) -> bool {
        if !self.is_editable(pos) {
            return false;
        }
        self.grid.set_cell(pos, cell)
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn get_cell(&self, pos: Position) -> Option<Cell> {
        self.grid.get_cell(pos)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }
}
