use serde::{Deserialize, Serialize};

/// Largest accepted width or height, in tiles
pub const MAX_GRID_DIM: i32 = 512;

/// State of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Walkable
    #[default]
    Floor,
    /// Blocked
    Wall,
}

impl Cell {
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

/// A tile coordinate on the grid
///
/// Signed so that pointer positions just outside the canvas can be represented
/// and rejected by the bounds checks instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Manhattan distance between two tiles
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True when the two tiles share an edge
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// Occupancy matrix of `cols` x `rows` tiles, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
    cells: Vec<Cell>,
    /// Revision number - incremented whenever grid cells change
    revision: u64,
}

impl Grid {
    /// Create a new grid with every cell set to floor
    pub fn new(cols: i32, rows: i32) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Grid {
            cols,
            rows,
            cells: vec![Cell::Floor; cols as usize * rows as usize],
            revision: 0,
        }
    }

    /// Create a grid whose outer ring is wall and interior is floor
    pub fn bordered(cols: i32, rows: i32) -> Self {
        let mut grid = Self::new(cols, rows);
        for y in 0..grid.rows {
            for x in 0..grid.cols {
                let pos = Position::new(x, y);
                if grid.is_border(pos) {
                    grid.set_cell(pos, Cell::Wall);
                }
            }
        }
        grid
    }

    /// Create a grid with specific wall cells, ignoring any outside the grid
    pub fn with_walls(cols: i32, rows: i32, walls: &[Position]) -> Self {
        let mut grid = Self::new(cols, rows);
        for &pos in walls {
            grid.set_cell(pos, Cell::Wall);
        }
        grid
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// True for cells on the outer ring (row 0, last row, column 0, last column)
    pub fn is_border(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0 || pos.y == 0 || pos.x == self.cols - 1 || pos.y == self.rows - 1)
    }

    /// Convert a position to its index in the backing storage
    pub fn get_id(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.x as usize + pos.y as usize * self.cols as usize)
        } else {
            None
        }
    }

    /// Convert a storage index back to a position
    pub fn get_coords(&self, id: usize) -> Position {
        let id = id as i32;
        Position::new(id % self.cols, id / self.cols)
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn get_cell(&self, pos: Position) -> Option<Cell> {
        self.get_id(pos).map(|id| self.cells[id])
    }

    /// Out of bounds is considered blocked
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get_cell(pos).map_or(true, Cell::is_wall)
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        !self.is_blocked(pos)
    }

    /// Set the cell at `pos`. Returns true if the cell actually changed.
    ///
    /// Only bounds are checked here; border and endpoint protection live in
    /// [`crate::map::TileMap`].
    pub fn set_cell(&mut self, pos: Position, cell: Cell) -> bool {
        let Some(id) = self.get_id(pos) else {
            return false;
        };
        if self.cells[id] == cell {
            return false;
        }
        self.cells[id] = cell;
        self.revision += 1;
        true
    }

    /// Current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Iterate over every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Position::new(x, y)))
    }

    /// Number of cells in the backing storage
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_wall()).count()
    }
}
