#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tile_mapper::{Grid, Position, TileMap, WidgetSetup};

/// Grid fixture parsed from the standard text format
/// - S: start
/// - G: goal
/// - ■: wall
/// - □: floor
/// - o: floor on the expected shortest path
#[derive(Debug, Clone)]
pub struct Fixture {
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
    /// Expected path tiles, endpoints included; empty when no path is expected
    pub expected_path: HashSet<Position>,
}

impl Fixture {
    pub fn map(&self) -> TileMap {
        TileMap::from_grid(self.grid.clone(), self.start, self.goal)
    }

    pub fn expects_path(&self) -> bool {
        !self.expected_path.is_empty()
    }
}

/// Parse a fixture from text
pub fn parse_fixture(text: &str) -> Result<Fixture, Box<dyn std::error::Error>> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err("No non-empty lines found in fixture".into());
    }

    let cols = lines[0].chars().count() as i32;
    let rows = lines.len() as i32;

    let mut walls = Vec::new();
    let mut start = None;
    let mut goal = None;
    let mut path_tiles = HashSet::new();

    for (y, line) in lines.iter().enumerate() {
        if line.chars().count() as i32 != cols {
            return Err(format!("Row {} has a different width", y).into());
        }
        for (x, ch) in line.chars().enumerate() {
            let pos = Position::new(x as i32, y as i32);
            match ch {
                'S' => start = Some(pos),
                'G' => goal = Some(pos),
                '■' => walls.push(pos),
                'o' => {
                    path_tiles.insert(pos);
                }
                '□' => {}
                other => return Err(format!("Unknown character {:?} in fixture", other).into()),
            }
        }
    }

    let start = start.ok_or("No start 'S' found in fixture")?;
    let goal = goal.ok_or("No goal 'G' found in fixture")?;

    let adjacent = start.is_adjacent(&goal);
    let mut expected_path = HashSet::new();
    if !path_tiles.is_empty() || adjacent {
        expected_path = path_tiles;
        expected_path.insert(start);
        expected_path.insert(goal);
    }

    Ok(Fixture {
        grid: Grid::with_walls(cols, rows, &walls),
        start,
        goal,
        expected_path,
    })
}

/// Load a fixture file
pub fn load_fixture(path: &Path) -> Result<Fixture, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    parse_fixture(&contents)
}

fn flip_fixture(fixture: &Fixture, flip: impl Fn(Position) -> Position) -> Fixture {
    let walls: Vec<Position> = fixture
        .grid
        .positions()
        .filter(|&p| fixture.grid.is_blocked(p))
        .map(&flip)
        .collect();

    Fixture {
        grid: Grid::with_walls(fixture.grid.cols, fixture.grid.rows, &walls),
        start: flip(fixture.start),
        goal: flip(fixture.goal),
        expected_path: fixture.expected_path.iter().map(|&p| flip(p)).collect(),
    }
}

/// Flip fixture horizontally (mirror left-right)
pub fn flip_horizontal(fixture: &Fixture) -> Fixture {
    let cols = fixture.grid.cols;
    flip_fixture(fixture, |p| Position::new(cols - 1 - p.x, p.y))
}

/// Flip fixture vertically (mirror top-bottom)
pub fn flip_vertical(fixture: &Fixture) -> Fixture {
    let rows = fixture.grid.rows;
    flip_fixture(fixture, |p| Position::new(p.x, rows - 1 - p.y))
}

/// Flip fixture both horizontally and vertically
pub fn flip_both(fixture: &Fixture) -> Fixture {
    flip_vertical(&flip_horizontal(fixture))
}

/// All four orientations of a fixture, labelled
pub fn variants(fixture: &Fixture) -> Vec<(&'static str, Fixture)> {
    vec![
        ("original", fixture.clone()),
        ("h_flip", flip_horizontal(fixture)),
        ("v_flip", flip_vertical(fixture)),
        ("hv_flip", flip_both(fixture)),
    ]
}

/// Visualize a path on a grid
pub fn visualize_path(grid: &Grid, path: &[Position], start: Position, goal: Position) -> String {
    let mut result = String::new();
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let pos = Position::new(x, y);
            let symbol = if pos == start {
                'S'
            } else if pos == goal {
                'G'
            } else if path.contains(&pos) {
                'o'
            } else if grid.is_blocked(pos) {
                '■'
            } else {
                '□'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}

/// Breadth-first distance from `start` to `goal` computed independently of
/// the solver, for cross-checking path lengths
pub fn reference_distance(grid: &Grid, start: Position, goal: Position) -> Option<usize> {
    let mut frontier = vec![start];
    let mut seen: HashSet<Position> = frontier.iter().copied().collect();
    let mut distance = 0;
    while !frontier.is_empty() {
        if frontier.contains(&goal) {
            return Some(distance);
        }
        let mut next = Vec::new();
        for pos in frontier {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let n = Position::new(pos.x + dx, pos.y + dy);
                if grid.is_walkable(n) && seen.insert(n) {
                    next.push(n);
                }
            }
        }
        frontier = next;
        distance += 1;
    }
    None
}

/// Setup for a widget with the reference 12x10 layout
pub fn reference_setup(seed: u64) -> WidgetSetup {
    WidgetSetup {
        cols: 12,
        rows: 10,
        start: Position::new(1, 1),
        goal: Position::new(10, 8),
        wall_probability: 0.2,
        seed,
        step_interval_ms: 200,
        start_collapsed: false,
        auto_expand_threshold: 0.3,
    }
}

/// Setup for a widget that will be given a fixture map
pub fn fixture_setup(fixture: &Fixture) -> WidgetSetup {
    WidgetSetup {
        cols: fixture.grid.cols,
        rows: fixture.grid.rows,
        start: fixture.start,
        goal: fixture.goal,
        wall_probability: 0.0,
        seed: 0,
        step_interval_ms: 200,
        start_collapsed: false,
        auto_expand_threshold: 0.3,
    }
}
