use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::bot::{BotAnimator, BotState};
use crate::config::Config;
use crate::editor::{EditController, Tool, Visibility};
use crate::error::{MapperError, MapperResult};
use crate::grid::{Grid, Position, MAX_GRID_DIM};
use crate::map::TileMap;
use crate::pathfinding::solve;

/// A discrete input applied to the widget.
///
/// Pointer positions are already in tile coordinates and may be out of
/// bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Pointer pressed over a tile
    BeginDrag { x: i32, y: i32 },
    /// Pointer moved over a tile while pressed
    PaintCell { x: i32, y: i32 },
    /// Pointer released anywhere
    EndDrag,
    /// Pick the tool used by the next drag
    SelectTool { tool: Tool },
    /// Regenerate the grid
    ResetGrid,
    /// Collapse or expand the widget
    ToggleVisibility,
    /// Viewport reports what fraction of the widget is on screen
    ViewportVisible { ratio: f32 },
    /// Advance the bot by one step
    Tick,
}

/// Status indicator derived from the current path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStatus {
    Found,
    Blocked,
}

/// Everything the renderer reads each frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub start: Position,
    pub goal: Position,
    pub path: Option<&'a [Position]>,
    pub bot: Position,
    pub status: PathStatus,
    pub collapsed: bool,
}

impl Snapshot<'_> {
    /// Render the snapshot as text, one line per row.
    ///
    /// `S` start, `G` goal, `b` bot, `o` path, `■` wall, `□` floor. Endpoints
    /// win over the bot, the bot wins over the path.
    pub fn to_ascii(&self) -> String {
        let mut result = String::new();
        for y in 0..self.grid.rows {
            for x in 0..self.grid.cols {
                let pos = Position::new(x, y);
                let symbol = if pos == self.start {
                    'S'
                } else if pos == self.goal {
                    'G'
                } else if pos == self.bot {
                    'b'
                } else if self.path.is_some_and(|p| p.contains(&pos)) {
                    'o'
                } else if self.grid.is_blocked(pos) {
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
}

/// Setup needed to rebuild a widget exactly, including its RNG
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetSetup {
    pub cols: i32,
    pub rows: i32,
    pub start: Position,
    pub goal: Position,
    pub wall_probability: f64,
    pub seed: u64,
    pub step_interval_ms: u64,
    pub start_collapsed: bool,
    pub auto_expand_threshold: f32,
}

impl WidgetSetup {
    /// Setup from a validated config. A random seed is drawn if the config
    /// does not fix one.
    pub fn from_config(config: &Config) -> Self {
        Self::with_seed(config, config.grid.seed.unwrap_or_else(rand::random))
    }

    pub fn with_seed(config: &Config, seed: u64) -> Self {
        WidgetSetup {
            cols: config.grid.cols,
            rows: config.grid.rows,
            start: config.start(),
            goal: config.goal(),
            wall_probability: config.grid.wall_probability,
            seed,
            step_interval_ms: config.bot.step_interval_ms,
            start_collapsed: config.widget.start_collapsed,
            auto_expand_threshold: config.widget.auto_expand_threshold,
        }
    }

    /// Reject setups that would break the grid invariants or could not be
    /// allocated
    pub fn validate(&self) -> MapperResult<()> {
        let (cols, rows) = (self.cols, self.rows);
        if !(3..=MAX_GRID_DIM).contains(&cols) || !(3..=MAX_GRID_DIM).contains(&rows) {
            return Err(MapperError::InvalidConfig(format!(
                "grid must be between 3x3 and {max}x{max}, got {}x{}",
                cols,
                rows,
                max = MAX_GRID_DIM
            )));
        }
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(MapperError::InvalidConfig(format!(
                "wall_probability must be within [0, 1], got {}",
                self.wall_probability
            )));
        }
        if self.step_interval_ms == 0 {
            return Err(MapperError::InvalidConfig("step_interval_ms must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.auto_expand_threshold) {
            return Err(MapperError::InvalidConfig(format!(
                "auto_expand_threshold must be within [0, 1], got {}",
                self.auto_expand_threshold
            )));
        }

        let inside = |p: Position| p.x > 0 && p.x < cols - 1 && p.y > 0 && p.y < rows - 1;
        for (name, pos) in [("start", self.start), ("goal", self.goal)] {
            if !inside(pos) {
                return Err(MapperError::InvalidConfig(format!(
                    "{} ({},{}) must lie strictly inside the border",
                    name, pos.x, pos.y
                )));
            }
        }
        if self.start == self.goal {
            return Err(MapperError::InvalidConfig("start and goal must differ".to_string()));
        }
        Ok(())
    }
}

/// The whole tile mapper: level, solver output, bot, and editing state.
///
/// All input arrives through [`TileMapper::apply`], which runs each command
/// to completion, so the path is always current for the grid when the next
/// frame reads a [`Snapshot`].
pub struct TileMapper {
    setup: WidgetSetup,
    map: TileMap,
    path: Option<Vec<Position>>,
    animator: BotAnimator,
    editor: EditController,
    visibility: Visibility,
    rng: SmallRng,
}

impl TileMapper {
    /// Build a widget with a freshly generated grid
    pub fn new(setup: WidgetSetup) -> Self {
        let mut rng = SmallRng::seed_from_u64(setup.seed);
        let mut map = TileMap::new(setup.cols, setup.rows, setup.start, setup.goal, setup.wall_probability);
        map.initialize(&mut rng);
        Self::assemble(setup, map, rng)
    }

    /// Build a widget around an existing map, skipping random generation.
    /// A later [`Command::ResetGrid`] still uses the setup's seed.
    pub fn with_map(setup: WidgetSetup, map: TileMap) -> Self {
        let rng = SmallRng::seed_from_u64(setup.seed);
        Self::assemble(setup, map, rng)
    }

    fn assemble(setup: WidgetSetup, map: TileMap, rng: SmallRng) -> Self {
        let animator = BotAnimator::new(map.start(), Duration::from_millis(setup.step_interval_ms));
        let visibility = Visibility::new(setup.start_collapsed, setup.auto_expand_threshold);
        let mut widget = TileMapper {
            setup,
            map,
            path: None,
            animator,
            editor: EditController::default(),
            visibility,
            rng,
        };
        widget.update_path();
        widget
    }

    /// Apply one command synchronously
    pub fn apply(&mut self, command: &Command) {
        match *command {
            Command::BeginDrag { x, y } => {
                if self.editor.begin(&mut self.map, Position::new(x, y)) {
                    self.update_path();
                }
            }
            Command::PaintCell { x, y } => {
                if self.editor.paint(&mut self.map, Position::new(x, y)) {
                    self.update_path();
                }
            }
            Command::EndDrag => self.editor.end(),
            Command::SelectTool { tool } => {
                debug!(?tool, "tool selected");
                self.editor.set_tool(tool);
            }
            Command::ResetGrid => self.reset(),
            Command::ToggleVisibility => self.visibility.toggle(),
            Command::ViewportVisible { ratio } => {
                if self.visibility.viewport_visible(ratio) {
                    info!(ratio, "auto expanded");
                }
            }
            Command::Tick => self.animator.tick(self.path.as_deref()),
        }
    }

    /// Frame hook: steps the bot if its interval has elapsed. Ticking is
    /// suspended while collapsed. Returns true if the bot moved.
    pub fn update(&mut self, now: f64) -> bool {
        if self.visibility.is_collapsed() {
            return false;
        }
        self.animator.update(now, self.path.as_deref())
    }

    fn reset(&mut self) {
        self.editor.end();
        self.map.initialize(&mut self.rng);
        self.animator.reset();
        self.update_path();
    }

    /// Re-run the solver against the current grid and publish the result
    fn update_path(&mut self) {
        let was_found = self.path.is_some();
        self.path = solve(self.map.grid(), self.map.start(), self.map.goal());
        match (&self.path, was_found) {
            (Some(path), false) => debug!(len = path.len(), "path found"),
            (None, true) => debug!("path blocked"),
            _ => {}
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: self.map.grid(),
            start: self.map.start(),
            goal: self.map.goal(),
            path: self.path.as_deref(),
            bot: self.animator.position(),
            status: self.status(),
            collapsed: self.visibility.is_collapsed(),
        }
    }

    pub fn status(&self) -> PathStatus {
        if self.path.is_some() {
            PathStatus::Found
        } else {
            PathStatus::Blocked
        }
    }

    pub fn path(&self) -> Option<&[Position]> {
        self.path.as_deref()
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn bot_state(&self) -> BotState {
        self.animator.state()
    }

    pub fn bot_index(&self) -> usize {
        self.animator.path_index()
    }

    pub fn bot_position(&self) -> Position {
        self.animator.position()
    }

    pub fn tool(&self) -> Tool {
        self.editor.tool()
    }

    pub fn is_dragging(&self) -> bool {
        self.editor.is_dragging()
    }

    pub fn is_collapsed(&self) -> bool {
        self.visibility.is_collapsed()
    }

    /// False once the one-shot viewport auto expand has fired
    pub fn is_observing_viewport(&self) -> bool {
        !self.visibility.observer_disconnected()
    }

    pub fn setup(&self) -> &WidgetSetup {
        &self.setup
    }
}
