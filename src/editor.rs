use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::grid::{Cell, Position};
use crate::map::TileMap;

/// Default on-screen fraction that triggers the one-shot auto expand
pub const DEFAULT_AUTO_EXPAND_THRESHOLD: f32 = 0.3;

/// Which paint action a drag session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// The first tile touched decides: wall starts an erase, floor starts a draw
    #[default]
    Toggle,
    /// Always paint walls
    Wall,
    /// Always paint floor
    Floor,
}

/// The edit a drag session applies to every tile it crosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintAction {
    /// Paint walls
    Draw,
    /// Paint floor
    Erase,
}

impl PaintAction {
    pub fn cell(self) -> Cell {
        match self {
            PaintAction::Draw => Cell::Wall,
            PaintAction::Erase => Cell::Floor,
        }
    }
}

/// One press-and-drag stroke. The action is fixed when the session starts and
/// never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub action: PaintAction,
    /// Last tile painted, so repeated moves inside one tile do nothing
    pub last: Option<Position>,
}

/// Turns pointer input into grid edits
#[derive(Debug, Clone, Default)]
pub struct EditController {
    tool: Tool,
    session: Option<DragSession>,
}

impl EditController {
    pub fn new(tool: Tool) -> Self {
        EditController { tool, session: None }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switching tools only affects the next session
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Pointer pressed over `pos`. Starts a session and paints the first tile.
    /// Returns true if the grid changed.
    ///
    /// Pressing outside the grid starts nothing.
    pub fn begin(&mut self, map: &mut TileMap, pos: Position) -> bool {
        let Some(cell) = map.get_cell(pos) else {
            return false;
        };
        let action = match self.tool {
            Tool::Toggle => match cell {
                Cell::Wall => PaintAction::Erase,
                Cell::Floor => PaintAction::Draw,
            },
            Tool::Wall => PaintAction::Draw,
            Tool::Floor => PaintAction::Erase,
        };
        debug!(?action, x = pos.x, y = pos.y, "drag started");
        self.session = Some(DragSession { action, last: None });
        self.paint(map, pos)
    }

    /// Pointer moved over `pos` while pressed. Returns true if the grid
    /// changed.
    pub fn paint(&mut self, map: &mut TileMap, pos: Position) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !map.grid().in_bounds(pos) || session.last == Some(pos) {
            return false;
        }
        session.last = Some(pos);
        map.set_cell(pos, session.action.cell())
    }

    /// Pointer released anywhere
    pub fn end(&mut self) {
        if self.session.take().is_some() {
            debug!("drag ended");
        }
    }
}

/// Collapsed/expanded state of the widget, with the one-shot auto expand
#[derive(Debug, Clone)]
pub struct Visibility {
    collapsed: bool,
    auto_expand_threshold: f32,
    /// Set once the viewport signal has fired; later signals are ignored
    observer_disconnected: bool,
}

impl Visibility {
    pub fn new(start_collapsed: bool, auto_expand_threshold: f32) -> Self {
        Visibility {
            collapsed: start_collapsed,
            auto_expand_threshold,
            observer_disconnected: false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
        info!(collapsed = self.collapsed, "visibility toggled");
    }

    /// The widget is `ratio` visible in the viewport. The first time it
    /// reaches the threshold a collapsed widget expands, and the observer
    /// stops listening for good. Returns true if the widget expanded.
    pub fn viewport_visible(&mut self, ratio: f32) -> bool {
        if self.observer_disconnected || ratio < self.auto_expand_threshold {
            return false;
        }
        self.observer_disconnected = true;
        if self.collapsed {
            self.toggle();
            return true;
        }
        false
    }

    pub fn observer_disconnected(&self) -> bool {
        self.observer_disconnected
    }
}

/// Map a pointer position in pixels to a tile coordinate.
///
/// The result may be out of bounds (including negative); callers hand it to
/// bounds-checked operations.
pub fn tile_at(px: f32, py: f32, origin: (f32, f32), tile_size: f32) -> Position {
    Position::new(
        ((px - origin.0) / tile_size).floor() as i32,
        ((py - origin.1) / tile_size).floor() as i32,
    )
}
