pub mod bot;
pub mod command_log;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod map;
pub mod pathfinding;
pub mod widget;

pub use bot::{Bot, BotAnimator, BotState};
pub use editor::{DragSession, EditController, PaintAction, Tool, Visibility};
pub use error::{MapperError, MapperResult};
pub use grid::{Cell, Grid, Position};
pub use map::TileMap;
pub use pathfinding::solve;
pub use widget::{Command, PathStatus, Snapshot, TileMapper, WidgetSetup};
