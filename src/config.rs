use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{MapperError, MapperResult};
use crate::grid::Position;
use crate::widget::WidgetSetup;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default = "default_wall_probability")]
    pub wall_probability: f64,
    /// Fixed RNG seed; a fresh one is drawn each run when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_start")]
    pub start: [i32; 2],
    /// Defaults to the tile diagonally inside the bottom-right corner
    #[serde(default)]
    pub goal: Option<[i32; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_start_collapsed")]
    pub start_collapsed: bool,
    #[serde(default = "default_auto_expand_threshold")]
    pub auto_expand_threshold: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    #[serde(default = "default_floor")]
    pub floor: [u8; 3],
    #[serde(default = "default_wall")]
    pub wall: [u8; 3],
    #[serde(default = "default_grid_line")]
    pub grid_line: [u8; 3],
    #[serde(default = "default_start_color")]
    pub start: [u8; 3],
    #[serde(default = "default_goal_color")]
    pub goal: [u8; 3],
    #[serde(default = "default_path_color")]
    pub path: [u8; 3],
    #[serde(default = "default_bot_color")]
    pub bot: [u8; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_enable_command_log")]
    pub enable_command_log: bool,
    #[serde(default = "default_command_log_path")]
    pub command_log_path: String,
}

// Default values
fn default_cols() -> i32 { 12 }
fn default_rows() -> i32 { 10 }
fn default_tile_size() -> f32 { 24.0 }
fn default_wall_probability() -> f64 { crate::map::DEFAULT_WALL_PROBABILITY }
fn default_start() -> [i32; 2] { [1, 1] }
fn default_step_interval_ms() -> u64 { 200 }
fn default_start_collapsed() -> bool { true }
fn default_auto_expand_threshold() -> f32 { crate::editor::DEFAULT_AUTO_EXPAND_THRESHOLD }
fn default_window_title() -> String { "Tile Mapper".to_string() }
fn default_background() -> [u8; 3] { [17, 17, 17] }
fn default_floor() -> [u8; 3] { [34, 34, 34] }
fn default_wall() -> [u8; 3] { [85, 85, 85] }
fn default_grid_line() -> [u8; 3] { [51, 51, 51] }
fn default_start_color() -> [u8; 3] { [39, 201, 63] }
fn default_goal_color() -> [u8; 3] { [255, 95, 86] }
fn default_path_color() -> [u8; 3] { [68, 204, 204] }
fn default_bot_color() -> [u8; 3] { [255, 255, 255] }
fn default_level() -> String { "info".to_string() }
fn default_enable_command_log() -> bool { true }
fn default_command_log_path() -> String { "command_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            tile_size: default_tile_size(),
            wall_probability: default_wall_probability(),
            seed: None,
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            goal: None,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval_ms(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            start_collapsed: default_start_collapsed(),
            auto_expand_threshold: default_auto_expand_threshold(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background: default_background(),
            floor: default_floor(),
            wall: default_wall(),
            grid_line: default_grid_line(),
            start: default_start_color(),
            goal: default_goal_color(),
            path: default_path_color(),
            bot: default_bot_color(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            enable_command_log: default_enable_command_log(),
            command_log_path: default_command_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            endpoints: EndpointsConfig::default(),
            bot: BotConfig::default(),
            widget: WidgetConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `config.toml`, or use defaults if the file is
    /// missing or unusable
    pub fn load() -> Self {
        if !Path::new(CONFIG_PATH).exists() {
            info!("No {} found, using default configuration", CONFIG_PATH);
            return Config::default();
        }
        match Self::load_from(CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded configuration from {}", CONFIG_PATH);
                config
            }
            Err(e) => {
                warn!("Failed to load {}: {}", CONFIG_PATH, e);
                warn!("Using default configuration");
                Config::default()
            }
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from<P: AsRef<Path>>(path: P) -> MapperResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> MapperResult<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn start(&self) -> Position {
        Position::new(self.endpoints.start[0], self.endpoints.start[1])
    }

    pub fn goal(&self) -> Position {
        match self.endpoints.goal {
            Some([x, y]) => Position::new(x, y),
            None => Position::new(self.grid.cols.saturating_sub(2), self.grid.rows.saturating_sub(2)),
        }
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.bot.step_interval_ms)
    }

    /// Reject settings that would break the grid invariants
    pub fn validate(&self) -> MapperResult<()> {
        if self.grid.tile_size <= 0.0 {
            return Err(MapperError::InvalidConfig("tile_size must be positive".to_string()));
        }
        WidgetSetup::with_seed(self, self.grid.seed.unwrap_or_default()).validate()
    }
}
