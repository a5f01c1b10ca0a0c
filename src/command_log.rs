use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::error::MapperResult;
use crate::widget::{Command, TileMapper, WidgetSetup};

/// Command with the time it was applied
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedCommand {
    /// Milliseconds since the log was started
    pub timestamp_ms: u64,
    pub command: Command,
}

/// Saved session: the setup that built the widget plus every command applied
/// to it, in order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandLog {
    pub setup: WidgetSetup,
    pub commands: Vec<LoggedCommand>,
}

impl CommandLog {
    /// Load a log from a JSON file. The setup is validated before it can be
    /// replayed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MapperResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let log: CommandLog = serde_json::from_str(&json)?;
        log.setup.validate()?;
        Ok(log)
    }

    /// Save the log to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> MapperResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        info!(
            path = %path.as_ref().display(),
            commands = self.commands.len(),
            "Command log saved"
        );
        Ok(())
    }

    /// Rebuild the widget from the setup and apply every command in order
    pub fn replay(&self) -> TileMapper {
        let mut widget = TileMapper::new(self.setup.clone());
        for logged in &self.commands {
            widget.apply(&logged.command);
        }
        widget
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut drags = 0;
        let mut paints = 0;
        let mut resets = 0;
        let mut toggles = 0;
        let mut ticks = 0;

        for logged in &self.commands {
            match logged.command {
                Command::BeginDrag { .. } => drags += 1,
                Command::PaintCell { .. } => paints += 1,
                Command::ResetGrid => resets += 1,
                Command::ToggleVisibility => toggles += 1,
                Command::Tick => ticks += 1,
                _ => {}
            }
        }

        let duration = self.commands.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Commands: {}\n\
             Grid Edits: {} drags, {} painted tiles, {} resets\n\
             Widget: {} visibility toggles, {} bot ticks",
            duration,
            self.commands.len(),
            drags,
            paints,
            resets,
            toggles,
            ticks
        )
    }
}

/// Wraps a widget and records every command applied through it
pub struct CommandRecorder {
    start_time: Instant,
    log: CommandLog,
}

impl CommandRecorder {
    pub fn new(setup: WidgetSetup) -> Self {
        CommandRecorder {
            start_time: Instant::now(),
            log: CommandLog {
                setup,
                commands: Vec::new(),
            },
        }
    }

    /// Apply a command to the widget and log it with the current timestamp
    pub fn apply(&mut self, widget: &mut TileMapper, command: Command) {
        widget.apply(&command);
        self.record(command);
    }

    pub fn record(&mut self, command: Command) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.log.commands.push(LoggedCommand {
            timestamp_ms,
            command,
        });
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    pub fn into_log(self) -> CommandLog {
        self.log
    }
}
