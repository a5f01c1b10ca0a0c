use macroquad::prelude::*;
use tile_mapper::command_log::CommandRecorder;
use tile_mapper::config::{Config, VisualConfig, CONFIG_PATH};
use tile_mapper::editor::tile_at;
use tile_mapper::{Command, PathStatus, Position, Snapshot, TileMapper, Tool, WidgetSetup};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MARGIN: f32 = 20.0;
const HEADER_HEIGHT: f32 = 28.0;
const INFO_HEIGHT: f32 = 110.0;

/// Screen placement of the widget
struct Layout {
    origin: (f32, f32),
    tile_size: f32,
    width: f32,
    height: f32,
}

impl Layout {
    fn new(config: &Config) -> Self {
        let tile_size = config.grid.tile_size;
        Layout {
            origin: (MARGIN, MARGIN + HEADER_HEIGHT),
            tile_size,
            width: config.grid.cols as f32 * tile_size,
            height: config.grid.rows as f32 * tile_size,
        }
    }

    fn header_contains(&self, (mx, my): (f32, f32)) -> bool {
        mx >= MARGIN && mx < MARGIN + self.width && my >= MARGIN && my < MARGIN + HEADER_HEIGHT
    }

    fn canvas_contains(&self, (mx, my): (f32, f32)) -> bool {
        let (ox, oy) = self.origin;
        mx >= ox && mx < ox + self.width && my >= oy && my < oy + self.height
    }

    fn tile_center(&self, pos: Position) -> (f32, f32) {
        (
            self.origin.0 + pos.x as f32 * self.tile_size + self.tile_size / 2.0,
            self.origin.1 + pos.y as f32 * self.tile_size + self.tile_size / 2.0,
        )
    }

    /// Fraction of the widget (header and canvas) inside the window
    fn visible_ratio(&self) -> f32 {
        let (left, top) = (MARGIN, MARGIN);
        let (right, bottom) = (MARGIN + self.width, self.origin.1 + self.height);
        let visible_w = (right.min(screen_width()) - left.max(0.0)).max(0.0);
        let visible_h = (bottom.min(screen_height()) - top.max(0.0)).max(0.0);
        let total = (right - left) * (bottom - top);
        if total <= 0.0 {
            return 0.0;
        }
        visible_w * visible_h / total
    }
}

fn rgb(c: [u8; 3]) -> Color {
    Color::from_rgba(c[0], c[1], c[2], 255)
}

/// Input and frame loop state
struct App {
    widget: TileMapper,
    recorder: CommandRecorder,
    layout: Layout,
    visual: VisualConfig,
    command_log_path: Option<String>,
    /// Tile of the last pointer command sent. Held frames over the same tile
    /// send nothing, so the command log holds one entry per tile entered.
    last_painted: Option<Position>,
}

impl App {
    fn new(config: &Config) -> Self {
        let setup = WidgetSetup::from_config(config);
        info!(seed = setup.seed, "Starting tile mapper");
        let widget = TileMapper::new(setup.clone());
        App {
            widget,
            recorder: CommandRecorder::new(setup),
            layout: Layout::new(config),
            visual: config.visual.clone(),
            command_log_path: config
                .logging
                .enable_command_log
                .then(|| config.logging.command_log_path.clone()),
            last_painted: None,
        }
    }

    fn apply(&mut self, command: Command) {
        self.recorder.apply(&mut self.widget, command);
    }

    fn handle_input(&mut self) {
        let mouse = mouse_position();

        if is_mouse_button_pressed(MouseButton::Left) {
            if self.layout.header_contains(mouse) {
                self.apply(Command::ToggleVisibility);
            } else if !self.widget.is_collapsed() && self.layout.canvas_contains(mouse) {
                let pos = tile_at(mouse.0, mouse.1, self.layout.origin, self.layout.tile_size);
                self.last_painted = Some(pos);
                self.apply(Command::BeginDrag { x: pos.x, y: pos.y });
            }
        } else if is_mouse_button_down(MouseButton::Left) && self.widget.is_dragging() {
            let pos = tile_at(mouse.0, mouse.1, self.layout.origin, self.layout.tile_size);
            if self.last_painted != Some(pos) {
                self.last_painted = Some(pos);
                self.apply(Command::PaintCell { x: pos.x, y: pos.y });
            }
        }

        // Released anywhere, even outside the window
        if is_mouse_button_released(MouseButton::Left) && self.widget.is_dragging() {
            self.last_painted = None;
            self.apply(Command::EndDrag);
        }

        if is_key_pressed(KeyCode::R) {
            self.apply(Command::ResetGrid);
        }
        if is_key_pressed(KeyCode::Space) {
            self.apply(Command::ToggleVisibility);
        }
        if is_key_pressed(KeyCode::T) {
            self.apply(Command::SelectTool { tool: Tool::Toggle });
        }
        if is_key_pressed(KeyCode::W) {
            self.apply(Command::SelectTool { tool: Tool::Wall });
        }
        if is_key_pressed(KeyCode::F) {
            self.apply(Command::SelectTool { tool: Tool::Floor });
        }
        if is_key_pressed(KeyCode::S) {
            self.save_log();
        }

        if self.widget.is_observing_viewport() {
            let ratio = self.layout.visible_ratio();
            if ratio >= self.widget.setup().auto_expand_threshold {
                self.apply(Command::ViewportVisible { ratio });
            }
        }
    }

    fn update(&mut self) {
        if self.widget.update(get_time()) {
            self.recorder.record(Command::Tick);
        }
    }

    fn save_log(&self) {
        let Some(path) = &self.command_log_path else {
            return;
        };
        if let Err(e) = self.recorder.log().save_to_file(path) {
            error!("Failed to save command log to {}: {}", path, e);
        }
    }

    fn draw(&self) {
        clear_background(rgb(self.visual.background));
        let snapshot = self.widget.snapshot();
        self.draw_header(&snapshot);
        if !snapshot.collapsed {
            self.draw_canvas(&snapshot);
        }
        self.draw_info();
    }

    fn draw_header(&self, snapshot: &Snapshot) {
        let layout = &self.layout;
        draw_rectangle(MARGIN, MARGIN, layout.width, HEADER_HEIGHT, rgb(self.visual.grid_line));
        draw_text("TILE MAPPER", MARGIN + 8.0, MARGIN + 19.0, 18.0, WHITE);

        let (label, color) = match snapshot.status {
            PathStatus::Found => ("PATH", rgb(self.visual.start)),
            PathStatus::Blocked => ("BLOCKED", rgb(self.visual.goal)),
        };
        draw_text(label, MARGIN + layout.width - 110.0, MARGIN + 19.0, 18.0, color);

        let toggle = if snapshot.collapsed { "[+]" } else { "[-]" };
        draw_text(toggle, MARGIN + layout.width - 30.0, MARGIN + 19.0, 18.0, WHITE);
    }

    fn draw_canvas(&self, snapshot: &Snapshot) {
        let layout = &self.layout;
        let size = layout.tile_size;
        let (ox, oy) = layout.origin;

        for pos in snapshot.grid.positions() {
            let px = ox + pos.x as f32 * size;
            let py = oy + pos.y as f32 * size;
            let color = if snapshot.grid.is_blocked(pos) {
                rgb(self.visual.wall)
            } else {
                rgb(self.visual.floor)
            };
            draw_rectangle(px, py, size, size, color);
            draw_rectangle_lines(px, py, size, size, 1.0, rgb(self.visual.grid_line));
        }

        if let Some(path) = snapshot.path {
            for &pos in path {
                if pos != snapshot.start && pos != snapshot.goal {
                    let (cx, cy) = layout.tile_center(pos);
                    draw_circle(cx, cy, 3.0, rgb(self.visual.path));
                }
            }
        }

        for (pos, color) in [(snapshot.start, self.visual.start), (snapshot.goal, self.visual.goal)] {
            draw_rectangle(
                ox + pos.x as f32 * size + 4.0,
                oy + pos.y as f32 * size + 4.0,
                size - 8.0,
                size - 8.0,
                rgb(color),
            );
        }

        let (bx, by) = layout.tile_center(snapshot.bot);
        draw_circle(bx, by, 6.0, rgb(self.visual.bot));
        draw_circle_lines(bx, by, 8.0, 1.0, Color::new(1.0, 1.0, 1.0, 0.4));
    }

    fn draw_info(&self) {
        let top = if self.widget.is_collapsed() {
            MARGIN + HEADER_HEIGHT + 20.0
        } else {
            self.layout.origin.1 + self.layout.height + 20.0
        };
        let info = [
            format!("Tool: {:?}", self.widget.tool()),
            "Drag: paint (first tile decides) | T/W/F: tool".to_string(),
            "R: reset | Space/header: collapse".to_string(),
            "S: save command log | Esc: quit".to_string(),
        ];
        for (i, line) in info.iter().enumerate() {
            draw_text(line, MARGIN, top + i as f32 * 18.0, 16.0, GRAY);
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn window_conf() -> Conf {
    let config = Config::load_from(CONFIG_PATH).unwrap_or_default();
    let layout = Layout::new(&config);
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: (layout.width + 2.0 * MARGIN).max(360.0) as i32,
        window_height: (layout.origin.1 + layout.height + INFO_HEIGHT) as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let level = Config::load_from(CONFIG_PATH)
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&level);

    let config = Config::load();
    let mut app = App::new(&config);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        app.handle_input();
        app.update();
        app.draw();

        next_frame().await
    }

    app.save_log();
}
