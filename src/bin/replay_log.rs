/// Headless replay of a saved command log
///
/// Rebuilds the widget from the log's setup, applies every command, and prints
/// the final grid, path, and a summary.

use std::env;
use std::process;

use tile_mapper::command_log::CommandLog;
use tile_mapper::pathfinding::format_path;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <command_log.json>", args[0]);
        eprintln!("Replays a tile mapper command log and prints the final state");
        process::exit(1);
    }

    let filename = &args[1];
    let log = match CommandLog::load_from_file(filename) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Failed to load {}: {}", filename, e);
            process::exit(1);
        }
    };

    let widget = log.replay();
    let snapshot = widget.snapshot();

    println!("=== Command Log: {} ===", filename);
    println!(
        "Grid {}x{}, seed {}, start ({},{}), goal ({},{})\n",
        log.setup.cols,
        log.setup.rows,
        log.setup.seed,
        log.setup.start.x,
        log.setup.start.y,
        log.setup.goal.x,
        log.setup.goal.y
    );
    print!("{}", snapshot.to_ascii());

    println!("\nStatus: {:?}", snapshot.status);
    println!("Path: {}", format_path(snapshot.path.unwrap_or_default()));
    println!(
        "Bot: ({},{}) [{:?}, index {}]",
        snapshot.bot.x,
        snapshot.bot.y,
        widget.bot_state(),
        widget.bot_index()
    );

    println!("\n=== Summary ===");
    println!("{}", log.summary());
}
