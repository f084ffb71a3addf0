//! Main application entry point.

use clap::Parser;
use wayboard_app::AppConfig;

fn main() {
    env_logger::init();
    log::info!("Starting Wayboard");

    let config = AppConfig::parse();
    match wayboard_app::run(&config) {
        Ok(summary) => log::info!(
            "Done: {} pins, {} lines, {} groups, {} PNG bytes",
            summary.pins,
            summary.lines,
            summary.groups,
            summary.png_bytes
        ),
        Err(err) => {
            eprintln!("wayboard: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
