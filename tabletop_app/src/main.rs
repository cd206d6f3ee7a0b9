//! Tabletop still-life viewer
//!
//! Opens a window, feeds pointer, scroll, and key input to the camera, and
//! runs the scene pipeline every frame until Escape is pressed or the window
//! is closed.
//!
//! Usage: `tabletop [config.toml|config.ron]`. Without an argument
//! `tabletop.toml` is read when present, otherwise defaults are used.

mod app;

use std::path::{Path, PathBuf};

use tabletop_engine::config::{AppConfig, Config};
use tabletop_engine::foundation::logging;

use crate::app::{AppError, TabletopApp};

const DEFAULT_CONFIG_PATH: &str = "tabletop.toml";

fn load_config(explicit: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let config = match explicit {
        Some(path) => AppConfig::load_from_file(&path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AppConfig::load_from_file(DEFAULT_CONFIG_PATH)?,
        None => AppConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from))?;
    logging::init(&config.log_level);

    log::info!("Starting tabletop viewer");

    let mut app = TabletopApp::new(&config)?;
    match app.run() {
        Ok(()) => {
            log::info!("Tabletop viewer exited cleanly");
            Ok(())
        }
        Err(e) => {
            log::error!("Tabletop viewer failed: {}", e);
            Err(e.into())
        }
    }
}
