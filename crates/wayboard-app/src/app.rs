//! Session replay: load a script, drive the host, write the results.

use std::path::Path;

use wayboard_core::{HostConfig, SurfaceHost};

use crate::cli::AppConfig;
use crate::error::{AppError, Result};
use crate::export::write_png;
use crate::script::{Replayer, Session};

/// What a replay produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub steps: usize,
    pub pins: usize,
    pub lines: usize,
    pub groups: usize,
    pub png_bytes: usize,
}

pub fn load_session(path: &Path) -> Result<Session> {
    let json = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Session::from_json(&json).map_err(AppError::Session)
}

/// Mount a host sized for `session` (with command-line overrides) and play every step.
pub fn replay(session: &Session, config: &AppConfig) -> SurfaceHost {
    let host_config = HostConfig {
        scale_factor: config.scale.or(session.scale_factor).unwrap_or(1.0),
        ..HostConfig::default()
    };
    let mut host = SurfaceHost::new(host_config);
    host.mount();

    let width = config.width.unwrap_or(session.width);
    let height = config.height.unwrap_or(session.height);
    host.set_bounds(wayboard_core::ContainerBounds::new(
        session.origin,
        kurbo::Size::new(width, height),
    ));

    let mut replayer = Replayer::new(host);
    for step in &session.steps {
        replayer.apply(step);
    }
    log::info!("Replayed {} steps", session.steps.len());
    replayer.into_host()
}

pub fn run(config: &AppConfig) -> Result<Summary> {
    config.validate()?;
    let session = load_session(&config.session)?;
    log::info!("Loaded session {}", config.session.display());

    let host = replay(&session, config);

    if config.print_toolbar {
        println!("{}", serde_json::to_string_pretty(&host.toolbar())?);
    }

    let surface = host.surface().ok_or(AppError::NotMounted)?;
    let png_bytes = write_png(surface, &config.output)?;

    let store = host.store();
    if let Some(path) = &config.entities {
        std::fs::write(path, store.to_json()?).map_err(|e| AppError::io(path, e))?;
        log::info!("Entities written to {}", path.display());
    }

    Ok(Summary {
        steps: session.steps.len(),
        pins: store.pins().len(),
        lines: store.lines().len(),
        groups: store.groups().len(),
        png_bytes,
    })
}
