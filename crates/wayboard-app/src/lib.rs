//! Wayboard App
//!
//! Headless host for the annotation engine: replays scripted sessions
//! and exports the surface as PNG.

pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod script;

pub use app::{Summary, replay, run};
pub use cli::AppConfig;
pub use error::{AppError, Result};
pub use script::{Replayer, Session, Step};
