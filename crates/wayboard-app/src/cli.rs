use std::path::PathBuf;

use clap::Parser;

use crate::error::{AppError, Result};

/// Command-line configuration for a replay run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wayboard",
    about = "Replay an annotation session against the Wayboard engine and export a PNG",
    version
)]
pub struct AppConfig {
    /// Session script (JSON).
    pub session: PathBuf,

    /// Output PNG path.
    #[arg(short, long, default_value = "wayboard.png")]
    pub output: PathBuf,

    /// Override the session's logical width.
    #[arg(long)]
    pub width: Option<f64>,

    /// Override the session's logical height.
    #[arg(long)]
    pub height: Option<f64>,

    /// Override the device scale factor.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Write pins, lines and groups as JSON to this path.
    #[arg(long)]
    pub entities: Option<PathBuf>,

    /// Print the final toolbar description as JSON.
    #[arg(long)]
    pub print_toolbar: bool,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: Option<f64>| match value {
            Some(v) if !(v.is_finite() && v > 0.0) => Err(AppError::InvalidArgument {
                message: format!("--{name} must be a positive number, got {v}"),
            }),
            _ => Ok(()),
        };
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("scale", self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = AppConfig::parse_from(["wayboard", "session.json"]);
        assert_eq!(config.session, PathBuf::from("session.json"));
        assert_eq!(config.output, PathBuf::from("wayboard.png"));
        assert!(config.entities.is_none());
        assert!(!config.print_toolbar);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_overrides() {
        let config = AppConfig::parse_from([
            "wayboard", "s.json", "-o", "out.png", "--width", "640", "--scale", "2", "--print-toolbar",
        ]);
        assert_eq!(config.output, PathBuf::from("out.png"));
        assert_eq!(config.width, Some(640.0));
        assert_eq!(config.scale, Some(2.0));
        assert!(config.print_toolbar);
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let config = AppConfig::parse_from(["wayboard", "s.json", "--height", "0"]);
        assert!(matches!(config.validate(), Err(AppError::InvalidArgument { .. })));
    }
}
