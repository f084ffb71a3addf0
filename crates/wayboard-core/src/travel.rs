//! Display distance and ranked transit-mode options for a line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Display kilometres per logical pixel.
pub const KM_PER_PIXEL: f64 = 0.5;

/// Convert a logical pixel length to whole display kilometres.
pub fn pixels_to_km(pixels: f64) -> u32 {
    (pixels.max(0.0) * KM_PER_PIXEL).round() as u32
}

/// Travel mode offered for a transit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Drive,
    Bus,
    PublicTransit,
    Flight,
}

impl TransitMode {
    pub fn label(self) -> &'static str {
        match self {
            TransitMode::Drive => "Drive",
            TransitMode::Bus => "Bus",
            TransitMode::PublicTransit => "Public Transit",
            TransitMode::Flight => "Flight",
        }
    }

    /// Average speed in km/h.
    fn speed(self) -> f64 {
        match self {
            TransitMode::Drive => 60.0,
            TransitMode::Bus => 40.0,
            TransitMode::PublicTransit => 80.0,
            TransitMode::Flight => 800.0,
        }
    }

    /// Whether the mode is offered for `distance` km.
    fn available(self, distance: f64) -> bool {
        match self {
            TransitMode::Drive => distance < 1000.0,
            TransitMode::Bus => distance < 500.0,
            TransitMode::PublicTransit => (20.0..800.0).contains(&distance),
            TransitMode::Flight => distance >= 300.0,
        }
    }

    fn cost(self, distance: f64) -> f64 {
        match self {
            TransitMode::Drive => distance * 0.15,
            TransitMode::Bus => (distance * 0.05).max(2.0),
            TransitMode::PublicTransit => (distance * 0.08).max(3.0),
            TransitMode::Flight => 50.0 + distance * 0.2,
        }
    }

    fn duration(self, distance: f64) -> Duration {
        let cruise = Duration::from_secs_f64(distance / self.speed() * 3600.0);
        match self {
            // check-in and boarding
            TransitMode::Flight => Duration::from_secs(120 * 60) + cruise,
            _ => cruise,
        }
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One way of covering a line's distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitOption {
    pub mode: TransitMode,
    pub duration: Duration,
    pub cost: f64,
}

impl TransitOption {
    /// Single-line summary used by the options panel.
    pub fn summary(&self) -> String {
        format!("{}  {}  ${:.2}", self.mode, format_duration(self.duration), self.cost)
    }
}

/// Generation order; ties on cost keep this order.
const MODES: [TransitMode; 4] = [
    TransitMode::Drive,
    TransitMode::Bus,
    TransitMode::PublicTransit,
    TransitMode::Flight,
];

/// Options for `distance` km, cheapest first.
pub fn transit_options(distance: u32) -> Vec<TransitOption> {
    let d = f64::from(distance);
    let mut options: Vec<TransitOption> = MODES
        .iter()
        .filter(|mode| mode.available(d))
        .map(|&mode| TransitOption {
            mode,
            duration: mode.duration(d),
            cost: mode.cost(d),
        })
        .collect();
    // sort_by is stable
    options.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    options
}

/// `"2h 05m"`, or `"45 min"` under an hour.
pub fn format_duration(duration: Duration) -> String {
    let minutes = (duration.as_secs_f64() / 60.0).round() as u64;
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}
