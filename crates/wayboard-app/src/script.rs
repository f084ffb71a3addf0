//! Session scripts: a recorded sequence of host events.

use std::time::Duration;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use wayboard_core::{ControlId, ControlInput, PointerEvent, PointerKind, SurfaceHost, ToolKind};

/// Display frame interval used while waiting.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A scripted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub scale_factor: Option<f64>,
    /// Container origin in client coordinates.
    #[serde(default)]
    pub origin: Point,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One scripted event. Pointer positions are in client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Resize { width: f64, height: f64 },
    Scale { factor: f64 },
    Tool { tool: ToolKind },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Leave { x: f64, y: f64 },
    /// Let time pass, running display frames while the host wants them.
    Wait { ms: u64 },
    Control { id: ControlId, input: ControlInput },
    Undo,
    Redo,
    Clear,
    Unmount,
    Mount,
}

/// Plays steps against a host with a virtual clock.
pub struct Replayer {
    host: SurfaceHost,
    clock: Duration,
}

impl Replayer {
    pub fn new(host: SurfaceHost) -> Self {
        Self {
            host,
            clock: Duration::ZERO,
        }
    }

    pub fn host(&self) -> &SurfaceHost {
        &self.host
    }

    pub fn into_host(self) -> SurfaceHost {
        self.host
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn apply(&mut self, step: &Step) {
        log::trace!("step {step:?}");
        match *step {
            Step::Resize { width, height } => self.host.resize(width, height),
            Step::Scale { factor } => self.host.set_scale_factor(factor),
            Step::Tool { tool } => self.host.set_tool(tool),
            Step::Down { x, y } => self.pointer(PointerKind::Down, x, y),
            Step::Move { x, y } => self.pointer(PointerKind::Move, x, y),
            Step::Up { x, y } => self.pointer(PointerKind::Up, x, y),
            Step::Leave { x, y } => self.pointer(PointerKind::Leave, x, y),
            Step::Wait { ms } => self.wait(Duration::from_millis(ms)),
            Step::Control { id, ref input } => {
                if !self.host.apply_control(id, input.clone()) {
                    log::warn!("Control {id:?} was not handled by {:?}", self.host.active_tool());
                }
            }
            Step::Undo => {
                self.host.undo();
            }
            Step::Redo => {
                self.host.redo();
            }
            Step::Clear => self.host.clear(),
            Step::Unmount => self.host.unmount(),
            Step::Mount => self.host.mount(),
        }
    }

    fn pointer(&mut self, kind: PointerKind, x: f64, y: f64) {
        let event = PointerEvent::new(kind, Point::new(x, y), self.clock);
        self.host.pointer_event(event);
    }

    fn wait(&mut self, duration: Duration) {
        let end = self.clock + duration;
        while self.clock < end {
            self.clock = (self.clock + FRAME_INTERVAL).min(end);
            if self.host.wants_frame() {
                self.host.frame(self.clock);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let json = r#"{
            "width": 200, "height": 100,
            "steps": [
                {"op": "tool", "tool": "location"},
                {"op": "down", "x": 10, "y": 20},
                {"op": "control", "id": "pin_label", "input": {"text": "Rome, Italy"}},
                {"op": "control", "id": "create_group", "input": "press"},
                {"op": "wait", "ms": 600},
                {"op": "undo"}
            ]
        }"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.origin, Point::ZERO);
        assert_eq!(session.steps.len(), 6);
        assert_eq!(session.steps[0], Step::Tool { tool: ToolKind::Location });
        assert_eq!(
            session.steps[2],
            Step::Control { id: ControlId::PinLabel, input: ControlInput::Text("Rome, Italy".into()) }
        );
        assert_eq!(session.steps[5], Step::Undo);
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let json = r#"{"width": 10, "height": 10, "steps": [{"op": "teleport"}]}"#;
        assert!(Session::from_json(json).is_err());
    }

    #[test]
    fn test_wait_advances_clock_and_runs_frames() {
        let mut host = SurfaceHost::default();
        host.mount();
        host.resize(300.0, 200.0);
        let mut replayer = Replayer::new(host);
        for step in [
            Step::Tool { tool: ToolKind::Location },
            Step::Down { x: 50.0, y: 100.0 },
            Step::Down { x: 250.0, y: 100.0 },
            Step::Tool { tool: ToolKind::Transit },
            Step::Down { x: 50.0, y: 100.0 },
            Step::Move { x: 250.0, y: 100.0 },
        ] {
            replayer.apply(&step);
        }
        assert!(replayer.host().wants_frame());

        replayer.apply(&Step::Wait { ms: 520 });
        assert_eq!(replayer.clock(), Duration::from_millis(520));
        assert!(!replayer.host().wants_frame());

        replayer.apply(&Step::Up { x: 250.0, y: 100.0 });
        assert_eq!(replayer.host().store().lines().len(), 1);
    }
}
