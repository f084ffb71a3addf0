//! Freehand drawing.

use super::{Tool, ToolContext, ToolEvent, ToolKind};
use crate::color::SerializableColor;
use crate::entities::EntityStore;
use crate::surface::LineStyle;
use crate::toolbar::{ControlId, ControlInput, ToolbarControl, slider_value};
use kurbo::Point;

pub const MIN_STROKE_WIDTH: f64 = 1.0;
pub const MAX_STROKE_WIDTH: f64 = 50.0;

/// Freehand pen. Strokes render live and are committed on release.
#[derive(Debug, Clone)]
pub struct DoodleTool {
    pub color: SerializableColor,
    pub width: f64,
    /// Last stroked point while drawing.
    last: Option<Point>,
}

impl Default for DoodleTool {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 2.0,
            last: None,
        }
    }
}

impl DoodleTool {
    pub fn is_drawing(&self) -> bool {
        self.last.is_some()
    }

    fn finish(&mut self, cx: &mut ToolContext<'_>) {
        if self.last.take().is_some() {
            cx.commit_snapshot();
        }
    }
}

impl Tool for DoodleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Doodle
    }

    fn on_pointer_down(&mut self, _cx: &mut ToolContext<'_>, event: ToolEvent) {
        self.last = Some(event.position);
    }

    fn on_pointer_move(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        let Some(last) = self.last else {
            return;
        };
        let style = LineStyle::solid(self.color, self.width);
        cx.surface.context().stroke_line(last, event.position, &style);
        self.last = Some(event.position);
    }

    fn on_pointer_up(&mut self, cx: &mut ToolContext<'_>, _event: ToolEvent) {
        self.finish(cx);
    }

    fn on_pointer_leave(&mut self, cx: &mut ToolContext<'_>, _event: ToolEvent) {
        self.finish(cx);
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) {
        self.finish(cx);
    }

    fn toolbar(&self, _store: &EntityStore) -> Vec<ToolbarControl> {
        vec![
            ToolbarControl::color(ControlId::StrokeColor, "Color", self.color),
            ToolbarControl::slider(
                ControlId::StrokeWidth,
                format!("Size: {}px", self.width),
                self.width,
                MIN_STROKE_WIDTH,
                MAX_STROKE_WIDTH,
            ),
        ]
    }

    fn apply_control(&mut self, _cx: &mut ToolContext<'_>, id: ControlId, input: ControlInput) -> bool {
        match (id, input) {
            (ControlId::StrokeColor, ControlInput::Color(color)) => self.color = color,
            (ControlId::StrokeWidth, ControlInput::Number(value)) => {
                self.width = slider_value(value, MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{Rig, at};

    #[test]
    fn test_stroke_commits_on_release() {
        let mut rig = Rig::new(60.0, 60.0);
        let mut tool = DoodleTool { width: 4.0, ..Default::default() };
        let mut cx = rig.cx();
        tool.on_pointer_down(&mut cx, at(10.0, 30.0));
        tool.on_pointer_move(&mut cx, at(50.0, 30.0));
        assert_eq!(cx.history.len(), 1);
        tool.on_pointer_up(&mut cx, at(50.0, 30.0));
        assert_eq!(rig.history.len(), 2);
        assert_eq!(rig.surface.pixel(30, 30), Some(SerializableColor::black()));
    }

    #[test]
    fn test_leave_commits_in_place() {
        let mut rig = Rig::new(60.0, 60.0);
        let mut tool = DoodleTool::default();
        let mut cx = rig.cx();
        tool.on_pointer_down(&mut cx, at(10.0, 10.0));
        tool.on_pointer_move(&mut cx, at(40.0, 40.0));
        tool.on_pointer_leave(&mut cx, at(70.0, 70.0));
        assert!(!tool.is_drawing());
        assert_eq!(rig.history.len(), 2);
        assert_eq!(rig.history.current(), Some(&rig.surface.snapshot()));
    }

    #[test]
    fn test_move_without_down_draws_nothing() {
        let mut rig = Rig::new(60.0, 60.0);
        let before = rig.surface.snapshot();
        let mut tool = DoodleTool::default();
        let mut cx = rig.cx();
        tool.on_pointer_move(&mut cx, at(10.0, 10.0));
        tool.on_pointer_up(&mut cx, at(10.0, 10.0));
        assert_eq!(rig.surface.snapshot(), before);
        assert_eq!(rig.history.len(), 1);
    }

    #[test]
    fn test_deactivate_force_commits() {
        let mut rig = Rig::new(60.0, 60.0);
        let mut tool = DoodleTool::default();
        let mut cx = rig.cx();
        tool.on_pointer_down(&mut cx, at(10.0, 10.0));
        tool.on_pointer_move(&mut cx, at(20.0, 20.0));
        tool.deactivate(&mut cx);
        assert_eq!(rig.history.len(), 2);
    }

    #[test]
    fn test_width_control_clamps() {
        let mut rig = Rig::new(10.0, 10.0);
        let mut tool = DoodleTool::default();
        let mut cx = rig.cx();
        assert!(tool.apply_control(&mut cx, ControlId::StrokeWidth, ControlInput::Number(80.0)));
        assert_eq!(tool.width, MAX_STROKE_WIDTH);
        assert!(!tool.apply_control(&mut cx, ControlId::EraserSize, ControlInput::Number(8.0)));
    }
}
