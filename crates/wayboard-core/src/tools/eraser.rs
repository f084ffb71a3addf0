//! Pixel eraser with a ring cursor.

use super::{Tool, ToolContext, ToolEvent, ToolKind};
use crate::color::SerializableColor;
use crate::entities::EntityStore;
use crate::surface::{CompositeOp, LineStyle};
use crate::toolbar::{ControlId, ControlInput, CursorHint, CursorOverlay, ToolbarControl, slider_value};
use kurbo::Point;

pub const MIN_ERASER_SIZE: f64 = 5.0;
pub const MAX_ERASER_SIZE: f64 = 100.0;

/// Removes pixels with destination-out compositing.
#[derive(Debug, Clone)]
pub struct EraserTool {
    pub size: f64,
    last: Option<Point>,
    /// Pointer position while over the surface.
    hover: Option<Point>,
}

impl Default for EraserTool {
    fn default() -> Self {
        Self {
            size: 20.0,
            last: None,
            hover: None,
        }
    }
}

impl EraserTool {
    pub fn is_erasing(&self) -> bool {
        self.last.is_some()
    }

    /// End the stroke. The composite reset runs on every exit.
    fn finish(&mut self, cx: &mut ToolContext<'_>) {
        cx.surface.set_composite(CompositeOp::SourceOver);
        if self.last.take().is_some() {
            cx.commit_snapshot();
        }
    }
}

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn on_pointer_down(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        cx.surface.set_composite(CompositeOp::DestinationOut);
        self.last = Some(event.position);
        self.hover = Some(event.position);
    }

    fn on_pointer_move(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        self.hover = Some(event.position);
        let Some(last) = self.last else {
            return;
        };
        // color is irrelevant under destination-out, only coverage counts
        let style = LineStyle::solid(SerializableColor::black(), self.size);
        cx.surface.context().stroke_line(last, event.position, &style);
        self.last = Some(event.position);
    }

    fn on_pointer_up(&mut self, cx: &mut ToolContext<'_>, _event: ToolEvent) {
        self.finish(cx);
    }

    fn on_pointer_leave(&mut self, cx: &mut ToolContext<'_>, _event: ToolEvent) {
        self.hover = None;
        self.finish(cx);
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) {
        self.hover = None;
        self.finish(cx);
    }

    fn toolbar(&self, _store: &EntityStore) -> Vec<ToolbarControl> {
        vec![ToolbarControl::slider(
            ControlId::EraserSize,
            format!("Eraser Size: {}px", self.size),
            self.size,
            MIN_ERASER_SIZE,
            MAX_ERASER_SIZE,
        )]
    }

    fn apply_control(&mut self, _cx: &mut ToolContext<'_>, id: ControlId, input: ControlInput) -> bool {
        match (id, input) {
            (ControlId::EraserSize, ControlInput::Number(value)) => {
                self.size = slider_value(value, MIN_ERASER_SIZE, MAX_ERASER_SIZE);
                true
            }
            _ => false,
        }
    }

    fn cursor(&self) -> Option<CursorHint> {
        Some(CursorHint::None)
    }

    fn cursor_overlay(&self) -> Option<CursorOverlay> {
        self.hover.map(|center| CursorOverlay::Ring {
            center,
            diameter: self.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{Rig, at};
    use kurbo::Rect;

    fn inked_rig() -> Rig {
        let mut rig = Rig::new(60.0, 60.0);
        rig.surface
            .context()
            .fill_rect(Rect::new(0.0, 0.0, 60.0, 60.0), SerializableColor::black());
        rig.history.commit(&rig.surface);
        rig
    }

    #[test]
    fn test_erases_and_restores_composite() {
        let mut rig = inked_rig();
        let mut tool = EraserTool::default();
        let mut cx = rig.cx();
        tool.on_pointer_down(&mut cx, at(10.0, 30.0));
        assert_eq!(cx.surface.composite(), CompositeOp::DestinationOut);
        tool.on_pointer_move(&mut cx, at(50.0, 30.0));
        tool.on_pointer_up(&mut cx, at(50.0, 30.0));

        assert_eq!(rig.surface.composite(), CompositeOp::SourceOver);
        assert_eq!(rig.surface.pixel(30, 30).map(|c| c.a), Some(0));
        assert_eq!(rig.surface.pixel(30, 5), Some(SerializableColor::black()));
        assert_eq!(rig.history.len(), 3);
    }

    #[test]
    fn test_exit_resets_composite_even_when_idle() {
        let mut rig = inked_rig();
        rig.surface.set_composite(CompositeOp::DestinationOut);
        let mut tool = EraserTool::default();
        tool.on_pointer_leave(&mut rig.cx(), at(0.0, 0.0));
        assert_eq!(rig.surface.composite(), CompositeOp::SourceOver);
        assert_eq!(rig.history.len(), 2);
    }

    #[test]
    fn test_ring_follows_pointer() {
        let mut rig = Rig::new(60.0, 60.0);
        let mut tool = EraserTool::default();
        assert_eq!(tool.cursor_overlay(), None);
        tool.on_pointer_move(&mut rig.cx(), at(12.0, 14.0));
        assert_eq!(
            tool.cursor_overlay(),
            Some(CursorOverlay::Ring { center: Point::new(12.0, 14.0), diameter: 20.0 })
        );
        assert_eq!(tool.cursor(), Some(CursorHint::None));
        tool.on_pointer_leave(&mut rig.cx(), at(70.0, 14.0));
        assert_eq!(tool.cursor_overlay(), None);
    }
}
