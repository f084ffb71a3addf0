//! Tool system for the annotation surface.
//!
//! Every tool is a state machine over pointer events. The host forwards
//! events to the active tool together with a [`ToolContext`] that exposes
//! the surface, the shared entity store and the history operations.

mod doodle;
mod eraser;
mod group;
mod location;
mod transit;

pub use doodle::DoodleTool;
pub use eraser::EraserTool;
pub use group::GroupTool;
pub use location::{DESTINATIONS, LocationTool, destination_suggestions, draw_pin, pin_bounds};
pub use transit::{LOADER_DELAY, LineAnnotation, TransitTool};

use crate::entities::EntityStore;
use crate::history::History;
use crate::surface::RasterSurface;
use crate::toolbar::{ControlId, ControlInput, CursorHint, CursorOverlay, ToolbarControl};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Doodle,
    Eraser,
    Location,
    Transit,
    Group,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Doodle,
        ToolKind::Eraser,
        ToolKind::Location,
        ToolKind::Transit,
        ToolKind::Group,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Doodle => "Doodle",
            ToolKind::Eraser => "Eraser",
            ToolKind::Location => "Location",
            ToolKind::Transit => "Transit",
            ToolKind::Group => "Group",
        }
    }

    /// Construct a fresh tool with default settings.
    pub fn create(self) -> Box<dyn Tool> {
        match self {
            ToolKind::Doodle => Box::new(DoodleTool::default()),
            ToolKind::Eraser => Box::new(EraserTool::default()),
            ToolKind::Location => Box::new(LocationTool::default()),
            ToolKind::Transit => Box::new(TransitTool::default()),
            ToolKind::Group => Box::new(GroupTool::default()),
        }
    }
}

/// A pointer event already translated to surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolEvent {
    pub position: Point,
    /// Time since the session started.
    pub at: Duration,
}

impl ToolEvent {
    pub fn new(position: Point, at: Duration) -> Self {
        Self { position, at }
    }
}

/// Shared dependencies handed to every tool call.
pub struct ToolContext<'a> {
    pub surface: &'a mut RasterSurface,
    pub history: &'a mut History,
    pub store: &'a mut EntityStore,
}

impl<'a> ToolContext<'a> {
    pub fn new(surface: &'a mut RasterSurface, history: &'a mut History, store: &'a mut EntityStore) -> Self {
        Self { surface, history, store }
    }

    /// Push the current buffer onto the history.
    pub fn commit_snapshot(&mut self) {
        self.history.commit(self.surface);
    }

    /// Reset the surface to the background fill and record it.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.commit_snapshot();
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(self.surface)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(self.surface)
    }
}

/// The interface every annotation tool implements.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent);

    fn on_pointer_move(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent);

    fn on_pointer_up(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent);

    fn on_pointer_leave(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent);

    /// Called once per display frame while [`Tool::wants_frames`] is true.
    fn on_frame(&mut self, _cx: &mut ToolContext<'_>, _now: Duration) {}

    /// Whether the tool is running a repaint loop.
    fn wants_frames(&self) -> bool {
        false
    }

    /// Called on the outgoing tool when the host switches tools.
    fn deactivate(&mut self, _cx: &mut ToolContext<'_>) {}

    /// Remove unrecorded decorations before the host writes to the surface
    /// (resize, rescale, undo, redo, clear).
    fn hide_overlay(&mut self, _cx: &mut ToolContext<'_>) {}

    /// Paint decorations again after a host write or on activation.
    fn show_overlay(&mut self, _cx: &mut ToolContext<'_>) {}

    /// Configuration controls to show while the tool is active.
    fn toolbar(&self, _store: &EntityStore) -> Vec<ToolbarControl> {
        Vec::new()
    }

    /// Apply input from one of this tool's controls.
    /// Returns false if the control is not handled by this tool.
    fn apply_control(&mut self, _cx: &mut ToolContext<'_>, _id: ControlId, _input: ControlInput) -> bool {
        false
    }

    fn cursor(&self) -> Option<CursorHint> {
        None
    }

    fn cursor_overlay(&self) -> Option<CursorOverlay> {
        None
    }
}
