//! Surface host: owns the surface, history and entities and drives the active tool.

use crate::color::SerializableColor;
use crate::entities::EntityStore;
use crate::history::History;
use crate::input::{ContainerBounds, PointerEvent, PointerKind};
use crate::surface::{RasterSurface, SurfaceError};
use crate::toolbar::{ControlId, ControlInput, CursorHint, CursorOverlay, ToolbarControl};
use crate::tools::{Tool, ToolContext, ToolEvent, ToolKind};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Fill for new and cleared buffers.
    pub background: SerializableColor,
    /// Device pixels per logical pixel.
    pub scale_factor: f64,
    /// Maximum snapshots kept for undo. `None` keeps every commit.
    pub history_limit: Option<usize>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            background: SerializableColor::white(),
            scale_factor: 1.0,
            history_limit: None,
        }
    }
}

/// Everything a host page renders around the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarView {
    pub tool: ToolKind,
    pub tool_controls: Vec<ToolbarControl>,
    pub history_controls: Vec<ToolbarControl>,
}

/// Routes pointer events to the active tool and wires the history controls.
///
/// Every handler is a silent no-op while the surface is unmounted.
pub struct SurfaceHost {
    config: HostConfig,
    surface: Option<RasterSurface>,
    history: History,
    store: EntityStore,
    tools: Vec<Box<dyn Tool>>,
    active: ToolKind,
    bounds: ContainerBounds,
    /// Last pointer position over the surface, local coordinates.
    pointer: Option<Point>,
    baseline_pushed: bool,
}

impl Default for SurfaceHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl SurfaceHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            history: History::bounded(config.history_limit),
            config,
            surface: None,
            store: EntityStore::new(),
            tools: fresh_tools(),
            active: ToolKind::default(),
            bounds: ContainerBounds::default(),
            pointer: None,
            baseline_pushed: false,
        }
    }

    /// Create the surface and start a new session.
    pub fn mount(&mut self) {
        if self.surface.is_some() {
            return;
        }
        match RasterSurface::new(self.config.scale_factor, self.config.background) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.history = History::bounded(self.config.history_limit);
                self.store = EntityStore::new();
                self.tools = fresh_tools();
                self.pointer = None;
                self.baseline_pushed = false;
                log::debug!("Surface mounted");
            }
            Err(err) => log::warn!("Failed to mount surface: {err}"),
        }
    }

    /// Destroy the surface. Any in-flight gesture is ended first.
    pub fn unmount(&mut self) {
        self.with_active_tool(|tool, cx| tool.deactivate(cx));
        if self.surface.take().is_some() {
            self.history.reset();
            self.pointer = None;
            log::debug!("Surface unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Resize to the container's logical size.
    ///
    /// The baseline snapshot is pushed the first time the surface has area.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds.size = Size::new(width, height);
        let baseline_pending = !self.baseline_pushed;
        let outcome = self.surface_write(|surface, history| {
            let resized = surface.resize(width, height)?;
            let baseline = resized && baseline_pending && !surface.is_empty();
            if baseline {
                history.commit(surface);
            }
            Ok::<_, SurfaceError>((resized, baseline))
        });
        match outcome {
            Some(Ok((resized, baseline))) => {
                if resized {
                    log::debug!("Surface resized to {}x{}", width, height);
                }
                self.baseline_pushed |= baseline;
            }
            Some(Err(err)) => log::warn!("Resize failed, keeping previous buffer: {err}"),
            None => {}
        }
    }

    /// Change the device pixel ratio, rescaling existing content.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.config.scale_factor = scale_factor;
        if let Some(Err(err)) = self.surface_write(|surface, _| surface.set_scale_factor(scale_factor)) {
            log::warn!("Rescale failed, keeping previous buffer: {err}");
        }
    }

    /// Update the container's bounding box and resize to its size.
    pub fn set_bounds(&mut self, bounds: ContainerBounds) {
        self.bounds = bounds;
        self.resize(bounds.size.width, bounds.size.height);
    }

    pub fn bounds(&self) -> ContainerBounds {
        self.bounds
    }

    /// Switch tools. The outgoing tool is deactivated first.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind == self.active {
            return;
        }
        self.with_active_tool(|tool, cx| tool.deactivate(cx));
        log::debug!("Tool switched: {:?} -> {:?}", self.active, kind);
        self.active = kind;
        self.with_active_tool(|tool, cx| tool.show_overlay(cx));
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active
    }

    pub fn tool(&self, kind: ToolKind) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.kind() == kind).map(|t| t.as_ref())
    }

    /// Translate a client event and forward it to the active tool.
    pub fn pointer_event(&mut self, event: PointerEvent) {
        if self.surface.is_none() {
            return;
        }
        let local = self.bounds.to_local(event.client);
        self.pointer = match event.kind {
            PointerKind::Leave => None,
            _ => Some(local),
        };
        log::trace!("{:?} at {:?}", event.kind, local);

        let tool_event = ToolEvent::new(local, event.at);
        self.with_active_tool(|tool, cx| match event.kind {
            PointerKind::Down => tool.on_pointer_down(cx, tool_event),
            PointerKind::Move => tool.on_pointer_move(cx, tool_event),
            PointerKind::Up => tool.on_pointer_up(cx, tool_event),
            PointerKind::Leave => tool.on_pointer_leave(cx, tool_event),
        });
    }

    /// Run one display frame. Returns whether another frame is wanted.
    pub fn frame(&mut self, now: Duration) -> bool {
        if !self.wants_frame() {
            return false;
        }
        self.with_active_tool(|tool, cx| tool.on_frame(cx, now));
        self.wants_frame()
    }

    /// Whether the active tool is running a repaint loop.
    pub fn wants_frame(&self) -> bool {
        self.is_mounted() && self.tool(self.active).is_some_and(|t| t.wants_frames())
    }

    pub fn undo(&mut self) -> bool {
        self.surface_write(|surface, history| history.undo(surface))
            .unwrap_or(false)
    }

    pub fn redo(&mut self) -> bool {
        self.surface_write(|surface, history| history.redo(surface))
            .unwrap_or(false)
    }

    /// Reset the surface to the background and record it.
    pub fn clear(&mut self) {
        self.surface_write(|surface, history| {
            surface.clear();
            history.commit(surface);
        });
    }

    pub fn can_undo(&self) -> bool {
        self.is_mounted() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.is_mounted() && self.history.can_redo()
    }

    /// Controls for the active tool plus the history controls.
    pub fn toolbar(&self) -> ToolbarView {
        let tool_controls = self
            .tool(self.active)
            .map(|t| t.toolbar(&self.store))
            .unwrap_or_default();
        ToolbarView {
            tool: self.active,
            tool_controls,
            history_controls: vec![
                ToolbarControl::button(ControlId::Undo, "Undo", self.can_undo()),
                ToolbarControl::button(ControlId::Redo, "Redo", self.can_redo()),
                ToolbarControl::button(ControlId::Clear, "Clear", self.is_mounted()),
            ],
        }
    }

    /// Route control input to the history controls or the active tool.
    pub fn apply_control(&mut self, id: ControlId, input: ControlInput) -> bool {
        if input == ControlInput::Press {
            match id {
                ControlId::Undo => return self.undo(),
                ControlId::Redo => return self.redo(),
                ControlId::Clear => {
                    self.clear();
                    return self.is_mounted();
                }
                _ => {}
            }
        }
        self.with_active_tool(|tool, cx| tool.apply_control(cx, id, input))
            .unwrap_or(false)
    }

    /// Native cursor for the active tool.
    pub fn cursor(&self) -> CursorHint {
        self.tool(self.active)
            .and_then(|t| t.cursor())
            .unwrap_or_default()
    }

    /// Custom cursor element, while the pointer is over the surface.
    pub fn cursor_overlay(&self) -> Option<CursorOverlay> {
        self.pointer?;
        self.tool(self.active)?.cursor_overlay()
    }

    /// Last pointer position over the surface.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn surface(&self) -> Option<&RasterSurface> {
        self.surface.as_ref()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Run a host-side write with the active tool's decorations lifted off the buffer.
    fn surface_write<R>(&mut self, write: impl FnOnce(&mut RasterSurface, &mut History) -> R) -> Option<R> {
        self.surface.as_ref()?;
        self.with_active_tool(|tool, cx| tool.hide_overlay(cx));
        let surface = self.surface.as_mut()?;
        let result = write(surface, &mut self.history);
        self.with_active_tool(|tool, cx| tool.show_overlay(cx));
        Some(result)
    }

    fn with_active_tool<R>(&mut self, f: impl FnOnce(&mut dyn Tool, &mut ToolContext<'_>) -> R) -> Option<R> {
        let surface = self.surface.as_mut()?;
        let active = self.active;
        let tool = self.tools.iter_mut().find(|t| t.kind() == active)?;
        let mut cx = ToolContext::new(surface, &mut self.history, &mut self.store);
        Some(f(tool.as_mut(), &mut cx))
    }
}

fn fresh_tools() -> Vec<Box<dyn Tool>> {
    ToolKind::ALL.iter().map(|kind| kind.create()).collect()
}
