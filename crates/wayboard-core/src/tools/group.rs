//! Pin selection and named groups with glow highlights.

use super::{Tool, ToolContext, ToolEvent, ToolKind};
use crate::color::SerializableColor;
use crate::entities::{EntityStore, GroupId, PinId};
use crate::snap::{PIN_CLICK_RADIUS, pin_at};
use crate::surface::{RenderContext, Snapshot};
use crate::toolbar::{ControlId, ControlInput, CursorHint, ToolbarControl};
use kurbo::Point;

const GLOW_RADIUS: f64 = 40.0;
const GLOW_LAYERS: u32 = 4;
/// Glow is centered on the pin head, not its tip.
const GLOW_LIFT: f64 = 15.0;

/// Layered translucent halo around a pin.
fn draw_glow(rc: &mut RenderContext<'_>, position: Point, color: SerializableColor) {
    let center = Point::new(position.x, position.y - GLOW_LIFT);
    for i in (0..GLOW_LAYERS).rev() {
        let i = f64::from(i);
        let alpha = 0.15 - i * 0.03;
        rc.fill_circle(center, GLOW_RADIUS + i * 5.0, color.with_alpha(alpha as f32));
    }
}

/// Selects pins and groups them.
///
/// Glows are never baked into history: the tool keeps a glow-free base
/// snapshot and repaints the current glow set on top of it. Glows are
/// stripped before anyone else writes to the surface, and the base is
/// recaptured from the glow-free buffer afterwards.
#[derive(Debug, Clone)]
pub struct GroupTool {
    pub color: SerializableColor,
    pub label: String,
    selection: Vec<PinId>,
    active_group: Option<GroupId>,
    base: Option<Snapshot>,
    painted_revision: Option<u64>,
    hovering: bool,
}

impl Default for GroupTool {
    fn default() -> Self {
        Self {
            color: SerializableColor::rgb(0xff, 0xd7, 0x00),
            label: String::new(),
            selection: Vec::new(),
            active_group: None,
            base: None,
            painted_revision: None,
            hovering: false,
        }
    }
}

impl GroupTool {
    pub fn selection(&self) -> &[PinId] {
        &self.selection
    }

    pub fn active_group(&self) -> Option<GroupId> {
        self.active_group
    }

    pub fn toggle(&mut self, pin: PinId) {
        match self.selection.iter().position(|&p| p == pin) {
            Some(index) => {
                self.selection.remove(index);
            }
            None => self.selection.push(pin),
        }
    }

    /// Restore the base and paint glows for the selection and every group.
    pub fn redraw(&mut self, cx: &mut ToolContext<'_>) {
        let glowing = !self.selection.is_empty() || !cx.store.groups().is_empty();
        let stale = self.painted_revision != Some(cx.surface.revision());
        if stale {
            if !glowing {
                self.base = None;
                self.painted_revision = None;
                return;
            }
            log::trace!("Group glow base recaptured");
            self.base = Some(cx.surface.snapshot());
        }
        let Some(base) = &self.base else {
            return;
        };

        cx.surface.restore(base);
        let mut rc = cx.surface.context();
        for pin in cx.store.pins() {
            if self.selection.contains(&pin.id) {
                draw_glow(&mut rc, pin.position, self.color);
            }
        }
        for group in cx.store.groups() {
            for pin in cx.store.group_pins(group.id) {
                draw_glow(&mut rc, pin.position, group.color);
            }
        }
        self.painted_revision = Some(cx.surface.revision());
    }

    /// Put the glow-free base back if the surface still shows our last paint.
    fn strip_glows(&mut self, cx: &mut ToolContext<'_>) {
        let Some(base) = self.base.take() else {
            return;
        };
        if self.painted_revision.take() == Some(cx.surface.revision()) {
            cx.surface.restore(&base);
        } else {
            log::debug!("Surface changed under group glows, leaving it as is");
        }
    }

    /// Group the selected pins. Returns `None` for an empty selection.
    pub fn create_group(&mut self, cx: &mut ToolContext<'_>) -> Option<GroupId> {
        if self.selection.is_empty() {
            return None;
        }
        let label = if self.label.trim().is_empty() {
            format!("Group {}", cx.store.groups().len() + 1)
        } else {
            std::mem::take(&mut self.label)
        };
        let pins = std::mem::take(&mut self.selection);
        let id = cx.store.add_group(self.color, label, pins);
        self.active_group = Some(id);
        self.label.clear();
        self.redraw(cx);
        Some(id)
    }

    /// Remove a group and repaint without its glow.
    pub fn delete_group(&mut self, cx: &mut ToolContext<'_>, id: GroupId) -> bool {
        if cx.store.remove_group(id).is_none() {
            return false;
        }
        if self.active_group == Some(id) {
            self.active_group = None;
        }
        self.redraw(cx);
        true
    }
}

impl Tool for GroupTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Group
    }

    fn on_pointer_down(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        let Some(index) = pin_at(cx.store.pins(), event.position, PIN_CLICK_RADIUS) else {
            return;
        };
        let id = cx.store.pins()[index].id;
        self.toggle(id);
        self.redraw(cx);
    }

    fn on_pointer_move(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        self.hovering = pin_at(cx.store.pins(), event.position, PIN_CLICK_RADIUS).is_some();
        if self.base.is_some() {
            self.redraw(cx);
        }
    }

    fn on_pointer_up(&mut self, _cx: &mut ToolContext<'_>, _event: ToolEvent) {}

    fn on_pointer_leave(&mut self, _cx: &mut ToolContext<'_>, _event: ToolEvent) {
        self.hovering = false;
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) {
        self.hovering = false;
        self.strip_glows(cx);
    }

    fn hide_overlay(&mut self, cx: &mut ToolContext<'_>) {
        self.strip_glows(cx);
    }

    fn show_overlay(&mut self, cx: &mut ToolContext<'_>) {
        self.redraw(cx);
    }

    fn toolbar(&self, store: &EntityStore) -> Vec<ToolbarControl> {
        let mut controls = vec![
            ToolbarControl::color(ControlId::GroupColor, "Group Color", self.color),
            ToolbarControl::text(ControlId::GroupLabel, "Group Label", &self.label, "e.g., Europe Trip"),
            ToolbarControl::button(
                ControlId::CreateGroup,
                format!("Create Group ({} pins selected)", self.selection.len()),
                !self.selection.is_empty(),
            ),
        ];
        for group in store.groups() {
            controls.push(ToolbarControl::text(
                ControlId::RenameGroup(group.id),
                format!("({})", group.pin_ids.len()),
                &group.label,
                "",
            ));
            controls.push(ToolbarControl::button(ControlId::DeleteGroup(group.id), "Delete", true));
        }
        controls
    }

    fn apply_control(&mut self, cx: &mut ToolContext<'_>, id: ControlId, input: ControlInput) -> bool {
        match (id, input) {
            (ControlId::GroupColor, ControlInput::Color(color)) => self.color = color,
            (ControlId::GroupLabel, ControlInput::Text(label)) => self.label = label,
            (ControlId::CreateGroup, ControlInput::Press) => {
                self.create_group(cx);
            }
            (ControlId::RenameGroup(group), ControlInput::Text(label)) => {
                return cx.store.rename_group(group, label);
            }
            (ControlId::DeleteGroup(group), ControlInput::Press) => {
                return self.delete_group(cx, group);
            }
            _ => return false,
        }
        true
    }

    fn cursor(&self) -> Option<CursorHint> {
        Some(if self.hovering {
            CursorHint::Pointer
        } else {
            CursorHint::Default
        })
    }
}
