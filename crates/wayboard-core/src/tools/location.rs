//! Location pins: place, drag and relabel.

use super::{Tool, ToolContext, ToolEvent, ToolKind};
use crate::color::SerializableColor;
use crate::entities::{DEFAULT_PIN_LABEL, EntityStore, Pin, PinId};
use crate::geometry::displacement;
use crate::snap::{PIN_CLICK_RADIUS, pin_at};
use crate::surface::{RenderContext, Snapshot, TextAlign, TextBaseline, measure_text};
use crate::toolbar::{ControlId, ControlInput, CursorHint, ToolbarControl};
use kurbo::{Point, Rect};

/// Pin glyph height in logical pixels.
pub const PIN_SIZE: f64 = 30.0;

/// Pointer travel that turns a press on a pin into a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

const LABEL_FONT_SIZE: f64 = 14.0;
const LABEL_GAP: f64 = 8.0;
const LABEL_PADDING: f64 = 4.0;
const LABEL_TEXT_HEIGHT: f64 = 18.0;
const MAX_SUGGESTIONS: usize = 5;

/// Popular destinations offered as label suggestions, sorted.
pub const DESTINATIONS: [&str; 30] = [
    "Amsterdam, Netherlands",
    "Bali, Indonesia",
    "Bangkok, Thailand",
    "Barcelona, Spain",
    "Berlin, Germany",
    "Cairo, Egypt",
    "Cape Town, South Africa",
    "Dubai, UAE",
    "Florence, Italy",
    "Hong Kong",
    "Istanbul, Turkey",
    "London, UK",
    "Los Angeles, USA",
    "Maldives",
    "Marrakech, Morocco",
    "Mexico City, Mexico",
    "Mumbai, India",
    "New York, USA",
    "Paris, France",
    "Prague, Czech Republic",
    "Reykjavik, Iceland",
    "Rio de Janeiro, Brazil",
    "Rome, Italy",
    "Santorini, Greece",
    "Seoul, South Korea",
    "Singapore",
    "Sydney, Australia",
    "Tokyo, Japan",
    "Venice, Italy",
    "Vienna, Austria",
];

/// Up to five destinations containing `query`, ignoring case.
pub fn destination_suggestions(query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    DESTINATIONS
        .iter()
        .copied()
        .filter(|dest| dest.to_lowercase().contains(&query))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Anchor of the label text for a pin at `position`.
fn label_anchor(position: Point) -> Point {
    Point::new(position.x + PIN_SIZE / 2.0 + LABEL_GAP, position.y - PIN_SIZE / 2.0)
}

fn label_box(position: Point, text_width: f64) -> Rect {
    let anchor = label_anchor(position);
    let x0 = anchor.x - LABEL_PADDING;
    let y0 = anchor.y - LABEL_TEXT_HEIGHT / 2.0 - LABEL_PADDING;
    Rect::new(
        x0,
        y0,
        x0 + text_width + LABEL_PADDING * 2.0,
        y0 + LABEL_TEXT_HEIGHT + LABEL_PADDING * 2.0,
    )
}

/// Area covered by a pin glyph and its label, outlines included.
pub fn pin_bounds(position: Point, label: &str) -> Rect {
    let head = PIN_SIZE / 3.0;
    let glyph = Rect::new(
        position.x - head,
        position.y - PIN_SIZE / 2.0 - head,
        position.x + head,
        position.y + PIN_SIZE / 4.0,
    );
    let bounds = if label.is_empty() {
        glyph
    } else {
        glyph.union(label_box(position, measure_text(label, LABEL_FONT_SIZE)))
    };
    // stroke half-widths plus anti-aliasing
    bounds.inflate(2.0, 2.0)
}

/// Draw a teardrop pin with its label box.
pub fn draw_pin(rc: &mut RenderContext<'_>, position: Point, color: SerializableColor, label: &str) {
    let Point { x, y } = position;
    let head_center = Point::new(x, y - PIN_SIZE / 2.0);
    let head_radius = PIN_SIZE / 3.0;
    let quarter = PIN_SIZE / 4.0;
    let point = [
        Point::new(x - quarter, y - quarter),
        Point::new(x, y + quarter),
        Point::new(x + quarter, y - quarter),
    ];

    rc.fill_circle(head_center, head_radius, color);
    rc.fill_polygon(&point, color);
    rc.fill_circle(head_center, PIN_SIZE / 6.0, SerializableColor::white());
    rc.stroke_circle(head_center, head_radius, SerializableColor::black(), 1.5);
    rc.stroke_polygon(&point, SerializableColor::black(), 1.5);

    if label.is_empty() {
        return;
    }
    let text_width = measure_text(label, LABEL_FONT_SIZE);
    let bg = label_box(position, text_width);
    rc.fill_rect(bg, SerializableColor::white().with_alpha(0.9));
    rc.stroke_rect(bg, SerializableColor::rgb(0xe0, 0xe0, 0xe0), 1.0);
    rc.fill_text(
        label,
        label_anchor(position),
        LABEL_FONT_SIZE,
        SerializableColor::black(),
        TextAlign::Left,
        TextBaseline::Middle,
    );
}

#[derive(Debug, Clone)]
struct Drag {
    pin: PinId,
    origin: Point,
    current: Point,
    moved: bool,
    pre_drag: Snapshot,
}

/// Places pins on empty space; drags or selects them when pressed.
#[derive(Debug, Clone)]
pub struct LocationTool {
    pub color: SerializableColor,
    /// Label field: used for new pins and edits the selected pin.
    pub label: String,
    selected: Option<PinId>,
    drag: Option<Drag>,
    hovering: bool,
    /// A label edit was drawn but not yet committed to history.
    label_dirty: bool,
}

impl Default for LocationTool {
    fn default() -> Self {
        Self {
            color: SerializableColor::rgb(0xff, 0, 0),
            label: String::new(),
            selected: None,
            drag: None,
            hovering: false,
            label_dirty: false,
        }
    }
}

impl LocationTool {
    pub fn selected(&self) -> Option<PinId> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn commit_label_edit(&mut self, cx: &mut ToolContext<'_>) {
        if std::mem::take(&mut self.label_dirty) {
            cx.commit_snapshot();
        }
    }

    /// Repaint the drag preview with the dragged pin at `at`.
    fn render_drag(cx: &mut ToolContext<'_>, drag: &Drag, at: Point) {
        cx.surface.restore(&drag.pre_drag);
        let mut rc = cx.surface.context();
        if let Some(pin) = cx.store.pin(drag.pin) {
            rc.clear_rect(pin_bounds(pin.position, &pin.label));
        }
        for pin in cx.store.pins() {
            let position = if pin.id == drag.pin { at } else { pin.position };
            draw_pin(&mut rc, position, pin.color, &pin.label);
        }
    }

    fn finish_drag(&mut self, cx: &mut ToolContext<'_>, release: Point) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        if displacement(drag.origin, release) >= DRAG_THRESHOLD {
            drag.moved = true;
        }

        if drag.moved {
            Self::render_drag(cx, &drag, release);
            cx.store.move_pin(drag.pin, release);
            cx.commit_snapshot();
            self.selected = None;
            log::debug!("Moved pin {} to {:?}", drag.pin, release);
        } else {
            cx.surface.restore(&drag.pre_drag);
            log::debug!("Selected pin {} for editing", drag.pin);
        }
    }

    fn place_pin(&mut self, cx: &mut ToolContext<'_>, position: Point) {
        let pin = Pin::new(position, self.label.clone(), self.color);
        draw_pin(&mut cx.surface.context(), pin.position, pin.color, &pin.label);
        cx.store.add_pin(pin);
        cx.commit_snapshot();
        self.selected = None;
    }

    /// Live relabel of the selected pin, without a history entry.
    fn relabel_selected(&mut self, cx: &mut ToolContext<'_>) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(pin) = cx.store.pin(id) else {
            self.selected = None;
            return;
        };
        let old_bounds = pin_bounds(pin.position, &pin.label);
        let (position, color) = (pin.position, pin.color);

        cx.store.set_pin_label(id, self.label.clone());
        let mut rc = cx.surface.context();
        rc.clear_rect(old_bounds);
        draw_pin(&mut rc, position, color, &self.label);
        self.label_dirty = true;
    }
}

impl Tool for LocationTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Location
    }

    fn on_pointer_down(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        self.commit_label_edit(cx);

        let position = event.position;
        match pin_at(cx.store.pins(), position, PIN_CLICK_RADIUS) {
            Some(index) => {
                let pin = &cx.store.pins()[index];
                self.selected = Some(pin.id);
                self.label = pin.label.clone();
                self.drag = Some(Drag {
                    pin: pin.id,
                    origin: position,
                    current: position,
                    moved: false,
                    pre_drag: cx.surface.snapshot(),
                });
            }
            None => self.place_pin(cx, position),
        }
    }

    fn on_pointer_move(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        let Some(drag) = self.drag.as_mut() else {
            self.hovering = pin_at(cx.store.pins(), event.position, PIN_CLICK_RADIUS).is_some();
            return;
        };
        if displacement(drag.origin, event.position) >= DRAG_THRESHOLD {
            drag.moved = true;
        }
        drag.current = event.position;
        Self::render_drag(cx, drag, event.position);
    }

    fn on_pointer_up(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        self.finish_drag(cx, event.position);
    }

    fn on_pointer_leave(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        self.hovering = false;
        self.finish_drag(cx, event.position);
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) {
        self.hovering = false;
        if let Some(current) = self.drag.as_ref().map(|d| d.current) {
            self.finish_drag(cx, current);
        }
        self.commit_label_edit(cx);
    }

    fn toolbar(&self, _store: &EntityStore) -> Vec<ToolbarControl> {
        let suggestions = destination_suggestions(&self.label)
            .into_iter()
            .map(String::from)
            .collect();
        vec![
            ToolbarControl::color(ControlId::PinColor, "Pin Color", self.color),
            ToolbarControl::text(ControlId::PinLabel, "Pin Location", &self.label, DEFAULT_PIN_LABEL)
                .with_suggestions(suggestions),
        ]
    }

    fn apply_control(&mut self, cx: &mut ToolContext<'_>, id: ControlId, input: ControlInput) -> bool {
        match (id, input) {
            (ControlId::PinColor, ControlInput::Color(color)) => self.color = color,
            (ControlId::PinLabel, ControlInput::Text(label)) => {
                self.label = label;
                if self.drag.is_none() {
                    self.relabel_selected(cx);
                }
            }
            _ => return false,
        }
        true
    }

    fn cursor(&self) -> Option<CursorHint> {
        Some(if self.hovering {
            CursorHint::Move
        } else {
            CursorHint::Crosshair
        })
    }
}
