//! Transit lines between pins, with distance and ranked travel options.
//!
//! A gesture starts on a pin and snaps its live endpoint to any other pin
//! within [`PIN_SNAP_RADIUS`]. While anchored, the midpoint annotation runs
//! `Hidden -> Loader -> Distance`: the loader animates through a repaint
//! loop and gives way to the distance label and options panel once the
//! pointer has stayed anchored for [`LOADER_DELAY`].

use super::{Tool, ToolContext, ToolEvent, ToolKind};
use crate::color::SerializableColor;
use crate::entities::{EntityStore, PinId, TransitLine};
use crate::geometry::{arrow_head, distance};
use crate::snap::{LineEnd, PIN_SNAP_RADIUS, pin_at, snap_endpoint};
use crate::surface::{LineStyle, RenderContext, Snapshot, TextAlign, TextBaseline, measure_text};
use crate::toolbar::{ControlId, ControlInput, CursorHint, ToolbarControl, slider_value};
use crate::travel::{TransitOption, pixels_to_km, transit_options};
use kurbo::{Point, Rect};
use std::time::Duration;
use uuid::Uuid;

pub const MIN_LINE_WIDTH: f64 = 1.0;
pub const MAX_LINE_WIDTH: f64 = 10.0;

/// How long the endpoint must stay anchored before the distance shows.
pub const LOADER_DELAY: Duration = Duration::from_millis(500);

const DASH: (f32, f32) = (10.0, 5.0);
const ARROW_LENGTH: f64 = 15.0;
const ENDPOINT_RADIUS: f64 = 5.0;
const LABEL_OFFSET: f64 = -15.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const LOADER_RADIUS: f64 = 12.0;
const LOADER_DOT_RADIUS: f64 = 2.0;
const LOADER_DOT_SPACING: f64 = 6.0;
/// Display frames per loader dot.
const FRAMES_PER_DOT: u64 = 4;
const PANEL_GAP: f64 = 12.0;
const PANEL_ROW_HEIGHT: f64 = 22.0;
const PANEL_PADDING: f64 = 8.0;
const PANEL_FONT_SIZE: f64 = 12.0;

/// Midpoint annotation of an in-progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAnnotation {
    Hidden,
    Loader { since: Duration },
    Distance,
}

#[derive(Debug, Clone)]
struct LineGesture {
    start_pin: PinId,
    start: Point,
    end: LineEnd,
    pre_line: Snapshot,
    annotation: LineAnnotation,
    /// Loader animation frame.
    frame: u64,
    /// Option picked in the panel, if any.
    picked: Option<usize>,
}

impl LineGesture {
    fn distance(&self) -> u32 {
        pixels_to_km(distance(self.start, self.end.point()))
    }

    fn midpoint(&self) -> Point {
        self.start.midpoint(self.end.point())
    }

    /// Advance the annotation state machine to `now`.
    fn update_annotation(&mut self, now: Duration) {
        if !self.end.is_anchored() {
            self.annotation = LineAnnotation::Hidden;
            self.frame = 0;
            self.picked = None;
            return;
        }
        match self.annotation {
            LineAnnotation::Hidden => {
                self.annotation = LineAnnotation::Loader { since: now };
                self.frame = 0;
            }
            LineAnnotation::Loader { since } if now.saturating_sub(since) >= LOADER_DELAY => {
                self.annotation = LineAnnotation::Distance;
                self.frame = 0;
            }
            _ => {}
        }
    }

    fn options(&self) -> Vec<TransitOption> {
        transit_options(self.distance())
    }
}

/// Draws transit lines between pins.
#[derive(Debug, Clone)]
pub struct TransitTool {
    pub color: SerializableColor,
    pub width: f64,
    gesture: Option<LineGesture>,
    hovering: bool,
}

impl Default for TransitTool {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 3.0,
            gesture: None,
            hovering: false,
        }
    }
}

impl TransitTool {
    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn annotation(&self) -> Option<LineAnnotation> {
        self.gesture.as_ref().map(|g| g.annotation)
    }

    /// Option currently picked in the panel.
    pub fn picked_option(&self) -> Option<usize> {
        self.gesture.as_ref().and_then(|g| g.picked)
    }

    /// Row rectangles of the visible options panel.
    pub fn panel_rows(&self) -> Vec<Rect> {
        match &self.gesture {
            Some(g) if g.annotation == LineAnnotation::Distance => panel_rows(g.midpoint(), &g.options()),
            _ => Vec::new(),
        }
    }

    fn render(&self, cx: &mut ToolContext<'_>) {
        let Some(g) = &self.gesture else {
            return;
        };
        cx.surface.restore(&g.pre_line);
        let mut rc = cx.surface.context();
        let end = g.end.point();
        draw_line(&mut rc, g.start, end, self.color, self.width, g.distance(), g.annotation, g.frame);
        if g.annotation == LineAnnotation::Distance {
            let options = g.options();
            draw_panel(&mut rc, g.midpoint(), &options, g.picked.unwrap_or(0), self.color);
        }
    }

    /// Abandon the gesture and put the buffer back.
    fn cancel(&mut self, cx: &mut ToolContext<'_>) {
        if let Some(g) = self.gesture.take() {
            cx.surface.restore(&g.pre_line);
            log::debug!("Transit line cancelled");
        }
    }
}

impl Tool for TransitTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Transit
    }

    fn on_pointer_down(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        if self.gesture.is_some() {
            // a second pointer pressing a panel row picks it; the first one holds the gesture
            let row = self
                .panel_rows()
                .iter()
                .position(|r| r.contains(event.position));
            if let Some(row) = row {
                if let Some(g) = self.gesture.as_mut() {
                    g.picked = Some(row);
                }
                self.render(cx);
            }
            return;
        }

        let pins = cx.store.pins();
        let Some(index) = pin_at(pins, event.position, PIN_SNAP_RADIUS) else {
            return;
        };
        let start = pins[index].position;
        self.gesture = Some(LineGesture {
            start_pin: pins[index].id,
            start,
            end: LineEnd::Free(start),
            pre_line: cx.surface.snapshot(),
            annotation: LineAnnotation::Hidden,
            frame: 0,
            picked: None,
        });
    }

    fn on_pointer_move(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        self.hovering = pin_at(cx.store.pins(), event.position, PIN_SNAP_RADIUS).is_some();
        let Some(g) = self.gesture.as_mut() else {
            return;
        };
        g.end = snap_endpoint(cx.store.pins(), event.position, g.start_pin);
        g.update_annotation(event.at);
        self.render(cx);
    }

    fn on_pointer_up(&mut self, cx: &mut ToolContext<'_>, event: ToolEvent) {
        let Some(g) = self.gesture.take() else {
            return;
        };
        cx.surface.restore(&g.pre_line);

        let pins = cx.store.pins();
        let end_pin = pin_at(pins, event.position, PIN_SNAP_RADIUS)
            .map(|i| &pins[i])
            .filter(|pin| pin.id != g.start_pin);
        let Some(end_pin) = end_pin else {
            log::trace!("Transit gesture ended off a target pin");
            return;
        };

        let end = end_pin.position;
        let km = pixels_to_km(distance(g.start, end));
        let options = transit_options(km);
        let selected = g.picked.filter(|&i| i < options.len()).or((!options.is_empty()).then_some(0));
        let line = TransitLine {
            id: Uuid::new_v4(),
            start_pin: g.start_pin,
            end_pin: end_pin.id,
            start: g.start,
            end,
            distance: km,
            options,
            selected_option_index: selected,
        };

        draw_line(
            &mut cx.surface.context(),
            line.start,
            line.end,
            self.color,
            self.width,
            km,
            LineAnnotation::Distance,
            0,
        );
        cx.store.add_line(line);
        cx.commit_snapshot();
    }

    fn on_pointer_leave(&mut self, cx: &mut ToolContext<'_>, _event: ToolEvent) {
        self.hovering = false;
        self.cancel(cx);
    }

    fn on_frame(&mut self, cx: &mut ToolContext<'_>, now: Duration) {
        let Some(g) = self.gesture.as_mut() else {
            return;
        };
        if !matches!(g.annotation, LineAnnotation::Loader { .. }) {
            return;
        }
        g.frame += 1;
        g.update_annotation(now);
        self.render(cx);
    }

    fn wants_frames(&self) -> bool {
        matches!(self.annotation(), Some(LineAnnotation::Loader { .. }))
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) {
        self.hovering = false;
        self.cancel(cx);
    }

    fn toolbar(&self, _store: &EntityStore) -> Vec<ToolbarControl> {
        vec![
            ToolbarControl::color(ControlId::LineColor, "Line Color", self.color),
            ToolbarControl::slider(
                ControlId::LineWidth,
                format!("Line Width: {}px", self.width),
                self.width,
                MIN_LINE_WIDTH,
                MAX_LINE_WIDTH,
            ),
        ]
    }

    fn apply_control(&mut self, _cx: &mut ToolContext<'_>, id: ControlId, input: ControlInput) -> bool {
        match (id, input) {
            (ControlId::LineColor, ControlInput::Color(color)) => self.color = color,
            (ControlId::LineWidth, ControlInput::Number(value)) => {
                self.width = slider_value(value, MIN_LINE_WIDTH, MAX_LINE_WIDTH);
            }
            _ => return false,
        }
        true
    }

    fn cursor(&self) -> Option<CursorHint> {
        Some(if self.hovering {
            CursorHint::Pointer
        } else {
            CursorHint::Crosshair
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_line(
    rc: &mut RenderContext<'_>,
    start: Point,
    end: Point,
    color: SerializableColor,
    width: f64,
    km: u32,
    annotation: LineAnnotation,
    frame: u64,
) {
    rc.stroke_line(start, end, &LineStyle::dashed(color, width, DASH.0, DASH.1));
    if start != end {
        rc.fill_polygon(&arrow_head(start, end, ARROW_LENGTH), color);
    }

    let mid = start.midpoint(end);
    let label = Point::new(mid.x, mid.y + LABEL_OFFSET);
    let backdrop = SerializableColor::white().with_alpha(0.95);
    match annotation {
        LineAnnotation::Distance => {
            let text = format!("{km} km");
            let text_width = measure_text(&text, LABEL_FONT_SIZE);
            let padding = 6.0;
            let bg = Rect::new(
                label.x - text_width / 2.0 - padding,
                label.y - 18.0,
                label.x + text_width / 2.0 + padding,
                label.y + 4.0,
            );
            rc.fill_rect(bg, backdrop);
            rc.stroke_rect(bg, color, 2.0);
            rc.fill_text(&text, label, LABEL_FONT_SIZE, color, TextAlign::Center, TextBaseline::Bottom);
        }
        LineAnnotation::Loader { .. } => {
            rc.fill_circle(label, LOADER_RADIUS, backdrop);
            rc.stroke_circle(label, LOADER_RADIUS, color, 2.0);
            let cycle = (frame / FRAMES_PER_DOT) % 3;
            for i in 0..3u64 {
                let opacity = if i == cycle {
                    1.0
                } else if i == (cycle + 2) % 3 {
                    0.5
                } else {
                    0.3
                };
                let dot = Point::new(label.x - LOADER_DOT_SPACING + i as f64 * LOADER_DOT_SPACING, label.y);
                rc.fill_circle(dot, LOADER_DOT_RADIUS, color.with_alpha(opacity));
            }
        }
        LineAnnotation::Hidden => {}
    }

    rc.fill_circle(start, ENDPOINT_RADIUS, color);
    rc.fill_circle(end, ENDPOINT_RADIUS, color);
}

/// Rows of the options panel hanging below `mid`.
fn panel_rows(mid: Point, options: &[TransitOption]) -> Vec<Rect> {
    let width = options
        .iter()
        .map(|o| measure_text(&o.summary(), PANEL_FONT_SIZE))
        .fold(0.0, f64::max)
        + PANEL_PADDING * 2.0;
    let left = mid.x - width / 2.0;
    let top = mid.y + PANEL_GAP;
    (0..options.len())
        .map(|i| {
            let y = top + i as f64 * PANEL_ROW_HEIGHT;
            Rect::new(left, y, left + width, y + PANEL_ROW_HEIGHT)
        })
        .collect()
}

fn draw_panel(
    rc: &mut RenderContext<'_>,
    mid: Point,
    options: &[TransitOption],
    picked: usize,
    accent: SerializableColor,
) {
    let rows = panel_rows(mid, options);
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return;
    };
    let panel = first.union(*last);
    rc.fill_rect(panel, SerializableColor::white().with_alpha(0.95));
    rc.stroke_rect(panel, SerializableColor::rgb(0xe0, 0xe0, 0xe0), 1.0);

    for (i, (row, option)) in rows.iter().zip(options).enumerate() {
        if i == picked {
            rc.fill_rect(*row, accent.with_alpha(0.15));
        }
        rc.fill_text(
            &option.summary(),
            Point::new(row.x0 + PANEL_PADDING, row.center().y),
            PANEL_FONT_SIZE,
            SerializableColor::black(),
            TextAlign::Left,
            TextBaseline::Middle,
        );
    }
}
