//! Drawing primitives over the surface buffer, in logical coordinates.

use super::CompositeOp;
use super::text;
use crate::color::SerializableColor;
use kurbo::{Point, Rect};
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash,
    Transform,
};

/// Stroke settings for line segments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: SerializableColor,
    pub width: f64,
    /// Dash pattern as (on, off) lengths.
    pub dash: Option<(f32, f32)>,
}

impl LineStyle {
    pub fn solid(color: SerializableColor, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: SerializableColor, width: f64, on: f32, off: f32) -> Self {
        Self { color, width, dash: Some((on, off)) }
    }
}

/// Horizontal anchoring of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Vertical anchoring of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Anchor is the vertical middle of the text.
    #[default]
    Middle,
    /// Anchor is the bottom of the text's descent.
    Bottom,
}

/// Render context bound to a surface buffer.
///
/// Obtained from [`RasterSurface::context`](super::RasterSurface::context);
/// painting uses the surface's current [`CompositeOp`].
pub struct RenderContext<'a> {
    pixmap: &'a mut Pixmap,
    transform: Transform,
    composite: CompositeOp,
    background: SerializableColor,
}

impl<'a> RenderContext<'a> {
    pub(super) fn new(
        pixmap: &'a mut Pixmap,
        transform: Transform,
        composite: CompositeOp,
        background: SerializableColor,
    ) -> Self {
        Self {
            pixmap,
            transform,
            composite,
            background,
        }
    }

    fn paint(&self, color: SerializableColor) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.into());
        paint.anti_alias = true;
        paint.blend_mode = self.composite.blend_mode();
        paint
    }

    fn fill(&mut self, path: &Path, color: SerializableColor) {
        let paint = self.paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, self.transform, None);
    }

    fn stroke(&mut self, path: &Path, style: &LineStyle) {
        let paint = self.paint(style.color);
        let stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash: style
                .dash
                .and_then(|(on, off)| StrokeDash::new(vec![on, off], 0.0)),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, self.transform, None);
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: SerializableColor) {
        if let Some(path) = circle(center, radius) {
            self.fill(&path, color);
        }
    }

    pub fn stroke_circle(&mut self, center: Point, radius: f64, color: SerializableColor, width: f64) {
        if let Some(path) = circle(center, radius) {
            self.stroke(&path, &LineStyle::solid(color, width));
        }
    }

    /// Fill a closed polygon.
    pub fn fill_polygon(&mut self, points: &[Point], color: SerializableColor) {
        if let Some(path) = polygon(points) {
            self.fill(&path, color);
        }
    }

    /// Outline a closed polygon.
    pub fn stroke_polygon(&mut self, points: &[Point], color: SerializableColor, width: f64) {
        if let Some(path) = polygon(points) {
            self.stroke(&path, &LineStyle::solid(color, width));
        }
    }

    /// Stroke a straight segment with round caps.
    pub fn stroke_line(&mut self, from: Point, to: Point, style: &LineStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        if let Some(path) = pb.finish() {
            self.stroke(&path, style);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: SerializableColor) {
        if let Some(r) = skia_rect(rect) {
            let paint = self.paint(color);
            self.pixmap.fill_rect(r, &paint, self.transform, None);
        }
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: SerializableColor, width: f64) {
        if let Some(r) = skia_rect(rect) {
            let path = PathBuilder::from_rect(r);
            self.stroke(&path, &LineStyle::solid(color, width));
        }
    }

    /// Repaint a region with the background, replacing whatever was there.
    pub fn clear_rect(&mut self, rect: Rect) {
        if let Some(r) = skia_rect(rect) {
            let mut paint = self.paint(self.background);
            paint.blend_mode = BlendMode::Source;
            self.pixmap.fill_rect(r, &paint, self.transform, None);
        }
    }

    /// Fill `text` at `size` px anchored at `anchor`.
    ///
    /// Without a usable system font nothing is drawn.
    pub fn fill_text(
        &mut self,
        content: &str,
        anchor: Point,
        size: f64,
        color: SerializableColor,
        align: TextAlign,
        baseline: TextBaseline,
    ) {
        if content.is_empty() {
            return;
        }
        let Some(path) = text::text_path(content, anchor, size, align, baseline) else {
            return;
        };
        self.fill(&path, color);
    }
}

fn circle(center: Point, radius: f64) -> Option<Path> {
    if radius <= 0.0 {
        return None;
    }
    PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
}

fn polygon(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    let rect = rect.abs();
    tiny_skia::Rect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
}
