//! Label text: glyph outlines from a system sans-serif font.

use super::paint::{TextAlign, TextBaseline};
use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use kurbo::Point;
use rusttype::{Font, OutlineBuilder, Scale, point as rt_point};
use std::sync::OnceLock;
use tiny_skia::{Path, PathBuilder};

/// Average glyph advance as a fraction of the font size, used when no font is available.
const FALLBACK_ADVANCE: f64 = 0.55;

fn label_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = load_system_sans();
        if font.is_none() {
            log::warn!("No system sans-serif font found; labels render without text");
        }
        font
    })
    .as_ref()
}

fn load_system_sans() -> Option<Font<'static>> {
    let mut db = Database::new();
    db.load_system_fonts();

    let query = Query {
        families: &[Family::SansSerif, Family::Name("Arial"), Family::Name("DejaVu Sans")],
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db.query(&query)?;
    let face = db.face(id)?;
    let bytes = match &face.source {
        Source::File(path) | Source::SharedFile(path, _) => std::fs::read(path).ok()?,
        Source::Binary(data) => data.as_ref().as_ref().to_vec(),
    };
    log::debug!("Using label font {:?}", face.post_script_name);
    Font::try_from_vec_and_index(bytes, face.index)
}

/// Width of `content` rendered at `size` px.
pub fn measure_text(content: &str, size: f64) -> f64 {
    match label_font() {
        Some(font) => {
            let scale = Scale::uniform(size as f32);
            font.layout(content, scale, rt_point(0.0, 0.0))
                .last()
                .map(|g| (g.position().x + g.unpositioned().h_metrics().advance_width) as f64)
                .unwrap_or(0.0)
        }
        None => content.chars().count() as f64 * size * FALLBACK_ADVANCE,
    }
}

/// Build a fillable path for `content`, positioned relative to `anchor`.
pub(super) fn text_path(
    content: &str,
    anchor: Point,
    size: f64,
    align: TextAlign,
    baseline: TextBaseline,
) -> Option<Path> {
    let font = label_font()?;
    let scale = Scale::uniform(size as f32);
    let v_metrics = font.v_metrics(scale);

    let x = match align {
        TextAlign::Left => anchor.x,
        TextAlign::Center => anchor.x - measure_text(content, size) / 2.0,
    } as f32;
    // descent is negative (below the baseline)
    let y = match baseline {
        TextBaseline::Middle => anchor.y as f32 + (v_metrics.ascent + v_metrics.descent) / 2.0,
        TextBaseline::Bottom => anchor.y as f32 + v_metrics.descent,
    };

    let mut sink = PathSink(PathBuilder::new());
    for glyph in font.layout(content, scale, rt_point(x, y)) {
        glyph.build_outline(&mut sink);
    }
    sink.0.finish()
}

struct PathSink(PathBuilder);

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_grows_with_content() {
        let short = measure_text("Rome", 14.0);
        let long = measure_text("Rome, Italy", 14.0);
        assert!(long > short);
        assert_eq!(measure_text("", 14.0), 0.0);
    }

    #[test]
    fn test_measure_scales_with_size() {
        assert!(measure_text("Paris", 28.0) > measure_text("Paris", 14.0));
    }
}
