//! Raster surface: the pixel buffer every tool paints into.
//!
//! The surface keeps its buffer in device pixels (logical size times the
//! device scale factor) and exposes a [`RenderContext`] that paints in
//! logical coordinates. Snapshots are full-buffer copies used by the
//! history stack and by tools that preview uncommitted edits.

mod paint;
mod text;

pub use paint::{LineStyle, RenderContext, TextAlign, TextBaseline};
pub use text::measure_text;

use crate::color::SerializableColor;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tiny_skia::{BlendMode, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Cannot allocate a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32 },
}

/// How new paint combines with the pixels already in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompositeOp {
    /// Paint over existing pixels.
    #[default]
    SourceOver,
    /// Remove existing pixels where paint lands.
    DestinationOut,
}

impl CompositeOp {
    pub(crate) fn blend_mode(self) -> BlendMode {
        match self {
            CompositeOp::SourceOver => BlendMode::SourceOver,
            CompositeOp::DestinationOut => BlendMode::DestinationOut,
        }
    }
}

/// An immutable copy of the buffer contents at a point in time.
#[derive(Clone)]
pub struct Snapshot {
    pixels: Arc<Pixmap>,
}

impl Snapshot {
    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
            || (self.width() == other.width()
                && self.height() == other.height()
                && self.pixels.data() == other.pixels.data())
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// The mutable pixel buffer representing the visible drawing.
pub struct RasterSurface {
    pixmap: Pixmap,
    /// Host container size in logical pixels.
    logical_size: Size,
    /// Device pixels per logical pixel.
    scale_factor: f64,
    background: SerializableColor,
    /// Compositing mode applied by render contexts (persists across calls).
    composite: CompositeOp,
    /// Bumped on every buffer mutation.
    revision: u64,
}

impl RasterSurface {
    /// Create a 1x1 surface with no logical size yet.
    pub fn new(scale_factor: f64, background: SerializableColor) -> Result<Self, SurfaceError> {
        let scale_factor = sanitize_scale(scale_factor);
        let mut pixmap = allocate(1, 1)?;
        pixmap.fill(background.into());
        Ok(Self {
            pixmap,
            logical_size: Size::ZERO,
            scale_factor,
            background,
            composite: CompositeOp::default(),
            revision: 0,
        })
    }

    /// Resize to the host container's logical size.
    ///
    /// Returns `Ok(false)` without touching the buffer when the size is
    /// unchanged. Otherwise a new buffer is allocated, filled with the
    /// background, and the previous content is copied forward.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<bool, SurfaceError> {
        let size = Size::new(width.max(0.0), height.max(0.0));
        if size == self.logical_size {
            return Ok(false);
        }
        self.reallocate(size, self.scale_factor)?;
        log::debug!(
            "Surface resized to {}x{} logical ({}x{} device)",
            size.width,
            size.height,
            self.pixmap.width(),
            self.pixmap.height()
        );
        Ok(true)
    }

    /// Change the device scale factor, rescaling existing content.
    pub fn set_scale_factor(&mut self, scale_factor: f64) -> Result<bool, SurfaceError> {
        let scale_factor = sanitize_scale(scale_factor);
        if scale_factor == self.scale_factor {
            return Ok(false);
        }
        self.reallocate(self.logical_size, scale_factor)?;
        Ok(true)
    }

    fn reallocate(&mut self, logical_size: Size, scale_factor: f64) -> Result<(), SurfaceError> {
        let width = device_extent(logical_size.width, scale_factor);
        let height = device_extent(logical_size.height, scale_factor);
        let mut pixmap = allocate(width, height)?;
        pixmap.fill(self.background.into());

        let ratio = (scale_factor / self.scale_factor) as f32;
        let quality = if ratio == 1.0 {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let paint = PixmapPaint {
            blend_mode: BlendMode::Source,
            quality,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(
            0,
            0,
            self.pixmap.as_ref(),
            &paint,
            Transform::from_scale(ratio, ratio),
            None,
        );

        self.pixmap = pixmap;
        self.logical_size = logical_size;
        self.scale_factor = scale_factor;
        self.touch();
        Ok(())
    }

    /// Take an immutable copy of the current buffer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixels: Arc::new(self.pixmap.clone()),
        }
    }

    /// Overwrite the buffer with a previously taken snapshot.
    ///
    /// A snapshot taken at another size is copied 1:1 from the top-left
    /// corner; uncovered pixels get the background fill.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        let source: &Pixmap = &snapshot.pixels;
        if source.width() == self.pixmap.width() && source.height() == self.pixmap.height() {
            self.pixmap.data_mut().copy_from_slice(source.data());
        } else {
            self.pixmap.fill(self.background.into());
            let paint = PixmapPaint {
                blend_mode: BlendMode::Source,
                ..PixmapPaint::default()
            };
            self.pixmap
                .draw_pixmap(0, 0, source.as_ref(), &paint, Transform::identity(), None);
        }
        self.touch();
    }

    /// Reset the whole buffer to the background fill.
    pub fn clear(&mut self) {
        self.pixmap.fill(self.background.into());
        self.touch();
    }

    /// Borrow a render context that paints in logical coordinates.
    pub fn context(&mut self) -> RenderContext<'_> {
        self.touch();
        let scale = self.scale_factor as f32;
        RenderContext::new(
            &mut self.pixmap,
            Transform::from_scale(scale, scale),
            self.composite,
            self.background,
        )
    }

    pub fn composite(&self) -> CompositeOp {
        self.composite
    }

    pub fn set_composite(&mut self, composite: CompositeOp) {
        self.composite = composite;
    }

    /// Counter that changes whenever the buffer is written.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Whether the host container has no area yet.
    pub fn is_empty(&self) -> bool {
        self.logical_size.width <= 0.0 || self.logical_size.height <= 0.0
    }

    pub fn logical_size(&self) -> Size {
        self.logical_size
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn background(&self) -> SerializableColor {
        self.background
    }

    /// Buffer width in device pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Buffer height in device pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha color of a device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<SerializableColor> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(SerializableColor::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Demultiplied RGBA8 rows, suitable for image encoders.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("logical_size", &self.logical_size)
            .field("scale_factor", &self.scale_factor)
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("composite", &self.composite)
            .field("revision", &self.revision)
            .finish()
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, SurfaceError> {
    Pixmap::new(width, height).ok_or(SurfaceError::Allocation { width, height })
}

fn device_extent(logical: f64, scale_factor: f64) -> u32 {
    (logical * scale_factor).round().max(1.0).min(u32::MAX as f64) as u32
}

fn sanitize_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn surface() -> RasterSurface {
        let mut s = RasterSurface::new(1.0, SerializableColor::white()).unwrap();
        s.resize(40.0, 30.0).unwrap();
        s
    }

    #[test]
    fn test_new_surface_is_one_pixel() {
        let s = RasterSurface::new(2.0, SerializableColor::white()).unwrap();
        assert_eq!((s.width(), s.height()), (1, 1));
        assert!(s.is_empty());
    }

    #[test]
    fn test_resize_scales_by_device_ratio() {
        let mut s = RasterSurface::new(2.0, SerializableColor::white()).unwrap();
        assert!(s.resize(40.0, 30.0).unwrap());
        assert_eq!((s.width(), s.height()), (80, 60));
        assert!(!s.is_empty());
    }

    #[test]
    fn test_resize_unchanged_is_noop() {
        let mut s = surface();
        let rev = s.revision();
        assert!(!s.resize(40.0, 30.0).unwrap());
        assert_eq!(s.revision(), rev);
    }

    #[test]
    fn test_zero_size_keeps_one_pixel() {
        let mut s = surface();
        s.resize(0.0, 0.0).unwrap();
        assert_eq!((s.width(), s.height()), (1, 1));
        assert!(s.is_empty());
    }

    #[test]
    fn test_resize_preserves_content() {
        let mut s = surface();
        s.context().fill_circle(Point::new(10.0, 10.0), 4.0, SerializableColor::black());
        s.resize(80.0, 60.0).unwrap();
        assert_eq!(s.pixel(10, 10), Some(SerializableColor::black()));
        assert_eq!(s.pixel(70, 50), Some(SerializableColor::white()));
    }

    #[test]
    fn test_scale_change_rescales_content() {
        let mut s = surface();
        s.context().fill_rect(kurbo::Rect::new(0.0, 0.0, 10.0, 10.0), SerializableColor::black());
        s.set_scale_factor(2.0).unwrap();
        assert_eq!((s.width(), s.height()), (80, 60));
        let inside = s.pixel(10, 10).unwrap();
        assert!(inside.r < 8 && inside.a == 255);
        let outside = s.pixel(40, 40).unwrap();
        assert!(outside.r > 247);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut s = surface();
        let before = s.snapshot();
        s.context().fill_circle(Point::new(20.0, 15.0), 6.0, SerializableColor::black());
        assert_ne!(s.snapshot(), before);
        s.restore(&before);
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_restore_smaller_snapshot_pads_with_background() {
        let mut s = surface();
        s.context().fill_rect(kurbo::Rect::new(0.0, 0.0, 40.0, 30.0), SerializableColor::black());
        let small = s.snapshot();
        s.resize(60.0, 30.0).unwrap();
        s.context().fill_rect(kurbo::Rect::new(0.0, 0.0, 60.0, 30.0), SerializableColor::black());
        s.restore(&small);
        assert_eq!(s.pixel(5, 5), Some(SerializableColor::black()));
        assert_eq!(s.pixel(50, 5), Some(SerializableColor::white()));
    }

    #[test]
    fn test_clear_resets_background() {
        let mut s = surface();
        let blank = s.snapshot();
        s.context().fill_circle(Point::new(20.0, 15.0), 6.0, SerializableColor::black());
        s.clear();
        assert_eq!(s.snapshot(), blank);
    }

    #[test]
    fn test_every_write_bumps_revision() {
        let mut s = surface();
        let r0 = s.revision();
        let snap = s.snapshot();
        assert_eq!(s.revision(), r0);
        s.restore(&snap);
        let r1 = s.revision();
        assert!(r1 != r0);
        s.clear();
        assert!(s.revision() != r1);
    }
}
