//! PNG export of the surface buffer.

use std::path::Path;

use wayboard_core::RasterSurface;

use crate::error::{AppError, Result};

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}

/// Write the surface's device-resolution pixels to `path`.
pub fn write_png(surface: &RasterSurface, path: &Path) -> Result<usize> {
    if surface.is_empty() {
        return Err(AppError::NotMounted);
    }
    let png_data = encode_png(&surface.to_rgba8(), surface.width(), surface.height())?;
    std::fs::write(path, &png_data).map_err(|e| AppError::io(path, e))?;
    log::info!("PNG export complete: {} bytes to {}", png_data.len(), path.display());
    Ok(png_data.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature() {
        let data = encode_png(&[255, 0, 0, 255].repeat(4), 2, 2).unwrap();
        assert_eq!(&data[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        assert!(encode_png(&[0; 3], 2, 2).is_err());
    }
}
