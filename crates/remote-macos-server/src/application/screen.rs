//! Screen capture encoding: RGBA framebuffer to PNG to base64.

use std::io::Cursor;

use base64::Engine;
use image::{ImageBuffer, ImageFormat, Rgba};

use super::error::ToolError;
use super::responses::ScreenCapture;
use super::session::Framebuffer;

/// Encodes `frame` as a base64 PNG.
///
/// # Errors
///
/// [`ToolError::Encode`] when the pixel buffer does not match the declared
/// dimensions or PNG encoding fails.
pub fn encode_png(frame: Framebuffer) -> Result<ScreenCapture, ToolError> {
    let Framebuffer {
        width,
        height,
        rgba,
    } = frame;
    let buffer_len = rgba.len();
    let image = ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).ok_or_else(|| {
        ToolError::Encode(format!(
            "{buffer_len} bytes do not fill a {width}x{height} RGBA frame"
        ))
    })?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ToolError::Encode(e.to_string()))?;

    Ok(ScreenCapture {
        image_base64: base64::engine::general_purpose::STANDARD.encode(&png),
        width,
        height,
    })
}
