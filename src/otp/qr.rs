//! QR rendering boundary.
//!
//! Feeds a key URI to the external `qrcode` encoder and returns PNG
//! bytes (or a data URI) the enrollment UI can display. The QR encoding
//! algorithm itself lives entirely in the external crate.

use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};

use crate::otp::error::{OtpError, Result};

/// Pixels per QR module in the default rendering.
pub const DEFAULT_MODULE_PX: u32 = 8;
/// Quiet-zone border width, in modules.
pub const DEFAULT_QUIET_ZONE: u32 = 4;

/// Render text (typically a key URI) as a grayscale PNG.
///
/// `module_px` scales each QR module to a square of that many pixels;
/// `quiet_zone` adds the white border scanners expect.
pub fn render_qr_png(text: &str, module_px: u32, quiet_zone: u32) -> Result<Vec<u8>> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| OtpError::QrEncode(e.to_string()))?;
    let modules = code.to_colors();
    let width = code.width() as u32;
    let px = module_px.max(1);
    let side = (width + 2 * quiet_zone) * px;

    let img = GrayImage::from_fn(side, side, |x, y| {
        let dark = match ((x / px).checked_sub(quiet_zone), (y / px).checked_sub(quiet_zone)) {
            (Some(mx), Some(my)) if mx < width && my < width => {
                modules[(my * width + mx) as usize] == Color::Dark
            }
            _ => false, // quiet zone
        };
        Luma([if dark { 0u8 } else { 255u8 }])
    });

    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        side,
        side,
        image::ExtendedColorType::L8,
    )
    .map_err(|e| OtpError::QrEncode(e.to_string()))?;
    Ok(buf)
}

/// Render as a `data:image/png;base64,...` URI for direct embedding.
pub fn render_qr_data_uri(text: &str) -> Result<String> {
    use base64::Engine as _;
    let png = render_qr_png(text, DEFAULT_MODULE_PX, DEFAULT_QUIET_ZONE)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}
