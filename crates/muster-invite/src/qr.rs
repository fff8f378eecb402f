//! QR entry-pass rendering.
//!
//! The code encodes only the index number; the scan endpoint accepts exactly
//! that string back. Images are built in memory, nothing touches disk.

use std::io::Cursor;

use qrcode::{EcLevel, QrCode};

use crate::Result;

/// Render `data` as a PNG QR code.
///
/// Error-correction level H (recovers up to 30% damage) and 10-pixel modules
/// with the standard quiet zone, so phone screenshots scan reliably.
pub fn qr_png(data: &str) -> Result<Vec<u8>> {
  let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::H)?;

  let rendered = code
    .render::<image::Luma<u8>>()
    .module_dimensions(10, 10)
    .build();

  let mut buf = Vec::new();
  image::DynamicImage::ImageLuma8(rendered)
    .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

  Ok(buf)
}
