use image::{imageops, RgbaImage};

use crate::{BarcodeError, BarcodeResult, ECLevel};

// Overlay
//------------------------------------------------------------------------------

const OVERLAY_OPACITY: f32 = 0.8;

/// Composites `overlay` at the center of a QR symbol image.
///
/// Overlay pixels act as erasures, so the overlay may cover at most the share of the image
/// the error correction level can restore.
pub fn apply_overlay(canvas: &mut RgbaImage, overlay: &[u8], level: ECLevel) -> BarcodeResult<()> {
    let mut top = image::load_from_memory(overlay)
        .map_err(|e| BarcodeError::ImageLoad(format!("overlay: {e}")))?
        .to_rgba8();

    let ratio = area(top.dimensions()) / area(canvas.dimensions());
    let limit = level.max_overlay_ratio();
    if ratio > limit {
        tracing::error!(?level, ratio, limit, "Overlay covers too much of the symbol");
        return Err(BarcodeError::OverlayTooLarge { level, ratio, limit });
    }

    top.pixels_mut().for_each(|p| p[3] = (p[3] as f32 * OVERLAY_OPACITY).round() as u8);

    let x = (canvas.width() as i64 - top.width() as i64) / 2;
    let y = (canvas.height() as i64 - top.height() as i64) / 2;
    tracing::debug!(x, y, ratio, "Compositing overlay");
    imageops::overlay(canvas, &top, x, y);

    Ok(())
}

fn area((w, h): (u32, u32)) -> f64 {
    w as f64 * h as f64
}
