use ab_glyph::{FontRef, PxScale};
use image::{imageops, GrayImage, Luma};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::{BarcodeError, BarcodeResult};

// Label
//------------------------------------------------------------------------------

static LABEL_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

// 12pt at 96 dpi
const LABEL_SCALE: f32 = 16.0;
const LABEL_GAP: u32 = 2;

/// Grows `symbol` downwards and prints `text` centered under it.
pub fn draw_label(symbol: &GrayImage, text: &str) -> BarcodeResult<GrayImage> {
    let font = FontRef::try_from_slice(LABEL_FONT)
        .map_err(|e| BarcodeError::ImageWrite(format!("label font: {e}")))?;
    let scale = PxScale::from(LABEL_SCALE);
    let (text_w, text_h) = text_size(scale, &font, text);

    let width = symbol.width().max(text_w);
    let height = symbol.height() + LABEL_GAP + text_h.max(LABEL_SCALE as u32) + LABEL_GAP;
    let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));
    imageops::replace(&mut canvas, symbol, ((width - symbol.width()) / 2) as i64, 0);

    let x = ((width - text_w) / 2) as i32;
    let y = (symbol.height() + LABEL_GAP) as i32;
    draw_text_mut(&mut canvas, Luma([0]), x, y, scale, &font, text);
    tracing::debug!(text_w, text_h, "Drew label");

    Ok(canvas)
}
