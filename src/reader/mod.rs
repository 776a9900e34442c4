mod marks;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::{
    convert_metadata,
    engine::{DecodedSymbol, ReaderOptions, SymbolReader},
    resolve_charset, BarcodeError, BarcodeFormat, BarcodeResult, Metadata, DECODERS,
    MULTI_DECODERS,
};

pub use marks::render_marks;

// Barcode
//------------------------------------------------------------------------------

/// One decoded symbol as handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barcode {
    pub value: String,
    pub raw_bytes: Option<Vec<u8>>,
    pub format: BarcodeFormat,
    pub metadata: Vec<Metadata>,
    /// Source image with the symbol outlined, PNG encoded. Only present when requested and
    /// the outline could be drawn.
    pub detected_image: Option<Vec<u8>>,
}

impl Barcode {
    fn from_symbol(sym: DecodedSymbol, marks_on: Option<&DynamicImage>) -> Self {
        let detected_image = marks_on.and_then(|img| mark_symbol(&sym, img));
        let raw_bytes = Some(sym.raw_bytes).filter(|b| !b.is_empty());
        Self {
            value: sym.text,
            raw_bytes,
            format: sym.format,
            metadata: convert_metadata(sym.metadata),
            detected_image,
        }
    }
}

// Mark rendering is best effort and never discards the decoded symbol
fn mark_symbol(sym: &DecodedSymbol, img: &DynamicImage) -> Option<Vec<u8>> {
    match render_marks(&sym.points, sym.orientation(), img) {
        Ok(png) => png,
        Err(e) => {
            tracing::warn!(format = %sym.format, error = %e, "Failed to render detection marks");
            None
        }
    }
}

// Decoding
//------------------------------------------------------------------------------

/// Decodes the first symbol found in `image`. Without a format hint every format in
/// [`DECODERS`] is tried. Finding nothing is `Ok(None)`.
pub fn decode<R: SymbolReader>(
    reader: &R,
    image: &[u8],
    format: Option<&str>,
    want_marks: bool,
    encoding: Option<&str>,
) -> BarcodeResult<Option<Barcode>> {
    let _span = tracing::info_span!("decode").entered();
    tracing::info!(image_len = image.len(), format, want_marks, encoding, "Decoding image");

    let (img, opts) = prepare(image, format, encoding, &DECODERS)?;
    let marks_on = want_marks.then_some(&img);
    let barcode = reader.decode(&img, &opts).map(|sym| Barcode::from_symbol(sym, marks_on));

    match &barcode {
        Some(b) => tracing::info!(format = %b.format, "Decoded symbol"),
        None => tracing::info!("No symbol found"),
    }
    Ok(barcode)
}

/// Decodes every symbol found in `image`, in the order the engine reports them. Without a
/// format hint every format in [`MULTI_DECODERS`] is tried. Finding nothing is `Ok(None)`.
pub fn decode_multi<R: SymbolReader>(
    reader: &R,
    image: &[u8],
    format: Option<&str>,
    want_marks: bool,
    encoding: Option<&str>,
) -> BarcodeResult<Option<Vec<Barcode>>> {
    let _span = tracing::info_span!("decode_multi").entered();
    tracing::info!(image_len = image.len(), format, want_marks, encoding, "Decoding image");

    let (img, opts) = prepare(image, format, encoding, &MULTI_DECODERS)?;
    let marks_on = want_marks.then_some(&img);
    let barcodes = reader
        .decode_multiple(&img, &opts)
        .into_iter()
        .map(|sym| Barcode::from_symbol(sym, marks_on))
        .collect::<Vec<_>>();

    tracing::info!(count = barcodes.len(), "Decoded symbols");
    Ok(Some(barcodes).filter(|b| !b.is_empty()))
}

fn prepare(
    image: &[u8],
    format: Option<&str>,
    encoding: Option<&str>,
    fallback: &[BarcodeFormat],
) -> BarcodeResult<(DynamicImage, ReaderOptions)> {
    let img = image::load_from_memory(image).map_err(|e| {
        tracing::error!(error = %e, "Image could not be loaded");
        BarcodeError::ImageLoad(e.to_string())
    })?;

    let formats = match BarcodeFormat::parse_hint(format)? {
        Some(f) => vec![f],
        None => fallback.to_vec(),
    };
    let charset = resolve_charset(encoding)?;
    tracing::debug!(?formats, %charset, w = img.width(), h = img.height(), "Reader configured");

    Ok((img, ReaderOptions::new(&formats, charset)))
}
