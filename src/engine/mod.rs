//! Seams to the barcode engine. The orchestrators only see these traits; the rxing
//! adapter, [`RxingEngine`], is the production implementation.

mod linear;
mod matrix;
mod rxing_engine;

use std::{convert::Infallible, str::FromStr};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::{BarcodeFormat, BarcodeResult, MetadataValue, RawMetadata, UTF8};

pub use linear::{encode_msi, encode_plessey};
pub use matrix::ModuleMatrix;
pub use rxing_engine::RxingEngine;

// Reader
//------------------------------------------------------------------------------

/// Decoder configuration. The default mirrors the fixed configuration used by every decode
/// action; only the candidate formats and character set vary per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    pub formats: Vec<BarcodeFormat>,
    pub character_set: String,
    pub auto_rotate: bool,
    pub try_harder: bool,
    pub try_inverted: bool,
    pub return_codabar_start_end: bool,
    pub code39_extended_mode: bool,
    pub code39_relaxed_extended_mode: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            formats: Vec::new(),
            character_set: UTF8.to_string(),
            auto_rotate: true,
            try_harder: true,
            try_inverted: true,
            return_codabar_start_end: true,
            code39_extended_mode: true,
            code39_relaxed_extended_mode: true,
        }
    }
}

impl ReaderOptions {
    pub fn new(formats: &[BarcodeFormat], character_set: impl Into<String>) -> Self {
        Self { formats: formats.to_vec(), character_set: character_set.into(), ..Self::default() }
    }
}

/// A symbol found by the engine, before it is shaped into a [`crate::Barcode`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    pub text: String,
    pub raw_bytes: Vec<u8>,
    pub format: BarcodeFormat,
    /// Locating points in the coordinates of the image the engine decoded, which is the
    /// source image turned counter-clockwise by `orientation` degrees.
    pub points: Vec<(f32, f32)>,
    pub metadata: RawMetadata,
}

impl DecodedSymbol {
    pub fn orientation(&self) -> Option<i32> {
        self.metadata.iter().find_map(|(k, v)| match (k.as_str(), v) {
            ("ORIENTATION", MetadataValue::Int(a)) => i32::try_from(*a).ok(),
            _ => None,
        })
    }
}

pub trait SymbolReader {
    /// First symbol found among `opts.formats`, if any. Failing to find one is not an error.
    fn decode(&self, img: &DynamicImage, opts: &ReaderOptions) -> Option<DecodedSymbol>;

    /// Every symbol found among `opts.formats`, in engine order.
    fn decode_multiple(&self, img: &DynamicImage, opts: &ReaderOptions) -> Vec<DecodedSymbol>;
}

// Writer
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum DataMatrixShape {
    #[default]
    None,
    Square,
    Rectangle,
}

/// Anything other than square or rectangle lets the writer pick the shape.
impl FromStr for DataMatrixShape {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Infallible> {
        let shape = match s.trim().to_ascii_lowercase().as_str() {
            "square" => Self::Square,
            "rectangle" => Self::Rectangle,
            "" | "none" => Self::None,
            _ => {
                tracing::warn!(shape = s, "Unknown Data Matrix shape, using none");
                Self::None
            }
        };
        Ok(shape)
    }
}

/// Format specific hints forwarded to the writer. Fields that do not apply to the target
/// format are left unset by the encode orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriterHints {
    pub character_set: Option<String>,
    pub error_correction: Option<String>,
    pub qr_version: Option<u32>,
    pub data_matrix_shape: Option<DataMatrixShape>,
    pub margin: Option<u32>,
    pub gs1_format: bool,
}

pub trait SymbolWriter {
    /// Encodes `contents` into a module matrix at its natural size, quiet zone included.
    fn encode(
        &self,
        contents: &str,
        format: BarcodeFormat,
        hints: &WriterHints,
    ) -> BarcodeResult<ModuleMatrix>;
}
