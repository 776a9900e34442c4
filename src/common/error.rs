use super::ECLevel;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BarcodeError {
    // Input parsing
    #[error("Unsupported barcode format: {0}")]
    UnsupportedFormat(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    // Encode preconditions
    #[error("{0}")]
    Validation(String),
    #[error(
        "With error correction level {level:?} the maximum overlap of the QR code is {:.0}%, \
         overlay covers {:.1}%",
        percent(.limit),
        percent(.ratio)
    )]
    OverlayTooLarge { level: ECLevel, ratio: f64, limit: f64 },

    // Engine & codec
    #[error("Failed to encode contents: {0}")]
    Encoding(String),
    #[error("Failed to write image: {0}")]
    ImageWrite(String),
}

pub type BarcodeResult<T> = Result<T, BarcodeError>;

fn percent(r: &f64) -> f64 {
    r * 100.0
}
