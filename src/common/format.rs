use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::{BarcodeError, BarcodeResult};

// Barcode format
//------------------------------------------------------------------------------

/// Symbologies known to the toolkit, named the way callers spell them.
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BarcodeFormat {
    UPC_A,
    UPC_E,
    EAN_8,
    EAN_13,
    CODE_39,
    CODE_93,
    CODE_128,
    ITF,
    CODABAR,
    MSI,
    RSS_14,
    RSS_EXPANDED,
    QR_CODE,
    DATA_MATRIX,
    AZTEC,
    PDF_417,
    MAXICODE,
    IMB,
    PLESSEY,
    PHARMA_CODE,
}

use BarcodeFormat::*;

pub const ALL_FORMATS: [BarcodeFormat; 20] = [
    UPC_A,
    UPC_E,
    EAN_8,
    EAN_13,
    CODE_39,
    CODE_93,
    CODE_128,
    ITF,
    CODABAR,
    MSI,
    RSS_14,
    RSS_EXPANDED,
    QR_CODE,
    DATA_MATRIX,
    AZTEC,
    PDF_417,
    MAXICODE,
    IMB,
    PLESSEY,
    PHARMA_CODE,
];

/// Candidate formats for single-symbol decoding without a hint.
pub const DECODERS: [BarcodeFormat; 18] = [
    UPC_A,
    UPC_E,
    EAN_8,
    EAN_13,
    CODE_39,
    CODE_93,
    CODE_128,
    ITF,
    CODABAR,
    MSI,
    RSS_14,
    RSS_EXPANDED,
    QR_CODE,
    DATA_MATRIX,
    AZTEC,
    PDF_417,
    MAXICODE,
    IMB,
];

/// Candidate formats for multi-symbol decoding without a hint. MaxiCode detection does not
/// cooperate with the region splitting of the multi reader, so it is left out.
pub const MULTI_DECODERS: [BarcodeFormat; 17] = [
    UPC_A,
    UPC_E,
    EAN_8,
    EAN_13,
    CODE_39,
    CODE_93,
    CODE_128,
    ITF,
    CODABAR,
    MSI,
    RSS_14,
    RSS_EXPANDED,
    QR_CODE,
    DATA_MATRIX,
    AZTEC,
    PDF_417,
    IMB,
];

pub const ENCODERS: [BarcodeFormat; 13] = [
    UPC_A,
    EAN_8,
    EAN_13,
    CODE_39,
    CODE_128,
    ITF,
    CODABAR,
    PLESSEY,
    MSI,
    QR_CODE,
    DATA_MATRIX,
    AZTEC,
    PDF_417,
];

/// Linear formats that get a human readable label when not rendered as a pure barcode.
pub const LABELLED: [BarcodeFormat; 13] = [
    CODABAR,
    CODE_128,
    CODE_39,
    CODE_93,
    EAN_8,
    EAN_13,
    ITF,
    RSS_14,
    RSS_EXPANDED,
    UPC_A,
    UPC_E,
    PLESSEY,
    MSI,
];

impl BarcodeFormat {
    pub const fn name(self) -> &'static str {
        match self {
            UPC_A => "UPC_A",
            UPC_E => "UPC_E",
            EAN_8 => "EAN_8",
            EAN_13 => "EAN_13",
            CODE_39 => "CODE_39",
            CODE_93 => "CODE_93",
            CODE_128 => "CODE_128",
            ITF => "ITF",
            CODABAR => "CODABAR",
            MSI => "MSI",
            RSS_14 => "RSS_14",
            RSS_EXPANDED => "RSS_EXPANDED",
            QR_CODE => "QR_CODE",
            DATA_MATRIX => "DATA_MATRIX",
            AZTEC => "AZTEC",
            PDF_417 => "PDF_417",
            MAXICODE => "MAXICODE",
            IMB => "IMB",
            PLESSEY => "PLESSEY",
            PHARMA_CODE => "PHARMA_CODE",
        }
    }

    pub fn is_labelled(self) -> bool {
        LABELLED.contains(&self)
    }

    /// EAN-13 and UPC-A need a quiet zone of at least this many modules to scan reliably.
    pub fn min_margin(self) -> Option<u32> {
        match self {
            EAN_13 | UPC_A => Some(6),
            _ => None,
        }
    }

    /// Parses an optional hint, treating an empty string as no hint.
    pub fn parse_hint(hint: Option<&str>) -> BarcodeResult<Option<Self>> {
        match hint.map(str::trim) {
            None | Some("") => Ok(None),
            Some(h) => h.parse().map(Some),
        }
    }
}

impl FromStr for BarcodeFormat {
    type Err = BarcodeError;

    fn from_str(s: &str) -> BarcodeResult<Self> {
        ALL_FORMATS
            .iter()
            .find(|f| f.name() == s)
            .copied()
            .ok_or_else(|| BarcodeError::UnsupportedFormat(s.to_string()))
    }
}

impl Display for BarcodeFormat {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        f.write_str(self.name())
    }
}
