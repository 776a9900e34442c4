use encoding_rs::Encoding;

use super::{BarcodeError, BarcodeResult};

pub const UTF8: &str = "UTF-8";

/// Validates a character set label such as `utf8` or `ISO-8859-1` against the WHATWG label
/// table and returns the label to hand to the engine. Blank labels resolve to UTF-8.
///
/// The caller's spelling is kept rather than the canonical name: the WHATWG table folds
/// `ISO-8859-1` into `windows-1252`, which the engine treats as a different charset.
pub fn resolve_charset(label: Option<&str>) -> BarcodeResult<String> {
    let label = match label.map(str::trim) {
        None | Some("") => return Ok(UTF8.to_string()),
        Some(l) => l,
    };

    match Encoding::for_label(label.as_bytes()) {
        Some(enc) => {
            tracing::trace!(label, canonical = enc.name(), "Resolved character set");
            Ok(label.to_string())
        }
        None => Err(BarcodeError::Validation(format!("Unknown character encoding: {label}"))),
    }
}
