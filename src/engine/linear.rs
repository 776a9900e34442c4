//! Writers for the linear symbologies the engine cannot produce: MSI and Plessey.

use crate::{BarcodeError, BarcodeResult};

use super::ModuleMatrix;

// MSI
//------------------------------------------------------------------------------

const MSI_START: [usize; 2] = [2, 1];
const MSI_END: [usize; 3] = [1, 2, 1];
const MSI_ONE: [usize; 2] = [2, 1];
const MSI_ZERO: [usize; 2] = [1, 2];

/// Encodes digits as MSI (no check digit). Each digit is four bits, most significant first.
pub fn encode_msi(contents: &str, quiet_zone: usize) -> BarcodeResult<ModuleMatrix> {
    if contents.is_empty() || !contents.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BarcodeError::Encoding(format!("MSI accepts digits only: {contents:?}")));
    }

    let mut runs = Vec::with_capacity(MSI_START.len() + contents.len() * 8 + MSI_END.len());
    runs.extend(MSI_START);
    for d in contents.bytes().map(|b| b - b'0') {
        for i in (0..4).rev() {
            runs.extend(if (d >> i) & 1 == 1 { MSI_ONE } else { MSI_ZERO });
        }
    }
    runs.extend(MSI_END);

    Ok(ModuleMatrix::from_runs(&runs, true, quiet_zone))
}

// Plessey
//------------------------------------------------------------------------------

const PLESSEY_ALPHABET: &[u8; 16] = b"0123456789ABCDEF";
const PLESSEY_START: [usize; 8] = [14, 11, 14, 11, 5, 20, 14, 11];
const PLESSEY_TERMINATION: [usize; 1] = [25];
// Follows the termination bar, so it opens with a space
const PLESSEY_END: [usize; 8] = [20, 5, 20, 5, 14, 11, 14, 11];
const PLESSEY_ONE: [usize; 2] = [14, 11];
const PLESSEY_ZERO: [usize; 2] = [5, 20];
// x^8 + x^7 + x^6 + x^5 + x^3 + 1, highest power first
const PLESSEY_CRC_POLY: [u8; 9] = [1, 1, 1, 1, 0, 1, 0, 0, 1];

/// Encodes upper case hex digits as Plessey with its 8 bit CRC. Each character is four
/// bits, least significant first.
pub fn encode_plessey(contents: &str, quiet_zone: usize) -> BarcodeResult<ModuleMatrix> {
    let values = contents
        .bytes()
        .map(|b| PLESSEY_ALPHABET.iter().position(|&a| a == b).map(|v| v as u8))
        .collect::<Option<Vec<_>>>()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            BarcodeError::Encoding(format!("Plessey accepts 0-9 and A-F only: {contents:?}"))
        })?;

    let bits = values.iter().flat_map(|v| (0..4).map(move |i| (v >> i) & 1)).collect::<Vec<_>>();
    let crc = plessey_crc(&bits);

    let mut runs = Vec::with_capacity(PLESSEY_START.len() + (bits.len() + 8) * 2 + 9);
    runs.extend(PLESSEY_START);
    for b in bits.iter().chain(crc.iter()) {
        runs.extend(if *b == 1 { PLESSEY_ONE } else { PLESSEY_ZERO });
    }
    runs.extend(PLESSEY_TERMINATION);
    runs.extend(PLESSEY_END);

    Ok(ModuleMatrix::from_runs(&runs, true, quiet_zone))
}

fn plessey_crc(bits: &[u8]) -> [u8; 8] {
    let mut buf = bits.to_vec();
    buf.extend([0; 8]);
    for i in 0..bits.len() {
        if buf[i] != 0 {
            buf[i..i + 9].iter_mut().zip(PLESSEY_CRC_POLY).for_each(|(b, p)| *b ^= p);
        }
    }
    let mut crc = [0; 8];
    crc.copy_from_slice(&buf[bits.len()..]);
    crc
}
