use std::{
    borrow::Borrow,
    collections::{HashMap, HashSet},
};

use image::DynamicImage;
use rxing::{
    common::HybridBinarizer,
    datamatrix::encoder::SymbolShapeHint,
    multi::{GenericMultipleBarcodeReader, MultipleBarcodeReader},
    BarcodeFormat as RxFormat, BinaryBitmap, BufferedImageLuminanceSource, DecodeHintType,
    DecodeHintValue, DecodingHintDictionary, EncodeHintType, EncodeHintValue,
    EncodingHintDictionary, MultiFormatReader, MultiFormatWriter, RXingResult,
    RXingResultMetadataValue, Reader, Writer,
};

use super::{
    encode_msi, encode_plessey, DataMatrixShape, DecodedSymbol, ModuleMatrix, ReaderOptions,
    SymbolReader, SymbolWriter, WriterHints,
};
use crate::{BarcodeError, BarcodeFormat, BarcodeResult, MetadataValue, RawMetadata};

// Quiet zone the engine's own linear writers use when no margin is given
const DEFAULT_LINEAR_QUIET_ZONE: usize = 10;

// Readable by the engine but never written by it
const NO_ENGINE_WRITER: [RxFormat; 3] =
    [RxFormat::MAXICODE, RxFormat::RSS_14, RxFormat::RSS_EXPANDED];

/// [`SymbolReader`] and [`SymbolWriter`] backed by the rxing port of ZXing. Holds no state;
/// every call builds its own reader, writer and hints.
#[derive(Debug, Default, Clone, Copy)]
pub struct RxingEngine;

// Reader
//------------------------------------------------------------------------------

impl SymbolReader for RxingEngine {
    fn decode(&self, img: &DynamicImage, opts: &ReaderOptions) -> Option<DecodedSymbol> {
        let hints = decode_hints(opts)?;
        let mut found = None;
        for_each_turn(img, opts.auto_rotate, |turns, frame| {
            let mut reader = MultiFormatReader::default();
            match reader.decode_with_hints(&mut bitmap(frame), &hints) {
                Ok(res) => {
                    tracing::debug!(turns, "Engine found a symbol");
                    found = to_symbol(&res, turns, frame, opts);
                    found.is_some()
                }
                Err(e) => {
                    tracing::debug!(turns, reason = %e, "Engine found no symbol");
                    false
                }
            }
        });
        found
    }

    fn decode_multiple(&self, img: &DynamicImage, opts: &ReaderOptions) -> Vec<DecodedSymbol> {
        let Some(hints) = decode_hints(opts) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for_each_turn(img, opts.auto_rotate, |turns, frame| {
            let mut reader = GenericMultipleBarcodeReader::new(MultiFormatReader::default());
            match reader.decode_multiple_with_hints(&mut bitmap(frame), &hints) {
                Ok(results) => {
                    tracing::debug!(turns, count = results.len(), "Engine found symbols");
                    found =
                        results.iter().filter_map(|r| to_symbol(r, turns, frame, opts)).collect();
                    !found.is_empty()
                }
                Err(e) => {
                    tracing::debug!(turns, reason = %e, "Engine found no symbols");
                    false
                }
            }
        });
        found
    }
}

/// Calls `f` on the image and, when rotating, on up to three counter-clockwise quarter
/// turns of it until `f` reports success.
fn for_each_turn<F>(img: &DynamicImage, auto_rotate: bool, mut f: F)
where
    F: FnMut(u32, &DynamicImage) -> bool,
{
    if f(0, img) || !auto_rotate {
        return;
    }
    let mut frame = img.rotate270();
    for turns in 1..4 {
        if f(turns, &frame) {
            return;
        }
        if turns < 3 {
            frame = frame.rotate270();
        }
    }
}

fn bitmap(img: &DynamicImage) -> BinaryBitmap<HybridBinarizer<BufferedImageLuminanceSource>> {
    BinaryBitmap::new(HybridBinarizer::new(BufferedImageLuminanceSource::new(img.clone())))
}

/// Translates reader options into engine hints. Returns `None` when none of the requested
/// formats can be read by the engine.
fn decode_hints(opts: &ReaderOptions) -> Option<DecodingHintDictionary> {
    let formats = opts.formats.iter().filter_map(|f| to_rxing(*f)).collect::<HashSet<_>>();
    if formats.is_empty() {
        tracing::debug!(requested = ?opts.formats, "No readable format requested");
        return None;
    }

    let hints = HashMap::from([
        (DecodeHintType::POSSIBLE_FORMATS, DecodeHintValue::PossibleFormats(formats)),
        (
            DecodeHintType::CHARACTER_SET,
            DecodeHintValue::CharacterSet(opts.character_set.clone()),
        ),
        (DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(opts.try_harder)),
        (DecodeHintType::ALSO_INVERTED, DecodeHintValue::AlsoInverted(opts.try_inverted)),
        (
            DecodeHintType::RETURN_CODABAR_START_END,
            DecodeHintValue::ReturnCodabarStartEnd(opts.return_codabar_start_end),
        ),
    ]);
    Some(hints)
}

fn to_symbol(
    res: &RXingResult,
    turns: u32,
    frame: &DynamicImage,
    opts: &ReaderOptions,
) -> Option<DecodedSymbol> {
    let Some(format) = from_rxing(res.getBarcodeFormat()) else {
        tracing::debug!(format = ?res.getBarcodeFormat(), "Skipping symbol of unknown format");
        return None;
    };

    let mut text = res.getText().to_string();
    if format == BarcodeFormat::CODE_39 && opts.code39_extended_mode {
        text = decode_code39_extended(&text, opts.code39_relaxed_extended_mode)?;
    }

    let mut metadata: RawMetadata = res
        .getRXingResultMetadata()
        .iter()
        .map(|(k, v)| (format!("{k:?}"), convert_value(v)))
        .collect();
    let mut points = res.getPoints().iter().map(|p| (p.x, p.y)).collect::<Vec<_>>();

    // Points come back in the frame the engine was handed. Turn them into the frame the
    // final orientation describes and fold our own quarter turns into that orientation.
    let reported = metadata.iter_mut().find_map(|(k, v)| match (k.as_str(), v) {
        ("ORIENTATION", MetadataValue::Int(a)) => Some(a),
        _ => None,
    });
    match reported {
        Some(angle) => {
            if angle.rem_euclid(90) == 0 {
                let (w, h) = (frame.width() as f32, frame.height() as f32);
                rotate_points_ccw(&mut points, w, h, (angle.rem_euclid(360) / 90) as u32);
            }
            *angle = (i64::from(turns) * 90 + *angle).rem_euclid(360);
        }
        None if turns > 0 => {
            metadata.push(("ORIENTATION".to_string(), MetadataValue::Int(i64::from(turns) * 90)));
        }
        None => (),
    }

    Some(DecodedSymbol {
        text,
        raw_bytes: res.getRawBytes().to_vec(),
        format,
        points,
        metadata,
    })
}

/// Maps points of a `w` x `h` image onto the same image turned counter-clockwise
/// `quarter_turns` times.
fn rotate_points_ccw(points: &mut [(f32, f32)], w: f32, h: f32, quarter_turns: u32) {
    let (mut w, mut h) = (w, h);
    for _ in 0..quarter_turns % 4 {
        points.iter_mut().for_each(|(x, y)| (*x, *y) = (*y, w - 1.0 - *x));
        (w, h) = (h, w);
    }
}

fn convert_value(v: &RXingResultMetadataValue) -> MetadataValue {
    use RXingResultMetadataValue as V;

    match v {
        V::Orientation(n)
        | V::IssueNumber(n)
        | V::StructuredAppendSequence(n)
        | V::StructuredAppendParity(n) => MetadataValue::Int(i64::from(*n)),
        V::ByteSegments(segs) => MetadataValue::Bytes(segs.clone()),
        V::IsMirrored(b) | V::IsInverted(b) | V::FilteredClosed(b) => MetadataValue::Bool(*b),
        V::FilteredResolution((w, h)) => MetadataValue::Pair(*w as u64, *h as u64),
        V::OTHER(s)
        | V::ErrorCorrectionLevel(s)
        | V::PossibleCountry(s)
        | V::SuggestedPrice(s)
        | V::UpcEanExtension(s)
        | V::SymbologyIdentifier(s)
        | V::ContentType(s) => MetadataValue::Text(s.clone()),
    }
}

/// Expands Code 39 full ASCII shift pairs (`+A` is `a`, `/A` is `!`, ...). Invalid pairs
/// fail the symbol unless `relaxed`, which keeps them verbatim.
pub(crate) fn decode_code39_extended(text: &str, relaxed: bool) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if !matches!(c, '+' | '$' | '%' | '/') {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            if relaxed {
                out.push(c);
                continue;
            }
            return None;
        };
        let n = next as u32;
        let decoded = match (c, next) {
            ('+', 'A'..='Z') => Some(n + 32),
            ('$', 'A'..='Z') => Some(n - 64),
            ('%', 'A'..='E') => Some(n - 38),
            ('%', 'F'..='J') => Some(n - 11),
            ('%', 'K'..='O') => Some(n + 16),
            ('%', 'P'..='T') => Some(n + 43),
            ('%', 'U') => Some(0),
            ('%', 'V') => Some('@' as u32),
            ('%', 'W') => Some('`' as u32),
            ('%', 'X' | 'Y' | 'Z') => Some(127),
            ('/', 'A'..='O') => Some(n - 32),
            ('/', 'Z') => Some(':' as u32),
            _ => None,
        };
        match decoded.and_then(char::from_u32) {
            Some(d) => out.push(d),
            None if relaxed => {
                out.push(c);
                out.push(next);
            }
            None => return None,
        }
    }
    Some(out)
}

// Writer
//------------------------------------------------------------------------------

impl SymbolWriter for RxingEngine {
    fn encode(
        &self,
        contents: &str,
        format: BarcodeFormat,
        hints: &WriterHints,
    ) -> BarcodeResult<ModuleMatrix> {
        let quiet_zone = hints.margin.map_or(DEFAULT_LINEAR_QUIET_ZONE, |m| m as usize);
        match format {
            BarcodeFormat::MSI => return encode_msi(contents, quiet_zone),
            BarcodeFormat::PLESSEY => return encode_plessey(contents, quiet_zone),
            _ => (),
        }

        let rx_format = to_rxing(format)
            .filter(|f| !NO_ENGINE_WRITER.contains(f))
            .ok_or_else(|| BarcodeError::UnsupportedFormat(format.to_string()))?;
        let bits = MultiFormatWriter::default()
            .encode_with_hints(contents, &rx_format, 0, 0, &encode_hints(hints))
            .map_err(|e| BarcodeError::Encoding(e.to_string()))?;

        let (w, h) = (bits.getWidth(), bits.getHeight());
        if w == 0 || h == 0 {
            return Err(BarcodeError::Encoding(format!("{format} writer produced an empty symbol")));
        }
        let mut mat = ModuleMatrix::new(w as usize, h as usize);
        for y in 0..h {
            for x in 0..w {
                if bits.get(x, y) {
                    mat.set(y as i32, x as i32, true);
                }
            }
        }
        tracing::debug!(%format, width = w, height = h, "Engine encoded symbol");
        Ok(mat)
    }
}

fn encode_hints(hints: &WriterHints) -> EncodingHintDictionary {
    let mut out = HashMap::new();
    if let Some(cs) = &hints.character_set {
        out.insert(EncodeHintType::CHARACTER_SET, EncodeHintValue::CharacterSet(cs.clone()));
    }
    if let Some(ecl) = &hints.error_correction {
        out.insert(EncodeHintType::ERROR_CORRECTION, EncodeHintValue::ErrorCorrection(ecl.clone()));
    }
    if let Some(v) = hints.qr_version {
        out.insert(EncodeHintType::QR_VERSION, EncodeHintValue::QrVersion(v.to_string()));
    }
    if let Some(shape) = hints.data_matrix_shape {
        let shape = match shape {
            DataMatrixShape::None => SymbolShapeHint::FORCE_NONE,
            DataMatrixShape::Square => SymbolShapeHint::FORCE_SQUARE,
            DataMatrixShape::Rectangle => SymbolShapeHint::FORCE_RECTANGLE,
        };
        out.insert(EncodeHintType::DATA_MATRIX_SHAPE, EncodeHintValue::DataMatrixShape(shape));
    }
    if let Some(m) = hints.margin {
        out.insert(EncodeHintType::MARGIN, EncodeHintValue::Margin(m.to_string()));
    }
    if hints.gs1_format {
        out.insert(EncodeHintType::GS1_FORMAT, EncodeHintValue::Gs1Format(true));
    }
    out
}

// Format mapping
//------------------------------------------------------------------------------

fn to_rxing(format: BarcodeFormat) -> Option<RxFormat> {
    use BarcodeFormat::*;

    let f = match format {
        UPC_A => RxFormat::UPC_A,
        UPC_E => RxFormat::UPC_E,
        EAN_8 => RxFormat::EAN_8,
        EAN_13 => RxFormat::EAN_13,
        CODE_39 => RxFormat::CODE_39,
        CODE_93 => RxFormat::CODE_93,
        CODE_128 => RxFormat::CODE_128,
        ITF => RxFormat::ITF,
        CODABAR => RxFormat::CODABAR,
        RSS_14 => RxFormat::RSS_14,
        RSS_EXPANDED => RxFormat::RSS_EXPANDED,
        QR_CODE => RxFormat::QR_CODE,
        DATA_MATRIX => RxFormat::DATA_MATRIX,
        AZTEC => RxFormat::AZTEC,
        PDF_417 => RxFormat::PDF_417,
        MAXICODE => RxFormat::MAXICODE,
        MSI | IMB | PLESSEY | PHARMA_CODE => return None,
    };
    Some(f)
}

fn from_rxing(format: impl Borrow<RxFormat>) -> Option<BarcodeFormat> {
    use BarcodeFormat::*;

    let f = match format.borrow() {
        RxFormat::UPC_A => UPC_A,
        RxFormat::UPC_E => UPC_E,
        RxFormat::EAN_8 => EAN_8,
        RxFormat::EAN_13 => EAN_13,
        RxFormat::CODE_39 => CODE_39,
        RxFormat::CODE_93 => CODE_93,
        RxFormat::CODE_128 => CODE_128,
        RxFormat::ITF => ITF,
        RxFormat::CODABAR => CODABAR,
        RxFormat::RSS_14 => RSS_14,
        RxFormat::RSS_EXPANDED => RSS_EXPANDED,
        RxFormat::QR_CODE => QR_CODE,
        RxFormat::DATA_MATRIX => DATA_MATRIX,
        RxFormat::AZTEC => AZTEC,
        RxFormat::PDF_417 => PDF_417,
        RxFormat::MAXICODE => MAXICODE,
        _ => return None,
    };
    Some(f)
}

#[cfg(test)]
mod rxing_engine_tests {
    use test_case::test_case;

    use rxing::{
        DecodeHintType, DecodeHintValue, EncodeHintType, EncodeHintValue,
        RXingResultMetadataValue as V,
    };

    use super::{
        convert_value, decode_code39_extended, decode_hints, encode_hints, from_rxing,
        rotate_points_ccw, to_rxing, RxingEngine,
    };
    use crate::{
        engine::{ReaderOptions, SymbolWriter, WriterHints},
        BarcodeError, BarcodeFormat, DataMatrixShape, ALL_FORMATS,
    };

    #[test]
    fn test_format_mapping_roundtrip() {
        for f in ALL_FORMATS {
            if let Some(rx) = to_rxing(f) {
                assert_eq!(from_rxing(rx), Some(f));
            }
        }
        assert_eq!(to_rxing(BarcodeFormat::MSI), None);
        assert_eq!(to_rxing(BarcodeFormat::IMB), None);
    }

    #[test]
    fn test_rotate_points() {
        // 4 wide, 2 tall: top right corner lands on the top left after a quarter turn
        let mut pts = vec![(3.0, 0.0), (0.0, 0.0)];
        rotate_points_ccw(&mut pts, 4.0, 2.0, 1);
        assert_eq!(pts, vec![(0.0, 0.0), (0.0, 3.0)]);

        let mut pts = vec![(1.0, 1.0)];
        rotate_points_ccw(&mut pts, 4.0, 2.0, 4);
        assert_eq!(pts, vec![(1.0, 1.0)]);

        // Two quarter turns mirror both axes
        let mut pts = vec![(1.0, 0.0)];
        rotate_points_ccw(&mut pts, 4.0, 2.0, 2);
        assert_eq!(pts, vec![(2.0, 1.0)]);
    }

    #[test_case("CODE39", "CODE39")]
    #[test_case("+H+E+L+L+O", "hello")]
    #[test_case("A/AB%VC", "A!B@C")]
    #[test_case("%U", "\0")]
    #[test_case("/Z%F", ":;")]
    fn test_code39_extended(text: &str, exp: &str) {
        assert_eq!(decode_code39_extended(text, false).as_deref(), Some(exp));
    }

    #[test]
    fn test_code39_extended_invalid() {
        assert_eq!(decode_code39_extended("AB+1", false), None);
        assert_eq!(decode_code39_extended("AB+", false), None);
        assert_eq!(decode_code39_extended("AB+1", true).as_deref(), Some("AB+1"));
        assert_eq!(decode_code39_extended("AB$", true).as_deref(), Some("AB$"));
    }

    #[test_case(V::IsInverted(true), "true")]
    #[test_case(V::FilteredClosed(false), "false")]
    #[test_case(V::IssueNumber(7), "7")]
    #[test_case(V::Orientation(270), "270")]
    #[test_case(V::ContentType("GS1".into()), r#""GS1""#)]
    #[test_case(V::OTHER("x".into()), r#""x""#)]
    #[test_case(V::FilteredResolution((640, 480)), "[640,480]")]
    #[test_case(V::ByteSegments(vec![b"hi".to_vec()]), r#"["aGk="]"#)]
    fn test_metadata_value_json(v: V, exp: &str) {
        assert_eq!(convert_value(&v).to_json(), exp);
    }

    #[test]
    fn test_decode_hints() {
        let mut opts = ReaderOptions::new(&[BarcodeFormat::QR_CODE, BarcodeFormat::MSI], "UTF-8");
        opts.try_inverted = true;
        let hints = decode_hints(&opts).unwrap();
        assert!(matches!(
            hints.get(&DecodeHintType::POSSIBLE_FORMATS),
            Some(DecodeHintValue::PossibleFormats(f)) if f.len() == 1
        ));
        assert!(matches!(
            hints.get(&DecodeHintType::ALSO_INVERTED),
            Some(DecodeHintValue::AlsoInverted(true))
        ));

        // Nothing the engine can read
        assert!(decode_hints(&ReaderOptions::new(&[BarcodeFormat::PLESSEY], "")).is_none());
    }

    #[test]
    fn test_encode_hints() {
        let hints = WriterHints {
            error_correction: Some("H".into()),
            data_matrix_shape: Some(DataMatrixShape::Square),
            margin: Some(4),
            gs1_format: true,
            ..Default::default()
        };
        let out = encode_hints(&hints);
        assert_eq!(out.len(), 4);
        assert!(matches!(
            out.get(&EncodeHintType::ERROR_CORRECTION),
            Some(EncodeHintValue::ErrorCorrection(l)) if l == "H"
        ));
        assert!(matches!(
            out.get(&EncodeHintType::MARGIN),
            Some(EncodeHintValue::Margin(m)) if m == "4"
        ));
        assert!(out.contains_key(&EncodeHintType::GS1_FORMAT));
        assert!(!out.contains_key(&EncodeHintType::QR_VERSION));
    }

    #[test_case(BarcodeFormat::MAXICODE)]
    #[test_case(BarcodeFormat::RSS_EXPANDED)]
    #[test_case(BarcodeFormat::IMB)]
    #[test_case(BarcodeFormat::PHARMA_CODE)]
    fn test_no_writer(format: BarcodeFormat) {
        let res = RxingEngine.encode("0123", format, &WriterHints::default());
        assert_eq!(res.unwrap_err(), BarcodeError::UnsupportedFormat(format.to_string()));
    }

    #[test_case(BarcodeFormat::UPC_E, "00123457")]
    #[test_case(BarcodeFormat::CODE_93, "00123457")]
    fn test_writer_beyond_encoder_list(format: BarcodeFormat, contents: &str) {
        let mat = RxingEngine.encode(contents, format, &WriterHints::default()).unwrap();
        assert!(mat.width() > 0);
    }
}
