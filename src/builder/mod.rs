mod label;
mod overlay;
mod render;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{DataMatrixShape, SymbolWriter, WriterHints},
    resolve_charset, BarcodeError, BarcodeFormat, BarcodeResult, ECLevel, OutputFormat, UTF8,
};

pub use label::draw_label;
pub use overlay::apply_overlay;
pub use render::render;

// Encode request
//------------------------------------------------------------------------------

/// Everything that shapes one encoded barcode image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeRequest {
    pub contents: String,
    pub format: BarcodeFormat,
    pub width: u32,
    pub height: u32,
    /// Quiet zone in modules.
    pub margin: u32,
    /// Suppresses the human readable label of linear formats.
    pub pure_barcode: bool,
    pub gs1_format: bool,
    pub no_padding: bool,
    pub encoding: Option<String>,
    /// Letter grade for QR, percentage for Aztec, 0-8 for PDF417.
    pub error_correction: Option<String>,
    /// Exact QR version, 0 lets the writer choose.
    pub qr_version: u32,
    pub overlay: Option<Vec<u8>>,
    pub data_matrix_shape: DataMatrixShape,
    pub output_format: OutputFormat,
}

impl EncodeRequest {
    pub fn new(contents: impl Into<String>, format: BarcodeFormat) -> Self {
        Self {
            contents: contents.into(),
            format,
            width: 300,
            height: 300,
            margin: 10,
            pure_barcode: true,
            gs1_format: false,
            no_padding: false,
            encoding: Some(UTF8.to_string()),
            error_correction: None,
            qr_version: 0,
            overlay: None,
            data_matrix_shape: DataMatrixShape::None,
            output_format: OutputFormat::Png,
        }
    }

    pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn margin(&mut self, margin: u32) -> &mut Self {
        self.margin = margin;
        self
    }

    pub fn pure_barcode(&mut self, pure: bool) -> &mut Self {
        self.pure_barcode = pure;
        self
    }

    pub fn gs1_format(&mut self, gs1: bool) -> &mut Self {
        self.gs1_format = gs1;
        self
    }

    pub fn no_padding(&mut self, no_padding: bool) -> &mut Self {
        self.no_padding = no_padding;
        self
    }

    pub fn encoding(&mut self, encoding: Option<&str>) -> &mut Self {
        self.encoding = encoding.map(str::to_string);
        self
    }

    pub fn error_correction(&mut self, ecl: Option<&str>) -> &mut Self {
        self.error_correction = ecl.map(str::to_string);
        self
    }

    pub fn qr_version(&mut self, version: u32) -> &mut Self {
        self.qr_version = version;
        self
    }

    pub fn overlay(&mut self, overlay: Option<Vec<u8>>) -> &mut Self {
        self.overlay = overlay;
        self
    }

    pub fn data_matrix_shape(&mut self, shape: DataMatrixShape) -> &mut Self {
        self.data_matrix_shape = shape;
        self
    }

    pub fn output_format(&mut self, output_format: OutputFormat) -> &mut Self {
        self.output_format = output_format;
        self
    }

    /// Error correction level that gates a QR overlay. Without an explicit level the
    /// writer's default applies; a non-letter value does not gate at all.
    fn overlay_level(&self) -> Option<ECLevel> {
        match self.error_correction.as_deref().map(str::trim) {
            None | Some("") => Some(ECLevel::default()),
            Some(ecl) => ecl.parse().ok(),
        }
    }

    fn writer_hints(&self) -> BarcodeResult<WriterHints> {
        let character_set = match self.encoding.as_deref().map(str::trim) {
            None | Some("") => None,
            label => Some(resolve_charset(label)?),
        };
        let error_correction =
            self.error_correction.as_deref().map(str::trim).filter(|e| !e.is_empty());

        let is_qr = self.format == BarcodeFormat::QR_CODE;
        let is_dm = self.format == BarcodeFormat::DATA_MATRIX;
        Ok(WriterHints {
            character_set,
            error_correction: error_correction.map(str::to_string),
            qr_version: (is_qr && self.qr_version != 0).then_some(self.qr_version),
            data_matrix_shape: is_dm.then_some(self.data_matrix_shape),
            margin: Some(self.margin),
            gs1_format: self.gs1_format,
        })
    }
}

// Encoding
//------------------------------------------------------------------------------

/// Encodes `req.contents` into an image serialized as `req.output_format`.
pub fn encode<W: SymbolWriter>(writer: &W, req: &EncodeRequest) -> BarcodeResult<Vec<u8>> {
    let _span = tracing::info_span!("encode").entered();
    tracing::info!(
        format = %req.format,
        contents_len = req.contents.len(),
        width = req.width,
        height = req.height,
        margin = req.margin,
        overlay_len = req.overlay.as_ref().map_or(0, Vec::len),
        output = ?req.output_format,
        "Encoding contents"
    );

    if let Some(min) = req.format.min_margin() {
        if req.margin < min {
            tracing::error!(format = %req.format, margin = req.margin, min, "Margin below minimum");
            return Err(BarcodeError::Validation(format!(
                "{} requires a margin of at least {min}, got {}",
                req.format, req.margin
            )));
        }
    }

    let hints = req.writer_hints().inspect_err(|e| tracing::error!(error = %e, "Bad hints"))?;
    tracing::debug!(?hints, "Writer hints");
    let mat = writer
        .encode(&req.contents, req.format, &hints)
        .inspect_err(|e| tracing::error!(error = %e, "Writer failed"))?;

    let mut symbol = render(&mat, req.width, req.height, req.no_padding);
    if !req.pure_barcode && req.format.is_labelled() {
        symbol = draw_label(&symbol, &req.contents)?;
    }
    let mut img = DynamicImage::ImageLuma8(symbol);

    let overlay = req.overlay.as_deref().filter(|o| !o.is_empty());
    if let (BarcodeFormat::QR_CODE, Some(overlay)) = (req.format, overlay) {
        match req.overlay_level() {
            Some(level) => {
                let mut canvas = img.to_rgba8();
                apply_overlay(&mut canvas, overlay, level)?;
                img = DynamicImage::ImageRgba8(canvas);
            }
            None => tracing::warn!(ecl = ?req.error_correction, "Overlay skipped, unknown level"),
        }
    }

    let bytes = req.output_format.write(&img)?;
    tracing::info!(w = img.width(), h = img.height(), len = bytes.len(), "Encoded image");
    Ok(bytes)
}

#[cfg(test)]
mod builder_tests {
    use std::sync::Mutex;

    use image::{DynamicImage, GrayImage, Luma};

    use super::{encode, EncodeRequest};
    use crate::{
        engine::{DataMatrixShape, ModuleMatrix, SymbolWriter, WriterHints},
        BarcodeError, BarcodeFormat, BarcodeResult, ECLevel, OutputFormat,
    };

    /// Writer that returns a fixed 21x21 matrix and records the hints it was handed. It has
    /// no MaxiCode writer.
    #[derive(Default)]
    struct StubWriter {
        seen: Mutex<Vec<WriterHints>>,
    }

    impl SymbolWriter for StubWriter {
        fn encode(
            &self,
            _: &str,
            format: BarcodeFormat,
            hints: &WriterHints,
        ) -> BarcodeResult<ModuleMatrix> {
            self.seen.lock().unwrap().push(hints.clone());
            let mat = match format {
                BarcodeFormat::MAXICODE => {
                    return Err(BarcodeError::UnsupportedFormat(format.to_string()));
                }
                BarcodeFormat::QR_CODE | BarcodeFormat::DATA_MATRIX => {
                    let mut mat = ModuleMatrix::new(21, 21);
                    mat.set(0, 0, true);
                    mat
                }
                _ => ModuleMatrix::from_runs(&[1, 1, 2, 1], true, 10),
            };
            Ok(mat)
        }
    }

    fn overlay_png(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([0])));
        OutputFormat::Png.write(&img).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req = EncodeRequest::new("x", BarcodeFormat::QR_CODE);
        assert_eq!((req.width, req.height, req.margin), (300, 300, 10));
        assert!(req.pure_barcode && !req.gs1_format && !req.no_padding);
        assert_eq!(req.encoding.as_deref(), Some("UTF-8"));
        assert_eq!((req.error_correction.clone(), req.qr_version), (None, 0));
        assert_eq!(req.data_matrix_shape, DataMatrixShape::None);
        assert_eq!(req.output_format, OutputFormat::Png);
    }

    #[test]
    fn test_margin_minimum() {
        let writer = StubWriter::default();
        for format in [BarcodeFormat::EAN_13, BarcodeFormat::UPC_A] {
            let mut req = EncodeRequest::new("1", format);
            let res = encode(&writer, req.margin(5));
            assert!(matches!(res, Err(BarcodeError::Validation(_))));
            assert!(encode(&writer, req.margin(6)).is_ok());
        }
        assert!(encode(&writer, EncodeRequest::new("1", BarcodeFormat::EAN_8).margin(0)).is_ok());
    }

    #[test]
    fn test_format_without_writer() {
        let writer = StubWriter::default();
        let res = encode(&writer, &EncodeRequest::new("1", BarcodeFormat::MAXICODE));
        assert_eq!(res, Err(BarcodeError::UnsupportedFormat("MAXICODE".to_string())));

        // Missing from the encoder list but still handed to the writer
        for format in [BarcodeFormat::UPC_E, BarcodeFormat::CODE_93] {
            assert!(encode(&writer, &EncodeRequest::new("00123457", format)).is_ok());
        }
        assert_eq!(writer.seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_format_specific_hints() {
        let writer = StubWriter::default();
        let mut req = EncodeRequest::new("1", BarcodeFormat::QR_CODE);
        req.qr_version(7).data_matrix_shape(DataMatrixShape::Square).error_correction(Some("H"));
        encode(&writer, &req).unwrap();

        req.format = BarcodeFormat::DATA_MATRIX;
        req.encoding(None).error_correction(Some(" "));
        encode(&writer, &req).unwrap();

        let seen = writer.seen.lock().unwrap();
        assert_eq!(seen[0].qr_version, Some(7));
        assert_eq!(seen[0].data_matrix_shape, None);
        assert_eq!(seen[0].error_correction.as_deref(), Some("H"));
        assert_eq!(seen[0].character_set.as_deref(), Some("UTF-8"));
        assert_eq!(seen[0].margin, Some(10));
        assert_eq!(seen[1].qr_version, None);
        assert_eq!(seen[1].data_matrix_shape, Some(DataMatrixShape::Square));
        assert_eq!(seen[1].error_correction, None);
        assert_eq!(seen[1].character_set, None);
    }

    #[test]
    fn test_unknown_encoding() {
        let writer = StubWriter::default();
        let mut req = EncodeRequest::new("1", BarcodeFormat::QR_CODE);
        let res = encode(&writer, req.encoding(Some("klingon")));
        assert!(matches!(res, Err(BarcodeError::Validation(_))));
    }

    #[test]
    fn test_overlay_gate() {
        let writer = StubWriter::default();
        let mut req = EncodeRequest::new("1", BarcodeFormat::QR_CODE);
        req.size(330, 330).error_correction(Some("H"));

        // 195x195 over 330x330 is about 35%
        let res = encode(&writer, req.overlay(Some(overlay_png(195, 195))));
        assert!(matches!(res, Err(BarcodeError::OverlayTooLarge { level: ECLevel::H, .. })));
        // 165x165 over 330x330 is exactly 25%
        assert!(encode(&writer, req.overlay(Some(overlay_png(165, 165)))).is_ok());

        // Without a level the writer picks L, so its 7% budget applies
        req.error_correction(None);
        // 100x100 over 330x330 is about 9%
        let res = encode(&writer, req.overlay(Some(overlay_png(100, 100))));
        assert!(matches!(res, Err(BarcodeError::OverlayTooLarge { level: ECLevel::L, .. })));
        // 80x80 over 330x330 is about 6%
        assert!(encode(&writer, req.overlay(Some(overlay_png(80, 80)))).is_ok());

        // Empty overlays and non-QR formats skip compositing
        assert!(encode(&writer, req.overlay(Some(vec![]))).is_ok());
        req.format = BarcodeFormat::DATA_MATRIX;
        assert!(encode(&writer, req.overlay(Some(overlay_png(300, 300)))).is_ok());
    }

    #[test]
    fn test_label_only_when_not_pure() {
        let writer = StubWriter::default();
        let mut req = EncodeRequest::new("12345", BarcodeFormat::CODE_128);
        req.size(200, 50);

        let pure = image::load_from_memory(&encode(&writer, &req).unwrap()).unwrap();
        assert_eq!((pure.width(), pure.height()), (200, 50));

        let labelled =
            image::load_from_memory(&encode(&writer, req.pure_barcode(false)).unwrap()).unwrap();
        assert_eq!(labelled.width(), 200);
        assert!(labelled.height() > 50);

        // QR is never labelled
        req.format = BarcodeFormat::QR_CODE;
        let qr = image::load_from_memory(&encode(&writer, &req).unwrap()).unwrap();
        assert_eq!((qr.width(), qr.height()), (200, 50));
    }

    #[test]
    fn test_output_container() {
        let writer = StubWriter::default();
        let mut req = EncodeRequest::new("1", BarcodeFormat::QR_CODE);
        let bytes = encode(&writer, req.output_format(OutputFormat::Bmp)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Bmp);
    }
}
