use std::{io::Cursor, str::FromStr};

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

use super::{BarcodeError, BarcodeResult};

// Output format
//------------------------------------------------------------------------------

/// Raster container the encoded barcode is serialized to.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Png,
    Gif,
    Jpeg,
    Webp,
    Bmp,
}

impl OutputFormat {
    /// Parses an optional name, falling back to PNG when absent or blank.
    pub fn parse_or_default(name: Option<&str>) -> BarcodeResult<Self> {
        match name.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(n) => n.parse(),
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
        }
    }

    pub fn write(self, img: &DynamicImage) -> BarcodeResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        let res = match self {
            // JPEG has no alpha channel
            Self::Jpeg => {
                DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buf, ImageFormat::Jpeg)
            }
            // GIF frames are built from RGB(A) only
            Self::Gif => {
                DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buf, ImageFormat::Gif)
            }
            _ => img.write_to(&mut buf, self.image_format()),
        };
        res.map_err(|e| BarcodeError::ImageWrite(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

impl FromStr for OutputFormat {
    type Err = BarcodeError;

    fn from_str(s: &str) -> BarcodeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "bmp" => Ok(Self::Bmp),
            _ => Err(BarcodeError::UnsupportedOutputFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod output_tests {
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use test_case::test_case;

    use super::OutputFormat;
    use crate::BarcodeError;

    #[test_case("PNG", OutputFormat::Png)]
    #[test_case("png", OutputFormat::Png)]
    #[test_case("Gif", OutputFormat::Gif)]
    #[test_case("JPG", OutputFormat::Jpeg)]
    #[test_case("jpeg", OutputFormat::Jpeg)]
    #[test_case("WEBP", OutputFormat::Webp)]
    #[test_case("bmp", OutputFormat::Bmp)]
    fn test_parse(name: &str, exp: OutputFormat) {
        assert_eq!(name.parse::<OutputFormat>(), Ok(exp));
    }

    #[test]
    fn test_parse_unsupported() {
        assert_eq!(
            "TIFF".parse::<OutputFormat>(),
            Err(BarcodeError::UnsupportedOutputFormat("TIFF".to_string()))
        );
        assert_eq!(OutputFormat::parse_or_default(None), Ok(OutputFormat::Png));
        assert_eq!(OutputFormat::parse_or_default(Some("")), Ok(OutputFormat::Png));
    }

    #[test_case(OutputFormat::Png, ImageFormat::Png)]
    #[test_case(OutputFormat::Gif, ImageFormat::Gif)]
    #[test_case(OutputFormat::Jpeg, ImageFormat::Jpeg)]
    #[test_case(OutputFormat::Webp, ImageFormat::WebP)]
    #[test_case(OutputFormat::Bmp, ImageFormat::Bmp)]
    fn test_write_container(out: OutputFormat, exp: ImageFormat) {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 8, Luma([255])));
        for img in [img.clone(), img.to_rgba8().into()] {
            let bytes = out.write(&img).unwrap();
            assert_eq!(image::guess_format(&bytes).unwrap(), exp);
            let back = image::load_from_memory(&bytes).unwrap();
            assert_eq!((back.width(), back.height()), (16, 8));
        }
    }
}
