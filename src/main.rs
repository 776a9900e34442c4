use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use barcode_kit::{Barcode, BarcodeFormat, BarcodeKit, DataMatrixShape, EncodeRequest};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "barcode-kit", version, about = "Decode and encode barcodes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode the barcodes in an image and print them as JSON
    Decode {
        image: PathBuf,
        /// Restrict decoding to one format, e.g. QR_CODE
        #[arg(long)]
        format: Option<String>,
        /// Report every symbol instead of the first
        #[arg(long)]
        multi: bool,
        /// Write the image with the first symbol outlined to this PNG file
        #[arg(long)]
        marks: Option<PathBuf>,
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Encode contents into a barcode image
    Encode {
        contents: String,
        #[arg(long)]
        format: BarcodeFormat,
        #[arg(long, default_value_t = 300)]
        width: u32,
        #[arg(long, default_value_t = 300)]
        height: u32,
        #[arg(long, default_value_t = 10)]
        margin: u32,
        /// Print the contents below linear symbols
        #[arg(long)]
        label: bool,
        #[arg(long)]
        gs1: bool,
        #[arg(long)]
        no_padding: bool,
        #[arg(long, default_value = "UTF-8")]
        encoding: String,
        #[arg(long)]
        ecl: Option<String>,
        #[arg(long, default_value_t = 0)]
        qr_version: u32,
        /// Image centered over a QR code
        #[arg(long)]
        overlay: Option<PathBuf>,
        #[arg(long, default_value = "none")]
        shape: DataMatrixShape,
        #[arg(long, default_value = "png")]
        output_format: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the formats that can be encoded
    Encoders,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let kit = BarcodeKit::new();
    match Cli::parse().command {
        Command::Decode { image, format, multi, marks, encoding } => {
            let bytes =
                fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            let (format, encoding) = (format.as_deref(), encoding.as_deref());
            let want_marks = marks.is_some();
            let barcodes = if multi {
                kit.decode_multi(&bytes, format, want_marks, encoding)?.unwrap_or_default()
            } else {
                kit.decode(&bytes, format, want_marks, encoding)?.into_iter().collect()
            };
            if barcodes.is_empty() {
                bail!("No barcode found in {}", image.display());
            }
            if let Some(path) = marks {
                write_marks(&barcodes, &path)?;
            }
            for barcode in &barcodes {
                println!("{}", serde_json::to_string(&JsonBarcode::from(barcode))?);
            }
        }
        Command::Encode {
            contents,
            format,
            width,
            height,
            margin,
            label,
            gs1,
            no_padding,
            encoding,
            ecl,
            qr_version,
            overlay,
            shape,
            output_format,
            output,
        } => {
            let overlay = overlay
                .map(|p| fs::read(&p).with_context(|| format!("reading {}", p.display())))
                .transpose()?;
            let mut req = EncodeRequest::new(contents, format);
            req.size(width, height)
                .margin(margin)
                .pure_barcode(!label)
                .gs1_format(gs1)
                .no_padding(no_padding)
                .encoding(Some(&encoding))
                .error_correction(ecl.as_deref())
                .qr_version(qr_version)
                .overlay(overlay)
                .data_matrix_shape(shape)
                .output_format(output_format.parse()?);
            let bytes = kit.encode(&req)?;
            fs::write(&output, bytes).with_context(|| format!("writing {}", output.display()))?;
        }
        Command::Encoders => {
            for name in kit.encoders() {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn write_marks(barcodes: &[Barcode], path: &Path) -> Result<()> {
    match barcodes.iter().find_map(|b| b.detected_image.as_deref()) {
        Some(png) => fs::write(path, png).with_context(|| format!("writing {}", path.display())),
        None => {
            tracing::warn!("No detection marks could be drawn");
            Ok(())
        }
    }
}

// Metadata values are already JSON, so they are embedded rather than quoted
#[derive(serde::Serialize)]
struct JsonBarcode<'a> {
    value: &'a str,
    format: BarcodeFormat,
    raw_bytes: Option<&'a [u8]>,
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl<'a> From<&'a Barcode> for JsonBarcode<'a> {
    fn from(b: &'a Barcode) -> Self {
        let metadata = b
            .metadata
            .iter()
            .map(|m| {
                let value = serde_json::from_str(&m.value)
                    .unwrap_or_else(|_| serde_json::Value::String(m.value.clone()));
                (m.key.clone(), value)
            })
            .collect();
        Self { value: &b.value, format: b.format, raw_bytes: b.raw_bytes.as_deref(), metadata }
    }
}
