//! # barcode-kit
//!
//! Barcode decode and encode actions over the [`rxing`] engine, plus payload formatters for
//! the semantic QR code types (contacts, calendar events, Wi-Fi credentials, e-mail, phone,
//! SMS and geographic locations).
//!
//! ## Features
//!
//! - **Decoding**: First or all symbols in a PNG/JPEG/GIF/BMP/WebP image, across 18 formats,
//!   with automatic rotation and an optional PNG outlining what was found
//! - **Encoding**: 13 listed formats plus UPC-E and Code 93, rendered to PNG, GIF, JPEG,
//!   WebP or BMP, with human readable labels for linear symbols and centered logo overlays
//!   for QR codes
//! - **Payloads**: vCard 3.0, MeCard, iCalendar, `WIFI:` and simple URI payloads
//!
//! ## Quick Start
//!
//! ### Encoding
//!
//! ```rust
//! use barcode_kit::{BarcodeFormat, BarcodeKit, EncodeRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kit = BarcodeKit::new();
//!
//! let mut req = EncodeRequest::new("Hello, World!", BarcodeFormat::QR_CODE);
//! req.size(200, 200).error_correction(Some("H"));
//!
//! let png = kit.encode(&req)?;
//! std::fs::write("hello.png", png)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Decoding
//!
//! ```rust,no_run
//! use barcode_kit::BarcodeKit;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = std::fs::read("hello.png")?;
//!
//! // Any readable format, no mark image, UTF-8 text
//! if let Some(barcode) = BarcodeKit::new().decode(&image, None, false, None)? {
//!     println!("{}: {}", barcode.format, barcode.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Semantic payloads
//!
//! ```rust
//! use barcode_kit::{Authentication, BarcodeKit, Wifi};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let wifi = Wifi::new("SUPERFAST-123", "StrongerThanYouThink", Authentication::Wpa);
//! assert_eq!(wifi.to_string(), "WIFI:S:SUPERFAST-123;T:WPA;P:StrongerThanYouThink;H:False;;");
//!
//! let png = BarcodeKit::new().encode_wifi(&wifi, 250, None, Some("png"))?;
//! # assert!(!png.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Logo overlays
//!
//! An overlay may cover at most the share of the QR code its error correction level can
//! restore:
//! - **L (Low)**: 7%, also used when no level is given since the writer then picks L
//! - **M (Medium)**: 15%
//! - **Q (Quartile)**: 25%
//! - **H (High)**: 30%

pub mod builder;
mod common;
pub mod engine;
mod kit;
pub mod payload;
pub mod reader;

pub use builder::EncodeRequest;
pub use common::*;
pub use engine::{DataMatrixShape, RxingEngine};
pub use kit::BarcodeKit;
pub use payload::{Authentication, CalendarEvent, ComposedName, Contact, PriorityBand, Wifi};
pub use reader::Barcode;
