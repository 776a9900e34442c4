use crate::{
    builder::{self, EncodeRequest},
    engine::{RxingEngine, SymbolReader, SymbolWriter},
    payload::{self, CalendarEvent, Contact, Wifi},
    reader::{self, Barcode},
    BarcodeFormat, BarcodeResult, OutputFormat, ENCODERS,
};

// Barcode kit
//------------------------------------------------------------------------------

/// Entry point for every decode and encode action. The engine is stateless, so one kit can
/// serve any number of threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct BarcodeKit<E = RxingEngine> {
    engine: E,
}

impl BarcodeKit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> BarcodeKit<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Names of the formats advertised for encoding. The list is informational:
    /// [`Self::encode`] also accepts any other format the engine can write.
    pub fn encoders(&self) -> Vec<&'static str> {
        ENCODERS.iter().map(|f| f.name()).collect()
    }
}

impl<E: SymbolReader> BarcodeKit<E> {
    /// First symbol in `image`. `format` restricts decoding to one format name; `want_marks`
    /// adds a PNG of the image with the symbol outlined.
    pub fn decode(
        &self,
        image: &[u8],
        format: Option<&str>,
        want_marks: bool,
        encoding: Option<&str>,
    ) -> BarcodeResult<Option<Barcode>> {
        reader::decode(&self.engine, image, format, want_marks, encoding)
    }

    /// Every symbol in `image`, or `None` when there is none.
    pub fn decode_multi(
        &self,
        image: &[u8],
        format: Option<&str>,
        want_marks: bool,
        encoding: Option<&str>,
    ) -> BarcodeResult<Option<Vec<Barcode>>> {
        reader::decode_multi(&self.engine, image, format, want_marks, encoding)
    }
}

impl<E: SymbolWriter> BarcodeKit<E> {
    pub fn encode(&self, req: &EncodeRequest) -> BarcodeResult<Vec<u8>> {
        builder::encode(&self.engine, req)
    }

    pub fn encode_calendar_event(
        &self,
        event: &CalendarEvent,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let _span = tracing::info_span!("encode_calendar_event").entered();
        tracing::info!(title = %event.title, size, "Encoding calendar event");
        self.encode_payload(event.to_ical(), size, overlay, output_format)
    }

    /// Encodes `contact` as a MeCard when `is_mecard`, as a vCard otherwise.
    pub fn encode_contact(
        &self,
        contact: &Contact,
        is_mecard: bool,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let _span = tracing::info_span!("encode_contact").entered();
        tracing::info!(name = %contact.formatted_name, is_mecard, size, "Encoding contact");
        let contents = if is_mecard { contact.to_mecard() } else { contact.to_vcard() };
        self.encode_payload(contents, size, overlay, output_format)
    }

    pub fn encode_email(
        &self,
        email: &str,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let _span = tracing::info_span!("encode_email").entered();
        tracing::info!(email, size, "Encoding email");
        self.encode_payload(payload::mailto(email), size, overlay, output_format)
    }

    pub fn encode_location(
        &self,
        latitude: f64,
        longitude: f64,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let _span = tracing::info_span!("encode_location").entered();
        tracing::info!(latitude, longitude, size, "Encoding location");
        self.encode_payload(payload::geo(latitude, longitude), size, overlay, output_format)
    }

    /// Encodes a `tel:` URI, or a `facetime:` URI when `is_facetime`.
    pub fn encode_phone_number(
        &self,
        phone: &str,
        is_facetime: bool,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let _span = tracing::info_span!("encode_phone_number").entered();
        tracing::info!(phone, is_facetime, size, "Encoding phone number");
        self.encode_payload(payload::tel(phone, is_facetime), size, overlay, output_format)
    }

    pub fn encode_sms(
        &self,
        phone: &str,
        message: &str,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let _span = tracing::info_span!("encode_sms").entered();
        tracing::info!(phone, message_len = message.len(), size, "Encoding SMS");
        self.encode_payload(payload::smsto(phone, message), size, overlay, output_format)
    }

    pub fn encode_wifi(
        &self,
        wifi: &Wifi,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let _span = tracing::info_span!("encode_wifi").entered();
        let auth = wifi.authentication.token();
        tracing::info!(ssid = %wifi.ssid, auth, size, "Encoding Wi-Fi");
        self.encode_payload(wifi.to_string(), size, overlay, output_format)
    }

    // Square QR code without quiet zone or padding, as every semantic payload is drawn
    fn encode_payload(
        &self,
        contents: String,
        size: u32,
        overlay: Option<&[u8]>,
        output_format: Option<&str>,
    ) -> BarcodeResult<Vec<u8>> {
        let output_format = OutputFormat::parse_or_default(output_format)?;
        let mut req = EncodeRequest::new(contents, BarcodeFormat::QR_CODE);
        req.size(size, size)
            .margin(0)
            .pure_barcode(true)
            .gs1_format(false)
            .no_padding(true)
            .overlay(overlay.map(<[u8]>::to_vec))
            .output_format(output_format);
        self.encode(&req)
    }
}
