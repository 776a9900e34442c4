//! Payload strings for the semantic QR code types: contacts, calendar events, Wi-Fi
//! credentials and the simple `mailto:`, `geo:`, `tel:`, `facetime:` and `smsto:` URIs.

mod calendar;
mod contact;
mod content_line;
mod wifi;

pub use calendar::{CalendarEvent, PriorityBand};
pub use contact::{ComposedName, Contact};
pub use wifi::{Authentication, Wifi};

// Escaping
//------------------------------------------------------------------------------

// CRLF, CR, LF, NEL, LS, PS and FF all count as line endings
const LINE_ENDINGS: [&str; 7] =
    ["\r\n", "\r", "\n", "\u{0085}", "\u{2028}", "\u{2029}", "\u{000C}"];

/// Escapes a field value for MeCard and Wi-Fi payloads.
///
/// The substitutions run in a fixed order: `,` `;`, line endings to a literal `\n`, then
/// `\`, `"` and `:`. Backslashes inserted by the first three steps are escaped again by the
/// fourth, so `a,b` becomes `a\\,b`. Readers of existing codes depend on this exact output.
pub fn escape_for_qr_text(s: &str) -> String {
    let mut out = s.replace(',', "\\,").replace(';', "\\;");
    for eol in LINE_ENDINGS {
        out = out.replace(eol, "\\n");
    }
    out.replace('\\', "\\\\").replace('"', "\\\"").replace(':', "\\:")
}

// Simple URIs
//------------------------------------------------------------------------------

pub fn mailto(email: &str) -> String {
    format!("mailto:{email}")
}

pub fn geo(latitude: f64, longitude: f64) -> String {
    format!("geo:{latitude},{longitude}")
}

pub fn tel(phone: &str, is_facetime: bool) -> String {
    let scheme = if is_facetime { "facetime" } else { "tel" };
    format!("{scheme}:{phone}")
}

pub fn smsto(phone: &str, message: &str) -> String {
    format!("smsto:{phone}:{message}")
}
