use serde::{Deserialize, Serialize};
use url::Url;

use super::{content_line::ContentLines, escape_for_qr_text};

// Contact
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedName {
    pub first_name: String,
    pub last_name: String,
    pub middle_names: String,
    pub prefix: String,
    pub suffix: String,
}

impl ComposedName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self { first_name: first_name.into(), last_name: last_name.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub formatted_name: String,
    pub composed_name: ComposedName,
    pub organization: String,
    pub title: String,
    pub home_phone: String,
    pub work_phone: String,
    pub mobile_phone: String,
    pub email: String,
    pub address: String,
    pub website: String,
    pub notes: String,
}

impl Contact {
    /// vCard 3.0 with the structured name, organization, title, the three phones, email,
    /// address (as the extended address component), website and notes. Empty fields other
    /// than `FN` and `N` are left out.
    pub fn to_vcard(&self) -> String {
        let n = &self.composed_name;
        let name = [&n.last_name, &n.first_name, &n.middle_names, &n.prefix, &n.suffix];
        let mut card = ContentLines::new();
        card.raw("BEGIN", "VCARD")
            .raw("VERSION", "3.0")
            .text("FN", &self.formatted_name)
            .components("N", &name.map(String::as_str))
            .text_opt("ORG", &self.organization)
            .text_opt("TITLE", &self.title)
            .text_opt("TEL;TYPE=HOME", &self.home_phone)
            .text_opt("TEL;TYPE=WORK", &self.work_phone)
            .text_opt("TEL;TYPE=CELL", &self.mobile_phone)
            .text_opt("EMAIL;TYPE=INTERNET", &self.email);
        if !self.address.is_empty() {
            card.components("ADR;TYPE=HOME", &["", self.address.as_str(), "", "", "", "", ""]);
        }
        if let Some(url) = normalize_url(&self.website) {
            card.raw("URL", &url);
        }
        card.text_opt("NOTE", &self.notes).raw("END", "VCARD").finish()
    }

    /// Single line MeCard. Carries less than the vCard: name, home phone, website, email,
    /// address and notes.
    pub fn to_mecard(&self) -> String {
        // No separator between ADR and NOTE: existing codes were printed this way
        format!(
            "MECARD:N:{};TEL:{};URL:{};EMAIL:{};ADR:{}NOTE: {};;",
            escape_for_qr_text(&self.formatted_name),
            escape_for_qr_text(&self.home_phone),
            escape_for_qr_text(&self.website),
            escape_for_qr_text(&self.email),
            escape_for_qr_text(&self.address),
            escape_for_qr_text(&self.notes),
        )
    }
}

/// Absolute form of a website. Bare host names get an `http` scheme; values that still do
/// not parse are kept verbatim.
fn normalize_url(website: &str) -> Option<String> {
    let website = website.trim();
    if website.is_empty() {
        return None;
    }
    let parsed = match Url::parse(website) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{website}")),
        res => res,
    };
    Some(parsed.map_or_else(|_| website.to_string(), String::from))
}
