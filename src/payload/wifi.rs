use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::escape_for_qr_text;
use crate::BarcodeError;

// Wi-Fi
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum Authentication {
    #[serde(rename = "WEP")]
    Wep,
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WPA2-EAP")]
    Wpa2Eap,
    #[serde(rename = "nopass")]
    NoPass,
}

impl Authentication {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Wep => "WEP",
            Self::Wpa => "WPA",
            Self::Wpa2Eap => "WPA2-EAP",
            Self::NoPass => "nopass",
        }
    }
}

impl FromStr for Authentication {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEP" => Ok(Self::Wep),
            "WPA" => Ok(Self::Wpa),
            "WPA2-EAP" => Ok(Self::Wpa2Eap),
            "NOPASS" | "" => Ok(Self::NoPass),
            _ => Err(BarcodeError::Validation(format!("Unknown Wi-Fi authentication: {s}"))),
        }
    }
}

/// Network credentials for a `WIFI:` payload. The EAP fields are only written for
/// [`Authentication::Wpa2Eap`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wifi {
    pub ssid: String,
    pub password: String,
    pub authentication: Authentication,
    pub is_hidden: bool,
    pub eap_method: String,
    pub anonymous_identity: String,
    pub identity: String,
    pub phase2_method: String,
}

impl Wifi {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>, auth: Authentication) -> Self {
        let (ssid, password) = (ssid.into(), password.into());
        Self { ssid, password, authentication: auth, ..Self::default() }
    }
}

impl Display for Wifi {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "WIFI:S:{};T:{};", escape_for_qr_text(&self.ssid), self.authentication.token())?;
        if !self.password.is_empty() {
            write!(f, "P:{};", escape_for_qr_text(&self.password))?;
        }
        write!(f, "H:{};", if self.is_hidden { "True" } else { "False" })?;
        if self.authentication == Authentication::Wpa2Eap {
            write!(
                f,
                "E:{};A:{};I:{};PH2:{};",
                self.eap_method,
                escape_for_qr_text(&self.anonymous_identity),
                escape_for_qr_text(&self.identity),
                self.phase2_method
            )?;
        }
        f.write_str(";")
    }
}
