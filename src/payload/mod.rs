//! QR payload classification and composition.
//!
//! `classify` assigns a coarse content type to a decoded payload by prefix.
//! It does not validate the payload body, it only drives labels and the
//! "open in browser" action.

pub mod draft;
pub mod encode;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use draft::Draft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[default]
    Text,
    Url,
    Wifi,
    Email,
    Phone,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Text,
        ContentType::Url,
        ContentType::Wifi,
        ContentType::Email,
        ContentType::Phone,
    ];

    /// Persisted tag, also what the history filter matches against.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "TEXT",
            ContentType::Url => "URL",
            ContentType::Wifi => "WIFI",
            ContentType::Email => "EMAIL",
            ContentType::Phone => "PHONE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Text => "Text",
            ContentType::Url => "Website",
            ContentType::Wifi => "WiFi Network",
            ContentType::Email => "Email",
            ContentType::Phone => "Phone Number",
        }
    }

    pub fn can_open(&self) -> bool {
        matches!(self, ContentType::Url)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContentType(pub String);

impl fmt::Display for UnknownContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown content type '{}'", self.0)
    }
}

impl std::error::Error for UnknownContentType {}

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// unknown tags in old blobs decode as TEXT instead of failing the whole history
impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(tag.parse().unwrap_or_default())
    }
}

/// Ordered prefix rules, first match wins.
pub fn classify(payload: &str) -> ContentType {
    if payload.starts_with("http") {
        ContentType::Url
    } else if payload.starts_with("WIFI:") {
        ContentType::Wifi
    } else if payload.starts_with("MATMSG:") || payload.starts_with("mailto:") {
        ContentType::Email
    } else if payload.starts_with("tel:") {
        ContentType::Phone
    } else {
        ContentType::Text
    }
}
