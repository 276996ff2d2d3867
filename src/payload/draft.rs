use super::encode::{encode_email, encode_tel, encode_wifi};
use super::ContentType;

/// Structured input collected by the create flow, one variant per
/// generator type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Text(String),
    Url(String),
    /// `auth` defaults to WPA when `None`.
    Wifi { ssid: String, password: String, auth: Option<String> },
    Email { address: String, subject: String, body: String },
    Phone(String),
}

impl Draft {
    /// The payload to render, or `None` while the required field is empty.
    pub fn payload(&self) -> Option<String> {
        match self {
            Draft::Text(text) | Draft::Url(text) => non_empty(text).map(str::to_string),
            Draft::Wifi { ssid, password, auth } => {
                non_empty(ssid).map(|ssid| encode_wifi(ssid, Some(password), auth.as_deref()))
            }
            Draft::Email { address, subject, body } => non_empty(address)
                .map(|address| encode_email(address, Some(subject), Some(body))),
            Draft::Phone(number) => non_empty(number).map(encode_tel),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Draft::Text(_) => ContentType::Text,
            Draft::Url(_) => ContentType::Url,
            Draft::Wifi { .. } => ContentType::Wifi,
            Draft::Email { .. } => ContentType::Email,
            Draft::Phone(_) => ContentType::Phone,
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
