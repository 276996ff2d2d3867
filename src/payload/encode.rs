//! Payload string encoders.
//!
//! All encoders are total: any input, including empty strings, produces a
//! syntactically valid payload. Validation belongs to the caller.
//!
//! WiFi and vCard field values are NOT escaped. An SSID or password holding
//! `;`, `:` or `\` produces a payload most scanners will misread. This matches
//! the minimal convention most scanner apps emit.

use std::fmt::Write;

/// `WIFI:T:<auth>;S:<ssid>;P:<password>;;`
pub fn encode_wifi(ssid: &str, password: Option<&str>, auth_type: Option<&str>) -> String {
    format!(
        "WIFI:T:{};S:{};P:{};;",
        auth_type.unwrap_or("WPA"),
        ssid,
        password.unwrap_or("")
    )
}

/// `mailto:<address>[?subject=..][&body=..]`, only non-empty parts are emitted.
pub fn encode_email(address: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let mut out = format!("mailto:{address}");

    let params: Vec<String> = [("subject", subject), ("body", body)]
        .into_iter()
        .filter_map(|(name, value)| match value {
            Some(v) if !v.is_empty() => Some(format!("{name}={}", percent_encode(v))),
            _ => None,
        })
        .collect();

    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }

    out
}

pub fn encode_tel(number: &str) -> String {
    format!("tel:{number}")
}

pub fn encode_sms(number: &str, message: Option<&str>) -> String {
    format!("smsto:{number}:{}", message.unwrap_or(""))
}

/// vCard 3.0 block. Empty fields are kept as blank values, never omitted.
pub fn encode_vcard(name: &str, phone: Option<&str>, email: Option<&str>, org: Option<&str>) -> String {
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{name}"),
        format!("TEL:{}", phone.unwrap_or("")),
        format!("EMAIL:{}", email.unwrap_or("")),
        format!("ORG:{}", org.unwrap_or("")),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`,
/// byte-wise over UTF-8.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        let unreserved = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')');
        if unreserved {
            out.push(byte as char);
        } else {
            // writing to a String cannot fail
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wifi_defaults_to_wpa() {
        assert_eq!(encode_wifi("HomeNet", Some("secret"), None), "WIFI:T:WPA;S:HomeNet;P:secret;;");
    }

    #[test]
    fn wifi_without_password() {
        assert_eq!(encode_wifi("Cafe", None, Some("nopass")), "WIFI:T:nopass;S:Cafe;P:;;");
    }

    #[test]
    fn wifi_does_not_escape_delimiters() {
        assert_eq!(encode_wifi("a;b", Some("c:d"), None), "WIFI:T:WPA;S:a;b;P:c:d;;");
    }

    #[test]
    fn email_with_subject_and_body() {
        assert_eq!(
            encode_email("a@b.com", Some("Hi"), Some("There")),
            "mailto:a@b.com?subject=Hi&body=There"
        );
    }

    #[test]
    fn email_without_params_has_no_question_mark() {
        assert_eq!(encode_email("a@b.com", None, None), "mailto:a@b.com");
        assert_eq!(encode_email("a@b.com", Some(""), Some("")), "mailto:a@b.com");
    }

    #[test]
    fn email_body_only() {
        assert_eq!(encode_email("a@b.com", None, Some("x")), "mailto:a@b.com?body=x");
    }

    #[test]
    fn email_params_are_percent_encoded() {
        assert_eq!(
            encode_email("a@b.com", Some("Hello world & more"), Some("café?")),
            "mailto:a@b.com?subject=Hello%20world%20%26%20more&body=caf%C3%A9%3F"
        );
    }

    #[test]
    fn percent_encode_keeps_unreserved_marks() {
        assert_eq!(percent_encode("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(percent_encode("a/b=c"), "a%2Fb%3Dc");
    }

    #[test]
    fn tel_is_verbatim() {
        assert_eq!(encode_tel("+1 (555) 010"), "tel:+1 (555) 010");
        assert_eq!(encode_tel(""), "tel:");
    }

    #[test]
    fn sms_with_and_without_message() {
        assert_eq!(encode_sms("555", Some("on my way")), "smsto:555:on my way");
        assert_eq!(encode_sms("555", None), "smsto:555:");
    }

    #[test]
    fn vcard_keeps_blank_fields() {
        assert_eq!(
            encode_vcard("Ada Lovelace", Some("123"), None, None),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Ada Lovelace\nTEL:123\nEMAIL:\nORG:\nEND:VCARD"
        );
    }
}
