use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Identifier of a URL report: URL-safe base64 of the raw URL text without `=` padding.
pub fn url_identifier(url: &str) -> String {
    URL_SAFE_NO_PAD.encode(url.as_bytes())
}
