//! MIME type checks for uploaded files.

use mime_guess::mime::Mime;

/// Lowercased `type/subtype` of a content type, without parameters.
pub fn mime_essence(content_type: &str) -> String {
    match content_type.trim().parse::<Mime>() {
        Ok(mime) => mime.essence_str().to_lowercase(),
        Err(_) => content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase(),
    }
}

/// Whether a content type is plain text (`charset` and other parameters ignored).
pub fn is_plain_text(content_type: &str) -> bool {
    mime_essence(content_type) == "text/plain"
}

/// Detect a binary format from magic bytes.
///
/// Returns the detected MIME type for non-text formats (images, archives,
/// office documents, ...). Text-like detections such as HTML are not
/// reported; a `.txt` file may legitimately contain markup.
pub fn sniff_binary(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes)
        .filter(|kind| kind.matcher_type() != infer::MatcherType::Text)
        .map(|kind| kind.mime_type())
}
