//! MIME handling for generated image payloads.

const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Identify an image format from its magic bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

/// Pick the MIME type for a data URI.
///
/// A declared `image/*` type wins; otherwise the payload is sniffed, and
/// unknown payloads are labelled PNG.
pub fn resolve_image_mime(declared: &str, bytes: &[u8]) -> String {
    let declared = declared.trim();
    if declared.starts_with("image/") {
        return declared.to_string();
    }

    match sniff_image_mime(bytes) {
        Some(mime) => mime.to_string(),
        None => {
            tracing::warn!(
                "Unrecognized image format (declared '{}', first 4 bytes: {:02X?}), falling back to {}",
                declared,
                &bytes[..bytes.len().min(4)],
                FALLBACK_IMAGE_MIME
            );
            FALLBACK_IMAGE_MIME.to_string()
        }
    }
}
