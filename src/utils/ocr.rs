/*!
 * Upload Type Helpers
 *
 * Decide whether an uploaded file is an image the lab-report pipeline accepts.
 * Only PNG and JPEG reports are processed; everything else is rejected before
 * any decoding happens.
 */

/// Content types accepted by the `/get-lab-tests` endpoint
pub const SUPPORTED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

/// Determine if a declared content type is an accepted report image
pub fn content_type_supported(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    SUPPORTED_CONTENT_TYPES.contains(&essence.as_str())
}

/// Determine if a filename carries an accepted image extension
pub fn file_is_supported_image(filename: &str) -> bool {
    let image_extensions = [".png", ".jpg", ".jpeg"];
    let extension = extract_extension(filename);
    image_extensions.contains(&extension.as_str())
}

/// Resolve the content type of an upload: the declared type when present,
/// otherwise a guess from the filename.
pub fn resolve_content_type(declared: Option<&str>, filename: Option<&str>) -> Option<String> {
    match declared.map(str::trim).filter(|ct| !ct.is_empty()) {
        Some(ct) if ct != "application/octet-stream" => Some(ct.to_string()),
        _ => filename
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|mime| mime.essence_str().to_string()),
    }
}

/// Sniff the actual bytes; returns the MIME type only for PNG or JPEG content
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| matches!(*mime, "image/png" | "image/jpeg"))
}

/// Extract file extension from filename (lowercased)
fn extract_extension(filename: &str) -> String {
    if let Some(pos) = filename.rfind('.') {
        filename[pos..].to_lowercase()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_content_types() {
        assert!(content_type_supported("image/png"));
        assert!(content_type_supported("image/jpeg"));
        assert!(content_type_supported("image/jpg"));
        assert!(content_type_supported("IMAGE/PNG")); // Test case insensitive
        assert!(content_type_supported("image/jpeg; charset=binary"));
    }

    #[test]
    fn test_unsupported_content_types() {
        assert!(!content_type_supported("image/tiff"));
        assert!(!content_type_supported("application/pdf"));
        assert!(!content_type_supported("text/plain"));
        assert!(!content_type_supported(""));
    }

    #[test]
    fn test_image_extensions() {
        assert!(file_is_supported_image("report.png"));
        assert!(file_is_supported_image("scan.JPG"));
        assert!(file_is_supported_image("photo.jpeg"));
        assert!(!file_is_supported_image("report.pdf"));
        assert!(!file_is_supported_image("noextension"));
    }

    #[test]
    fn test_resolve_prefers_declared_type() {
        assert_eq!(
            resolve_content_type(Some("image/png"), Some("report.jpg")).as_deref(),
            Some("image/png")
        );
    }

    #[test]
    fn test_resolve_falls_back_to_filename() {
        assert_eq!(
            resolve_content_type(None, Some("report.jpg")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            resolve_content_type(Some("application/octet-stream"), Some("scan.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(resolve_content_type(None, None), None);
    }

    #[test]
    fn test_detect_image_mime() {
        let png_header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(detect_image_mime(&png_header), Some("image/png"));
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(detect_image_mime(&jpeg_header), Some("image/jpeg"));
        assert_eq!(detect_image_mime(b"GIF89a......"), None);
        assert_eq!(detect_image_mime(b""), None);
    }
}
