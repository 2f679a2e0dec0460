/*!
 * Unit Tests for Upload Type Validation
 *
 * These tests verify the utility functions that decide whether an upload is
 * an image the lab report pipeline accepts.
 */

#[cfg(test)]
mod tests {
    use labreport::utils::ocr::{
        content_type_supported, detect_image_mime, file_is_supported_image, resolve_content_type,
    };

    #[test]
    fn test_report_images_are_accepted() {
        assert!(file_is_supported_image("report.png"), "PNG reports should be accepted");
        assert!(file_is_supported_image("report.jpg"), "JPG reports should be accepted");
        assert!(file_is_supported_image("REPORT.JPEG"), "JPEG reports should be accepted (case insensitive)");
    }

    #[test]
    fn test_other_images_are_rejected() {
        // Only PNG and JPEG are supported, even though Tesseract reads more
        assert!(!file_is_supported_image("scan.tiff"), "TIFF should be rejected");
        assert!(!file_is_supported_image("bitmap.bmp"), "BMP should be rejected");
        assert!(!file_is_supported_image("graphic.gif"), "GIF should be rejected");
        assert!(!file_is_supported_image("modern.webp"), "WEBP should be rejected");
    }

    #[test]
    fn test_documents_are_rejected() {
        assert!(!file_is_supported_image("report.pdf"), "PDF should be rejected");
        assert!(!file_is_supported_image("report.docx"), "DOCX should be rejected");
        assert!(!file_is_supported_image("report.txt"), "TXT should be rejected");
    }

    #[test]
    fn test_edge_cases() {
        assert!(!file_is_supported_image(""), "Empty filename should be rejected");
        assert!(!file_is_supported_image("png"), "Bare extension name is not an extension");
        assert!(file_is_supported_image("lab.report.2024.png"), "Multiple dots should use the last one");
        assert!(!file_is_supported_image("report.png.pdf"), "Last extension wins");
    }

    #[test]
    fn test_declared_content_types() {
        for accepted in ["image/png", "image/jpeg", "image/jpg", "Image/JPEG"] {
            assert!(content_type_supported(accepted), "{} should be accepted", accepted);
        }
        for rejected in ["image/gif", "application/pdf", "text/plain", "multipart/form-data"] {
            assert!(!content_type_supported(rejected), "{} should be rejected", rejected);
        }
    }

    #[test]
    fn test_missing_content_type_is_guessed_from_filename() {
        let resolved = resolve_content_type(None, Some("scan.jpeg"));
        assert_eq!(resolved.as_deref(), Some("image/jpeg"));
        assert!(resolved.as_deref().is_some_and(content_type_supported));

        let resolved = resolve_content_type(Some(""), Some("report.pdf"));
        assert_eq!(resolved.as_deref(), Some("application/pdf"));
        assert!(!resolved.as_deref().is_some_and(content_type_supported));
    }

    #[test]
    fn test_declared_type_is_not_overridden_by_filename() {
        // A mislabelled upload is judged by what the client declared
        let resolved = resolve_content_type(Some("application/pdf"), Some("report.png"));
        assert_eq!(resolved.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_content_sniffing_ignores_filename_and_header() {
        let pdf_bytes = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n";
        assert_eq!(detect_image_mime(pdf_bytes), None);

        let png_bytes = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
        assert_eq!(detect_image_mime(&png_bytes), Some("image/png"));
    }
}
