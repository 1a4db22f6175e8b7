// ABOUTME: Pure decoders turning fetched bytes into metadata records and bitmaps
// ABOUTME: Strict JSON metadata decoding and magic-byte image format detection

use image::ImageFormat;

use crate::error::{DecodeError, FormatError};
use crate::model::{ImageMetadata, RawImage};

/// Decode a metadata payload. Every field is required; unknown fields are
/// ignored.
pub fn decode_metadata(bytes: &[u8]) -> Result<ImageMetadata, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode an image payload into a bitmap.
pub fn decode_image(bytes: &[u8]) -> Result<RawImage, FormatError> {
    if bytes.is_empty() {
        return Err(FormatError::Empty);
    }

    let format = image::guess_format(bytes).map_err(|_| FormatError::Unrecognized)?;
    let pixels =
        image::load_from_memory_with_format(bytes, format).map_err(|e| FormatError::Corrupt {
            format: format_name(format).to_string(),
            message: e.to_string(),
        })?;

    Ok(RawImage::new(pixels, format))
}

pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WebP",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Tiff => "TIFF",
        _ => "image",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{png_bytes, GOKU_JSON};

    #[test]
    fn test_decode_complete_metadata() {
        let metadata = decode_metadata(GOKU_JSON.as_bytes()).unwrap();
        assert_eq!(metadata.name, "Goku");
        assert_eq!(metadata.first_appearance, "1984");
        assert_eq!(metadata.year, 1984);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let json = r#"{"name":"Vegeta","firstAppearance":"1988","year":1988,"power":9001}"#;
        let metadata = decode_metadata(json.as_bytes()).unwrap();
        assert_eq!(metadata.name, "Vegeta");
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let err = decode_metadata(br#"{"name":"X"}"#).unwrap_err();
        assert!(err.message.contains("missing field"));
    }

    #[test]
    fn test_decode_rejects_mistyped_fields() {
        assert!(decode_metadata(br#"{"name":"X","firstAppearance":"1984","year":"1984"}"#).is_err());
        assert!(decode_metadata(br#"{"name":7,"firstAppearance":"1984","year":1984}"#).is_err());
        assert!(decode_metadata(br#"{"name":"X","firstAppearance":null,"year":1984}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(decode_metadata(b"<html>Not found</html>").is_err());
        assert!(decode_metadata(b"").is_err());
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!(image.format(), ImageFormat::Png);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
    }

    #[test]
    fn test_decode_image_rejects_empty_and_unknown() {
        assert_eq!(decode_image(&[]).unwrap_err(), FormatError::Empty);
        assert_eq!(
            decode_image(b"<html>Not an image</html>").unwrap_err(),
            FormatError::Unrecognized
        );
    }

    #[test]
    fn test_decode_image_rejects_truncated_png() {
        let mut bytes = png_bytes(4, 4);
        bytes.truncate(20);
        match decode_image(&bytes) {
            Err(FormatError::Corrupt { format, .. }) => assert_eq!(format, "PNG"),
            other => panic!("Expected corrupt PNG error, got {:?}", other),
        }
    }

    #[test]
    fn test_same_bytes_decode_equal() {
        let bytes = png_bytes(2, 2);
        assert_eq!(decode_image(&bytes).unwrap(), decode_image(&bytes).unwrap());
    }
}
