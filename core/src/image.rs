//! Thumbnail inspection.
//!
//! Format detection looks at magic bytes only; nothing is decoded.

use std::io::Cursor;

pub use image::ImageFormat;
use image::ImageReader;

use crate::error::ImageError;

/// Formats accepted for recipe thumbnails.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png];

/// Maximum thumbnail size in kilobytes.
pub const MAX_THUMBNAIL_KB: usize = 2048;

/// Maximum thumbnail size in bytes.
pub const MAX_THUMBNAIL_SIZE: usize = MAX_THUMBNAIL_KB * 1024;

/// Detect the format of `data` from its leading bytes.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat, ImageError> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    reader.format().ok_or(ImageError::NotAnImage)
}

/// Validate a thumbnail: it must be an image, in an allowed format, and no
/// larger than [`MAX_THUMBNAIL_SIZE`]. The checks run in that order.
pub fn validate_thumbnail(data: &[u8]) -> Result<ImageFormat, ImageError> {
    let format = detect_format(data)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat(format));
    }

    if data.len() > MAX_THUMBNAIL_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_THUMBNAIL_SIZE,
        });
    }

    Ok(format)
}

/// File extension used when storing a thumbnail of the given format.
pub fn extension_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_bytes(len: usize) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.resize(len.max(PNG_SIGNATURE.len()), 0);
        data
    }

    #[test]
    fn test_validate_png() {
        let format = validate_thumbnail(&png_bytes(64)).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(extension_for(format), "png");
    }

    #[test]
    fn test_validate_jpeg() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
        assert_eq!(validate_thumbnail(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_rejects_non_image() {
        let result = validate_thumbnail(b"definitely not an image");
        assert!(matches!(result, Err(ImageError::NotAnImage)));
    }

    #[test]
    fn test_rejects_gif() {
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";
        let result = validate_thumbnail(gif);
        assert!(matches!(
            result,
            Err(ImageError::UnsupportedFormat(ImageFormat::Gif))
        ));
    }

    #[test]
    fn test_rejects_oversized() {
        let result = validate_thumbnail(&png_bytes(MAX_THUMBNAIL_SIZE + 1));
        assert!(matches!(result, Err(ImageError::TooLarge { .. })));
    }

    #[test]
    fn test_accepts_exact_limit() {
        assert!(validate_thumbnail(&png_bytes(MAX_THUMBNAIL_SIZE)).is_ok());
    }
}
