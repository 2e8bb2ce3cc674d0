use image::ImageFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("Could not detect image format")]
    NotAnImage,

    #[error("Unsupported image format: {0:?}. Allowed: JPEG, PNG")]
    UnsupportedFormat(ImageFormat),

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}
