//! Pure region cropping and encoding — functional core.
//!
//! This module has zero infrastructure dependencies.
//! It takes pixel data in, returns pixel data out.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// A rectangle in monitor pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Crops `image` to `region`.
///
/// Fails when the region is empty or reaches past the image edges.
pub fn crop_region(image: &DynamicImage, region: Region) -> Result<DynamicImage, CropError> {
    if region.width == 0 || region.height == 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = (image.width(), image.height());
    let fits_x = region
        .left
        .checked_add(region.width)
        .is_some_and(|right| right <= img_width);
    let fits_y = region
        .top
        .checked_add(region.height)
        .is_some_and(|bottom| bottom <= img_height);

    if !fits_x || !fits_y {
        return Err(CropError::OutOfBounds {
            requested: region,
            image_size: (img_width, img_height),
        });
    }

    Ok(image.crop_imm(region.left, region.top, region.width, region.height))
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CropError::EncodingFailed(e.to_string()))?;
    Ok(png_bytes)
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds image bounds ({}x{})",
        requested.left, requested.top, requested.width, requested.height,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: Region,
        image_size: (u32, u32),
    },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::new(width, height))
    }

    #[test]
    fn crop_valid_region() {
        let cropped = crop_region(&blank(100, 100), Region::new(10, 10, 50, 40)).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (50, 40));
    }

    #[test]
    fn crop_full_image_is_allowed() {
        let cropped = crop_region(&blank(64, 32), Region::new(0, 0, 64, 32)).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (64, 32));
    }

    #[test]
    fn crop_zero_dimension_fails() {
        let result = crop_region(&blank(100, 100), Region::new(0, 0, 0, 50));
        assert!(matches!(result, Err(CropError::ZeroDimension)));
    }

    #[test]
    fn crop_out_of_bounds_fails() {
        let result = crop_region(&blank(100, 100), Region::new(80, 80, 30, 30));
        assert!(matches!(result, Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn crop_overflowing_coordinates_fail() {
        let result = crop_region(&blank(100, 100), Region::new(u32::MAX, 0, 2, 2));
        assert!(matches!(result, Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn encode_png_writes_magic_bytes() {
        let bytes = encode_png(&blank(8, 8)).unwrap();
        // PNG magic bytes
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }
}
