//! Capture regions and the pure crop that extracts them.
//!
//! No infrastructure here: pixels in, pixels out.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A rectangle in absolute desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

impl FromStr for Region {
    type Err = String;

    /// Parses `X,Y,WIDTH,HEIGHT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, w, h] = parts.as_slice() else {
            return Err(format!("expected X,Y,WIDTH,HEIGHT, got {:?}", s));
        };
        let int = |v: &str| v.parse::<i32>().map_err(|e| format!("{:?}: {}", v, e));
        let uint = |v: &str| v.parse::<u32>().map_err(|e| format!("{:?}: {}", v, e));
        Ok(Region::new(int(*x)?, int(*y)?, uint(*w)?, uint(*h)?))
    }
}

/// Cuts `region` out of `image`, whose top-left pixel sits at desktop
/// position `origin`.
///
/// # Arguments
/// * `image` - The grabbed screen area
/// * `origin` - Desktop coordinates of `image`'s top-left pixel
/// * `region` - The rectangle to keep, in desktop coordinates
pub fn crop_region(
    image: &RgbaImage,
    origin: (i32, i32),
    region: &Region,
) -> Result<RgbaImage, CropError> {
    if region.width == 0 || region.height == 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = image.dimensions();
    let rel_x = region.x as i64 - origin.0 as i64;
    let rel_y = region.y as i64 - origin.1 as i64;

    if rel_x < 0
        || rel_y < 0
        || rel_x + region.width as i64 > img_width as i64
        || rel_y + region.height as i64 > img_height as i64
    {
        return Err(CropError::OutOfBounds {
            requested: *region,
            bounds: Region::new(origin.0, origin.1, img_width, img_height),
        });
    }

    let (x, y) = (rel_x as u32, rel_y as u32);
    Ok(image::imageops::crop_imm(image, x, y, region.width, region.height).to_image())
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds captured area ({},{} {}x{})",
        requested.x, requested.y, requested.width, requested.height,
        bounds.x, bounds.y, bounds.width, bounds.height
    )]
    OutOfBounds { requested: Region, bounds: Region },
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn crop_valid_region() {
        let mut img = RgbaImage::new(100, 100);
        img.put_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let cropped = crop_region(&img, (0, 0), &Region::new(10, 10, 50, 50)).unwrap();
        assert_eq!(cropped.dimensions(), (50, 50));
        assert_eq!(*cropped.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn crop_honours_origin_offset() {
        // A secondary monitor placed left of the primary.
        let mut img = RgbaImage::new(100, 100);
        img.put_pixel(5, 5, Rgba([9, 9, 9, 255]));
        let cropped = crop_region(&img, (-100, 0), &Region::new(-95, 5, 10, 10)).unwrap();
        assert_eq!(*cropped.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn crop_zero_dimension_fails() {
        let img = RgbaImage::new(100, 100);
        let result = crop_region(&img, (0, 0), &Region::new(0, 0, 0, 50));
        assert!(matches!(result, Err(CropError::ZeroDimension)));
    }

    #[test]
    fn crop_out_of_bounds_fails() {
        let img = RgbaImage::new(100, 100);
        let result = crop_region(&img, (0, 0), &Region::new(80, 80, 30, 30));
        assert!(matches!(result, Err(CropError::OutOfBounds { .. })));
        let result = crop_region(&img, (0, 0), &Region::new(-1, 0, 10, 10));
        assert!(matches!(result, Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn region_parses_from_cli_form() {
        assert_eq!("10, -20,300,40".parse::<Region>(), Ok(Region::new(10, -20, 300, 40)));
        assert!("10,20,30".parse::<Region>().is_err());
        assert!("10,20,-30,40".parse::<Region>().is_err());
    }
}
