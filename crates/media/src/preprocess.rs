//! Image preprocessing for OCR
//!
//! grayscale → 3x3 median denoise → histogram equalisation → Otsu binarize → 2x upscale

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{equalize_histogram, otsu_level, threshold, ThresholdType};
use imageproc::filter::median_filter;
use tracing::debug;

/// Upscale factor applied after binarization
pub const UPSCALE_FACTOR: u32 = 2;

// 3x3 window
const MEDIAN_RADIUS: u32 = 1;

/// Run the full preprocessing pipeline
pub fn preprocess(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray;
    }

    let binary = binarize(&equalize_histogram(&median_filter(&gray, MEDIAN_RADIUS, MEDIAN_RADIUS)));

    imageops::resize(
        &binary,
        width * UPSCALE_FACTOR,
        height * UPSCALE_FACTOR,
        FilterType::CatmullRom,
    )
}

/// Otsu binarization: pixels above the level become white, the rest black
pub fn binarize(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    debug!(
        "Binarizing {}x{} image at Otsu level {}",
        image.width(),
        image.height(),
        level
    );
    threshold(image, level, ThresholdType::Binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn two_tone(width: u32, height: u32, dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([dark])
            } else {
                Luma([light])
            }
        })
    }

    #[test]
    fn test_median_removes_salt_noise() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([200]));
        img.put_pixel(2, 2, Luma([0]));

        let filtered = median_filter(&img, MEDIAN_RADIUS, MEDIAN_RADIUS);
        assert_eq!(filtered.get_pixel(2, 2)[0], 200);
    }

    #[test]
    fn test_equalize_pushes_light_side_to_white() {
        let img = two_tone(10, 4, 100, 120);
        let eq = equalize_histogram(&img);

        assert!(eq.get_pixel(0, 0)[0] < eq.get_pixel(9, 0)[0]);
        assert_eq!(eq.get_pixel(9, 0)[0], 255);
    }

    #[test]
    fn test_binarize_splits_bimodal() {
        let binary = binarize(&two_tone(10, 4, 40, 200));

        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(9, 0)[0], 255);
        assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_preprocess_keeps_dark_text_dark() {
        let mut img = GrayImage::from_pixel(20, 10, Luma([230]));
        for x in 4..16 {
            for y in 3..7 {
                img.put_pixel(x, y, Luma([20]));
            }
        }

        let out = preprocess(&DynamicImage::ImageLuma8(img));
        assert!(out.get_pixel(20, 10)[0] < 128);
        assert!(out.get_pixel(1, 1)[0] > 128);
    }

    #[test]
    fn test_preprocess_doubles_size_and_is_gray() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(12, 7, image::Rgb([10, 200, 30])));
        let out = preprocess(&img);
        assert_eq!(out.dimensions(), (24, 14));
    }
}
