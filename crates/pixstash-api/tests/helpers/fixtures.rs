//! Test fixtures: real PNG/JPEG/GIF bytes encoded with the image crate.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(
        RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255])).into(),
        ImageFormat::Png,
    )
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(
        RgbImage::from_pixel(width, height, Rgb([220, 120, 20])).into(),
        ImageFormat::Jpeg,
    )
}

pub fn create_test_gif(width: u32, height: u32) -> Vec<u8> {
    encode(
        RgbaImage::from_pixel(width, height, Rgba([0, 200, 0, 255])).into(),
        ImageFormat::Gif,
    )
}

/// PNG signature followed by garbage
pub fn create_corrupt_png() -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(b"this is not an IHDR chunk");
    data
}

/// Bytes no decoder claims
pub fn create_opaque_blob(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}
