//! Convenience helpers for loading and dumping images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{gray_from_u8, ImageView, OwnedImage};
use crate::util::{IpDetectError, IpResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> IpResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Loads an image from disk as `f32` intensities in `[0, 1]`.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> IpResult<OwnedImage<f32>> {
    let img = image::open(path).map_err(|err| IpDetectError::ImageIo {
        reason: err.to_string(),
    })?;
    let gray = img.to_luma8();
    Ok(gray_from_u8(view_from_gray_image(&gray)?))
}

/// Writes `field` as an 8-bit image, linearly stretched to `[0, 255]`.
///
/// Constant fields are written black. The format follows the file extension.
pub fn write_normalized<P: AsRef<Path>>(path: P, field: &OwnedImage<f32>) -> IpResult<()> {
    let (lo, hi) = field
        .data()
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    let pixels: Vec<u8> = field
        .data()
        .iter()
        .map(|&v| {
            if range > 0.0 && v.is_finite() {
                (255.0 * (v - lo) / range).round().clamp(0.0, 255.0) as u8
            } else {
                0
            }
        })
        .collect();

    let img = image::GrayImage::from_raw(field.width() as u32, field.height() as u32, pixels)
        .ok_or(IpDetectError::BufferTooSmall {
            needed: field.width() * field.height(),
            got: field.data().len(),
        })?;
    img.save(path).map_err(|err| IpDetectError::ImageIo {
        reason: err.to_string(),
    })
}
