//! First and second derivative filters.

use crate::image::{ImageView, OwnedImage};

/// Computes x and y gradients by central differences, `(I[x+1] - I[x-1]) / 2`.
pub fn gradients(image: ImageView<'_, f32>) -> (OwnedImage<f32>, OwnedImage<f32>) {
    let width = image.width();
    let height = image.height();
    let mut gx = Vec::with_capacity(width * height);
    let mut gy = Vec::with_capacity(width * height);
    for y in 0..height as isize {
        for x in 0..width as isize {
            gx.push(0.5 * (image.get_clamped(x + 1, y) - image.get_clamped(x - 1, y)));
            gy.push(0.5 * (image.get_clamped(x, y + 1) - image.get_clamped(x, y - 1)));
        }
    }
    (
        OwnedImage::from_vec(gx, width, height).expect("gradient matches input dimensions"),
        OwnedImage::from_vec(gy, width, height).expect("gradient matches input dimensions"),
    )
}

/// Computes the 4-neighbour Laplacian `I[x-1] + I[x+1] + I[y-1] + I[y+1] - 4 I`.
pub fn laplacian(image: ImageView<'_, f32>) -> OwnedImage<f32> {
    let width = image.width();
    let height = image.height();
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height as isize {
        for x in 0..width as isize {
            let center = image.get_clamped(x, y);
            let sum = image.get_clamped(x - 1, y)
                + image.get_clamped(x + 1, y)
                + image.get_clamped(x, y - 1)
                + image.get_clamped(x, y + 1);
            out.push(sum - 4.0 * center);
        }
    }
    OwnedImage::from_vec(out, width, height).expect("laplacian matches input dimensions")
}

/// Returns the edge orientation `atan2(gy, gx)` and magnitude `hypot(gx, gy)`.
pub fn orientation_and_magnitude(
    gx: &OwnedImage<f32>,
    gy: &OwnedImage<f32>,
) -> (OwnedImage<f32>, OwnedImage<f32>) {
    debug_assert_eq!((gx.width(), gx.height()), (gy.width(), gy.height()));
    let (ori, mag): (Vec<f32>, Vec<f32>) = gx
        .data()
        .iter()
        .zip(gy.data())
        .map(|(&x, &y)| (y.atan2(x), x.hypot(y)))
        .unzip();
    (
        OwnedImage::from_vec(ori, gx.width(), gx.height()).expect("orientation matches gradients"),
        OwnedImage::from_vec(mag, gx.width(), gx.height()).expect("magnitude matches gradients"),
    )
}
