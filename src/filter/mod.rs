//! Gaussian kernels and separable filtering on `f32` planes.
//!
//! All filters correlate with edge extension: samples outside the image take
//! the value of the nearest border pixel.

use crate::image::{ImageView, OwnedImage};

mod derivative;

pub use derivative::{gradients, laplacian, orientation_and_magnitude};

/// Builds a normalized 1-D Gaussian kernel.
///
/// `size == 0` selects `2 * ceil(3 * sigma) + 1` taps. Even sizes are bumped to
/// the next odd size so the kernel stays centered. A non-positive or
/// non-finite `sigma` yields the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f32, size: usize) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let size = if size == 0 {
        2 * (3.0 * sigma).ceil() as usize + 1
    } else {
        size | 1
    };
    let half = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for value in kernel.iter_mut() {
        *value /= sum;
    }
    kernel
}

/// Builds a normalized `size x size` Gaussian kernel as an image.
///
/// The kernel is the outer product of [`gaussian_kernel`] with itself; even
/// sizes are bumped to the next odd size.
pub fn gaussian_kernel_2d(sigma: f32, size: usize) -> OwnedImage<f32> {
    let size = size.max(1) | 1;
    let k1 = if !sigma.is_finite() || sigma <= 0.0 {
        let mut delta = vec![0.0f32; size];
        delta[size / 2] = 1.0;
        delta
    } else {
        gaussian_kernel(sigma, size)
    };
    let mut data = Vec::with_capacity(size * size);
    for &ky in &k1 {
        for &kx in &k1 {
            data.push(ky * kx);
        }
    }
    OwnedImage::from_vec(data, size, size).expect("kernel has non-zero odd size")
}

/// Correlates `image` with the outer product of `h_kernel` and `v_kernel`.
pub fn separable_filter(
    image: ImageView<'_, f32>,
    h_kernel: &[f32],
    v_kernel: &[f32],
) -> OwnedImage<f32> {
    let horizontal = horizontal_filter(image, h_kernel);
    vertical_filter(horizontal.view(), v_kernel)
}

/// Blurs `image` with a Gaussian of standard deviation `sigma`.
pub fn gaussian_blur(image: ImageView<'_, f32>, sigma: f32) -> OwnedImage<f32> {
    let kernel = gaussian_kernel(sigma, 0);
    separable_filter(image, &kernel, &kernel)
}

/// Correlates each row with a 1-D kernel.
pub fn horizontal_filter(image: ImageView<'_, f32>, kernel: &[f32]) -> OwnedImage<f32> {
    let width = image.width();
    let height = image.height();
    let half = (kernel.len() / 2) as isize;
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = x as isize + k as isize - half;
                acc += weight * image.get_clamped(sx, y as isize);
            }
            out.push(acc);
        }
    }
    OwnedImage::from_vec(out, width, height).expect("output matches input dimensions")
}

/// Correlates each column with a 1-D kernel.
pub fn vertical_filter(image: ImageView<'_, f32>, kernel: &[f32]) -> OwnedImage<f32> {
    let width = image.width();
    let height = image.height();
    let half = (kernel.len() / 2) as isize;
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = y as isize + k as isize - half;
                acc += weight * image.get_clamped(x as isize, sy);
            }
            out.push(acc);
        }
    }
    OwnedImage::from_vec(out, width, height).expect("output matches input dimensions")
}

#[cfg(test)]
mod tests {
    use super::{gaussian_blur, gaussian_kernel, gaussian_kernel_2d};
    use crate::image::OwnedImage;

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(1.5, 0);
        assert_eq!(k.len(), 11);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
        }
        assert!(k[5] > k[4]);
    }

    #[test]
    fn degenerate_sigma_is_identity() {
        assert_eq!(gaussian_kernel(0.0, 0), vec![1.0]);
        assert_eq!(gaussian_kernel(f32::NAN, 7), vec![1.0]);
    }

    #[test]
    fn kernel_2d_sums_to_one() {
        let k = gaussian_kernel_2d(6.0, 11);
        assert_eq!((k.width(), k.height()), (11, 11));
        let sum: f32 = k.data().iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!(k.get(5, 5).unwrap() > k.get(0, 0).unwrap());
    }

    #[test]
    fn blur_preserves_constant_images() {
        let img = OwnedImage::filled(9, 7, 0.25f32).unwrap();
        let blurred = gaussian_blur(img.view(), 2.0);
        for &v in blurred.data() {
            assert!((v - 0.25).abs() < 1e-6);
        }
    }
}
