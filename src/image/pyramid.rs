//! Gaussian scale-space octaves.
//!
//! An octave holds `scales + 2` planes of the same size. Plane `k` is blurred
//! to `sigma[k] = init_sigma * 2^((k - 1) / scales)` in plane pixels, so plane
//! 1 is the reference plane and plane `scales` carries twice the sigma of
//! plane 0. Advancing to the next octave downsamples that plane with a 2x2
//! box average, which lands it at `sigma[0]` in the new pixel grid.

use crate::filter::gaussian_blur;
use crate::image::{ImageView, OwnedImage};
use crate::util::{IpDetectError, IpResult};

/// One octave of a Gaussian scale space.
#[derive(Clone, Debug)]
pub struct ImageOctave {
    planes: Vec<OwnedImage<f32>>,
    sigmas: Vec<f32>,
    scales: usize,
    base_scale: f32,
}

impl ImageOctave {
    /// Index of the reference plane.
    pub const REFERENCE_PLANE: usize = 1;

    /// Builds the first octave from `source`, assumed to carry
    /// `source_sigma` of blur already.
    pub fn new(
        source: ImageView<'_, f32>,
        scales: usize,
        init_sigma: f32,
        source_sigma: f32,
    ) -> IpResult<Self> {
        if scales == 0 {
            return Err(IpDetectError::InvalidConfig {
                reason: "scales per octave must be positive",
            });
        }
        if !init_sigma.is_finite() || init_sigma <= 0.0 {
            return Err(IpDetectError::InvalidConfig {
                reason: "init_sigma must be positive and finite",
            });
        }
        if !source_sigma.is_finite() || source_sigma < 0.0 {
            return Err(IpDetectError::InvalidConfig {
                reason: "source_sigma must be non-negative and finite",
            });
        }

        let sigmas: Vec<f32> = (0..scales + 2)
            .map(|k| init_sigma * plane_factor(k as f32, scales))
            .collect();
        let base = blur_from_to(source, source_sigma, sigmas[0]);
        let mut octave = Self {
            planes: Vec::with_capacity(sigmas.len()),
            sigmas,
            scales,
            base_scale: 1.0,
        };
        octave.rebuild(base);
        Ok(octave)
    }

    fn rebuild(&mut self, base: OwnedImage<f32>) {
        self.planes.clear();
        self.planes.push(base);
        for k in 1..self.sigmas.len() {
            let prev = &self.planes[k - 1];
            let next = blur_from_to(prev.view(), self.sigmas[k - 1], self.sigmas[k]);
            self.planes.push(next);
        }
    }

    /// Advances to the next octave.
    ///
    /// Returns `false`, leaving the octave untouched, when the planes are too
    /// small to halve.
    pub fn build_next(&mut self) -> IpResult<bool> {
        let Some(seed) = self.planes.get(self.scales) else {
            return Ok(false);
        };
        if seed.width() < 2 || seed.height() < 2 {
            return Ok(false);
        }
        let half = downsample_box(seed.view())?;
        self.rebuild(half);
        self.base_scale *= 2.0;
        Ok(true)
    }

    /// Number of scales per octave (`S`).
    pub fn num_scales(&self) -> usize {
        self.scales
    }

    /// Number of planes (`S + 2`).
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    /// Factor that converts plane coordinates to base-image coordinates.
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    /// Gaussian sigma of plane `k` in plane pixels.
    pub fn sigma(&self, k: usize) -> Option<f32> {
        self.sigmas.get(k).copied()
    }

    pub fn sigmas(&self) -> &[f32] {
        &self.sigmas
    }

    /// `sigma[k] / sigma[reference]`, the orientation window scaling for plane `k`.
    pub fn sigma_ratio(&self, k: usize) -> f32 {
        let reference = self.sigmas[Self::REFERENCE_PLANE];
        self.sigma(k).map_or(1.0, |s| s / reference)
    }

    pub fn plane(&self, k: usize) -> Option<ImageView<'_, f32>> {
        self.planes.get(k).map(|p| p.view())
    }

    pub fn planes(&self) -> &[OwnedImage<f32>] {
        &self.planes
    }

    /// Absolute scale of a (possibly fractional) plane index.
    pub fn plane_index_to_scale(&self, k: f32) -> f32 {
        self.base_scale * plane_factor(k, self.scales)
    }

    /// Nearest plane index for an absolute scale, clamped to valid planes.
    pub fn scale_to_plane_index(&self, scale: f32) -> usize {
        let k = (self.scales as f32 * (scale / self.base_scale).log2() + 1.0).round();
        if k.is_nan() {
            return Self::REFERENCE_PLANE;
        }
        k.clamp(0.0, (self.num_planes() - 1) as f32) as usize
    }
}

#[inline]
fn plane_factor(k: f32, scales: usize) -> f32 {
    ((k - 1.0) / scales as f32).exp2()
}

/// Blurs an image carrying `from` sigma up to `to` sigma.
fn blur_from_to(image: ImageView<'_, f32>, from: f32, to: f32) -> OwnedImage<f32> {
    let extra = (to * to - from * from).max(0.0).sqrt();
    if extra > 1e-3 {
        gaussian_blur(image, extra)
    } else {
        image.to_owned_image()
    }
}

/// Halves an image with a 2x2 box average. Odd trailing rows/columns are dropped.
fn downsample_box(src: ImageView<'_, f32>) -> IpResult<OwnedImage<f32>> {
    let dst_width = src.width() / 2;
    let dst_height = src.height() / 2;
    let dst_len = dst_width
        .checked_mul(dst_height)
        .ok_or(IpDetectError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        })?;
    let mut dst = Vec::with_capacity(dst_len);

    for y in 0..dst_height {
        let (Some(row0), Some(row1)) = (src.row(y * 2), src.row(y * 2 + 1)) else {
            return Err(IpDetectError::BufferTooSmall {
                needed: (y * 2 + 2) * src.stride(),
                got: src.as_slice().len(),
            });
        };
        for x in 0..dst_width {
            let sum = row0[2 * x] + row0[2 * x + 1] + row1[2 * x] + row1[2 * x + 1];
            dst.push(0.25 * sum);
        }
    }

    OwnedImage::from_vec(dst, dst_width, dst_height)
}

#[cfg(test)]
mod tests {
    use super::ImageOctave;
    use crate::image::OwnedImage;

    fn ramp(width: usize, height: usize) -> OwnedImage<f32> {
        let data = (0..width * height).map(|i| (i % width) as f32).collect();
        OwnedImage::from_vec(data, width, height).unwrap()
    }

    #[test]
    fn sigmas_double_across_scales() {
        let img = ramp(32, 32);
        let octave = ImageOctave::new(img.view(), 3, 1.6, 0.5).unwrap();
        assert_eq!(octave.num_planes(), 5);
        assert!((octave.sigma(1).unwrap() - 1.6).abs() < 1e-6);
        let s0 = octave.sigma(0).unwrap();
        assert!((octave.sigma(3).unwrap() - 2.0 * s0).abs() < 1e-5);
        assert!((octave.sigma_ratio(4) - 2.0f32.powf(1.0)).abs() < 1e-5);
    }

    #[test]
    fn scale_mapping_round_trips_on_plane_indices() {
        let img = ramp(32, 32);
        let mut octave = ImageOctave::new(img.view(), 3, 1.6, 0.5).unwrap();
        assert!(octave.build_next().unwrap());
        assert_eq!(octave.base_scale(), 2.0);
        for k in 0..octave.num_planes() {
            let s = octave.plane_index_to_scale(k as f32);
            assert_eq!(octave.scale_to_plane_index(s), k);
        }
        assert_eq!(octave.scale_to_plane_index(1e-6), 0);
        assert_eq!(octave.scale_to_plane_index(1e6), octave.num_planes() - 1);
    }

    #[test]
    fn build_next_halves_planes() {
        let img = ramp(33, 20);
        let mut octave = ImageOctave::new(img.view(), 2, 1.6, 0.5).unwrap();
        assert!(octave.build_next().unwrap());
        assert_eq!((octave.width(), octave.height()), (16, 10));
        assert_eq!(octave.planes().len(), 4);

        let tiny = ramp(1, 4);
        let mut octave = ImageOctave::new(tiny.view(), 2, 1.6, 0.5).unwrap();
        assert!(!octave.build_next().unwrap());
        assert_eq!(octave.base_scale(), 1.0);
    }

    #[test]
    fn rejects_zero_scales() {
        let img = ramp(8, 8);
        assert!(ImageOctave::new(img.view(), 0, 1.6, 0.5).is_err());
    }
}
