//! Scale- and orientation-normalized support patches around keypoints.
//!
//! A support patch is the input to descriptor computation: the neighbourhood
//! of a point resampled so that the point sits at the patch centre, its
//! orientation points along +x and one patch pixel spans `scale` plane pixels.

use crate::image::pyramid::ImageOctave;
use crate::image::transform::{warp_bilinear, Affine2};
use crate::image::{ImageView, OwnedImage};
use crate::point::InterestPoint;
use crate::util::{IpDetectError, IpResult};

/// Default patch side length.
pub const DEFAULT_SUPPORT_SIZE: usize = 41;

/// Resamples a `size x size` patch of `plane` around `(x, y)`.
///
/// The forward map translates the point to the origin, rotates by
/// `-orientation`, scales by `1 / scale` and moves the origin to the patch
/// centre. Samples outside `plane` are edge-extended.
pub fn extract_support(
    plane: ImageView<'_, f32>,
    x: f32,
    y: f32,
    scale: f32,
    orientation: f32,
    size: usize,
) -> IpResult<OwnedImage<f32>> {
    if size == 0 || size % 2 == 0 {
        return Err(IpDetectError::InvalidConfig {
            reason: "support size must be odd",
        });
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(IpDetectError::InvalidConfig {
            reason: "support scale must be positive and finite",
        });
    }
    let half = (size / 2) as f32;
    let forward = Affine2::translate(-x, -y)
        .then(Affine2::rotate(-orientation))
        .then(Affine2::scale(1.0 / scale, 1.0 / scale))
        .then(Affine2::translate(half, half));
    warp_bilinear(plane, &forward, size, size)
}

/// Extracts the support patch of a detected point from its octave.
///
/// `point` is in base-image coordinates; the plane is selected from its scale
/// and position and scale are mapped into that plane's pixel grid. An
/// unoriented point is sampled upright.
pub fn support_from_octave(
    point: &InterestPoint,
    octave: &ImageOctave,
    size: usize,
) -> IpResult<OwnedImage<f32>> {
    let k = octave.scale_to_plane_index(point.scale);
    let plane = octave.plane(k).ok_or(IpDetectError::IndexOutOfBounds {
        index: k,
        len: octave.num_planes(),
        context: "octave plane",
    })?;
    let b = octave.base_scale();
    extract_support(
        plane,
        point.x / b,
        point.y / b,
        point.scale / b,
        point.orientation.unwrap_or(0.0),
        size,
    )
}

#[cfg(test)]
mod tests {
    use super::{extract_support, support_from_octave};
    use crate::image::pyramid::ImageOctave;
    use crate::image::OwnedImage;
    use crate::point::InterestPoint;
    use crate::util::IpDetectError;
    use std::f32::consts::FRAC_PI_2;

    fn ramp_x(size: usize) -> OwnedImage<f32> {
        let data = (0..size * size).map(|i| (i % size) as f32).collect();
        OwnedImage::from_vec(data, size, size).unwrap()
    }

    #[test]
    fn upright_patch_is_centered_on_point() {
        let img = ramp_x(64);
        let patch = extract_support(img.view(), 30.0, 32.0, 1.0, 0.0, 41).unwrap();
        assert_eq!((patch.width(), patch.height()), (41, 41));
        assert!((patch.get(20, 20).unwrap() - 30.0).abs() < 1e-4);
        assert!((patch.get(21, 20).unwrap() - 31.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_and_scale_follow_the_point_frame() {
        let img = ramp_x(64);
        // Rotated a quarter turn, patch +y runs along image -x.
        let patch = extract_support(img.view(), 32.0, 32.0, 2.0, FRAC_PI_2, 21).unwrap();
        let center = patch.get(10, 10).unwrap();
        assert!((center - 32.0).abs() < 1e-3);
        assert!((patch.get(10, 11).unwrap() - 30.0).abs() < 1e-3);
        assert!((patch.get(11, 10).unwrap() - 32.0).abs() < 1e-3);
    }

    #[test]
    fn even_size_is_rejected() {
        let img = ramp_x(8);
        assert_eq!(
            extract_support(img.view(), 4.0, 4.0, 1.0, 0.0, 8).unwrap_err(),
            IpDetectError::InvalidConfig {
                reason: "support size must be odd"
            }
        );
    }

    #[test]
    fn octave_support_maps_base_coordinates_into_plane() {
        let img = ramp_x(64);
        let mut octave = ImageOctave::new(img.view(), 3, 1.6, 0.5).unwrap();
        assert!(octave.build_next().unwrap());
        let mut p = InterestPoint::new(40, 40, octave.plane_index_to_scale(1.0), 1.0);
        p.orientation = Some(0.0);
        let patch = support_from_octave(&p, &octave, 11).unwrap();
        let plane = octave.plane(1).unwrap();
        assert!((patch.get(5, 5).unwrap() - plane.get_clamped(20, 20)).abs() < 1e-3);
    }
}
