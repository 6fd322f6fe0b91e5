//! Discrete extrema search over interest fields.

use crate::image::ImageView;
use crate::interest::PeakPolarity;
use crate::point::InterestPoint;

/// Tracks whether `center` is still a strict maximum and/or minimum as
/// neighbours are visited.
#[derive(Clone, Copy)]
struct ExtremumTest {
    center: f32,
    is_max: bool,
    is_min: bool,
}

impl ExtremumTest {
    fn new(center: f32, polarity: PeakPolarity) -> Self {
        Self {
            center,
            is_max: true,
            is_min: polarity == PeakPolarity::MinimaAndMaxima,
        }
    }

    #[inline]
    fn visit(&mut self, neighbour: f32) -> bool {
        self.is_max &= self.center > neighbour;
        self.is_min &= self.center < neighbour;
        self.holds()
    }

    fn holds(self) -> bool {
        self.is_max || self.is_min
    }
}

/// Visits the 3x3 neighbourhood of `(x, y)` in `plane`, skipping the centre
/// when `skip_center` is set. Stops early once `test` fails.
fn visit_ring(
    plane: &ImageView<'_, f32>,
    x: usize,
    y: usize,
    skip_center: bool,
    test: &mut ExtremumTest,
) -> bool {
    for ny in y - 1..=y + 1 {
        let Some(row) = plane.row(ny) else {
            return false;
        };
        for nx in x - 1..=x + 1 {
            if skip_center && nx == x && ny == y {
                continue;
            }
            if !test.visit(row[nx]) {
                return false;
            }
        }
    }
    true
}

/// Finds strict local extrema of `field` over its 8-neighbourhood.
///
/// Border pixels are never reported. Candidates carry scale 1.0 and the field
/// value as interest.
pub fn find_peaks(field: ImageView<'_, f32>, polarity: PeakPolarity) -> Vec<InterestPoint> {
    let (width, height) = (field.width(), field.height());
    let mut peaks = Vec::new();
    if width < 3 || height < 3 {
        return peaks;
    }

    for y in 1..height - 1 {
        let Some(row) = field.row(y) else {
            break;
        };
        for x in 1..width - 1 {
            let v = row[x];
            if !v.is_finite() {
                continue;
            }
            let mut test = ExtremumTest::new(v, polarity);
            if visit_ring(&field, x, y, true, &mut test) && test.holds() {
                peaks.push(InterestPoint::new(x as isize, y as isize, 1.0, v));
            }
        }
    }
    peaks
}

/// Finds strict extrema over the 26-neighbourhood in a stack of equally sized
/// fields.
///
/// The first and last planes only serve as neighbours. Each candidate gets
/// `plane_scale(k)` as its scale, where `k` is the plane it was found in.
pub fn find_peaks_stack(
    fields: &[ImageView<'_, f32>],
    polarity: PeakPolarity,
    plane_scale: impl Fn(usize) -> f32,
) -> Vec<InterestPoint> {
    let mut peaks = Vec::new();
    if fields.len() < 3 {
        return peaks;
    }
    let (width, height) = (fields[0].width(), fields[0].height());
    if width < 3 || height < 3 {
        return peaks;
    }
    if fields
        .iter()
        .any(|f| f.width() != width || f.height() != height)
    {
        return peaks;
    }

    for k in 1..fields.len() - 1 {
        let scale = plane_scale(k);
        let center_plane = &fields[k];
        for y in 1..height - 1 {
            let Some(row) = center_plane.row(y) else {
                break;
            };
            for x in 1..width - 1 {
                let v = row[x];
                if !v.is_finite() {
                    continue;
                }
                let mut test = ExtremumTest::new(v, polarity);
                let keep = visit_ring(center_plane, x, y, true, &mut test)
                    && visit_ring(&fields[k - 1], x, y, false, &mut test)
                    && visit_ring(&fields[k + 1], x, y, false, &mut test);
                if keep && test.holds() {
                    peaks.push(InterestPoint::new(x as isize, y as isize, scale, v));
                }
            }
        }
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::{find_peaks, find_peaks_stack};
    use crate::image::OwnedImage;
    use crate::interest::PeakPolarity;

    fn field_with(values: &[(usize, usize, f32)]) -> OwnedImage<f32> {
        let mut img = OwnedImage::filled(8, 8, 0.0f32).unwrap();
        for &(x, y, v) in values {
            img.set(x, y, v);
        }
        img
    }

    #[test]
    fn maxima_only_ignores_minima() {
        let img = field_with(&[(2, 2, 1.0), (5, 5, -1.0)]);
        let peaks = find_peaks(img.view(), PeakPolarity::MaximaOnly);
        assert_eq!(peaks.len(), 1);
        assert_eq!((peaks[0].ix, peaks[0].iy), (2, 2));
        assert_eq!(peaks[0].interest.value(), 1.0);

        let both = find_peaks(img.view(), PeakPolarity::MinimaAndMaxima);
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn plateaus_and_borders_are_not_peaks() {
        let img = field_with(&[(0, 3, 5.0), (3, 3, 1.0), (4, 3, 1.0)]);
        assert!(find_peaks(img.view(), PeakPolarity::MaximaOnly).is_empty());
    }

    #[test]
    fn stack_search_requires_cross_plane_dominance() {
        let below = field_with(&[(3, 3, 0.5)]);
        let center = field_with(&[(3, 3, 1.0), (5, 5, 1.0)]);
        let above = field_with(&[(5, 5, 2.0)]);
        let views = [below.view(), center.view(), above.view()];
        let peaks = find_peaks_stack(&views, PeakPolarity::MaximaOnly, |k| 1.5 * k as f32);
        assert_eq!(peaks.len(), 1);
        assert_eq!((peaks[0].ix, peaks[0].iy), (3, 3));
        assert_eq!(peaks[0].scale, 1.5);
    }

    #[test]
    fn stack_search_needs_three_planes() {
        let a = field_with(&[(3, 3, 1.0)]);
        let views = [a.view(), a.view()];
        assert!(find_peaks_stack(&views, PeakPolarity::MaximaOnly, |_| 1.0).is_empty());
    }
}
