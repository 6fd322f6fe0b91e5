//! Weighted histograms over a fixed value range.

use crate::filter::gaussian_kernel;
use crate::image::ImageView;

/// Accumulates `weights` into `nbins` bins of `values` over `[min, max]`.
///
/// Bin `floor((v - min) / (max - min) * nbins)` is clamped to the last bin so
/// `v == max` lands there. Samples outside the range, non-finite samples and
/// samples outside the shared extent of both views are ignored.
pub fn weighted_histogram(
    values: ImageView<'_, f32>,
    weights: ImageView<'_, f32>,
    min: f32,
    max: f32,
    nbins: usize,
) -> Vec<f32> {
    let mut histo = vec![0.0f32; nbins];
    let range = max - min;
    if nbins == 0 || range.is_nan() || range <= 0.0 {
        return histo;
    }

    let width = values.width().min(weights.width());
    let height = values.height().min(weights.height());
    for y in 0..height {
        let (Some(vrow), Some(wrow)) = (values.row(y), weights.row(y)) else {
            break;
        };
        for (&v, &w) in vrow[..width].iter().zip(&wrow[..width]) {
            if !v.is_finite() || !w.is_finite() || v < min || v > max {
                continue;
            }
            let bin = (((v - min) / range) * nbins as f32).floor() as usize;
            histo[bin.min(nbins - 1)] += w;
        }
    }
    histo
}

/// Smooths a circular histogram with a Gaussian spanning `bandwidth` bins.
///
/// The kernel sigma is `bandwidth / 5` bins. Correlation wraps around both
/// ends of the histogram.
pub fn smooth_circular(histo: &[f32], bandwidth: f32) -> Vec<f32> {
    let n = histo.len();
    if n == 0 {
        return Vec::new();
    }
    let size = bandwidth.round().max(1.0) as usize;
    let kernel = gaussian_kernel(bandwidth / 5.0, size);
    let half = (kernel.len() / 2) as isize;
    (0..n as isize)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(t, &k)| {
                    let j = (i + t as isize - half).rem_euclid(n as isize) as usize;
                    k * histo[j]
                })
                .sum()
        })
        .collect()
}

/// Returns the bins strictly greater than both circular neighbours, in
/// ascending bin order.
pub fn find_circular_modes(histo: &[f32]) -> Vec<usize> {
    let n = histo.len();
    match n {
        0 => Vec::new(),
        1 => vec![0],
        _ => (0..n)
            .filter(|&i| {
                let prev = histo[(i + n - 1) % n];
                let next = histo[(i + 1) % n];
                histo[i] > prev && histo[i] > next
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{find_circular_modes, smooth_circular, weighted_histogram};
    use crate::image::ImageView;

    #[test]
    fn histogram_bins_and_ignores_out_of_range() {
        let values = [0.0f32, 0.49, 0.5, 1.0, 1.5, -0.1];
        let weights = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let v = ImageView::from_slice(&values, 6, 1).unwrap();
        let w = ImageView::from_slice(&weights, 6, 1).unwrap();
        let histo = weighted_histogram(v, w, 0.0, 1.0, 2);
        assert_eq!(histo, vec![3.0, 7.0]);
    }

    #[test]
    fn smoothing_preserves_mass_and_wraps() {
        let mut histo = vec![0.0f32; 12];
        histo[0] = 1.0;
        let smoothed = smooth_circular(&histo, 5.0);
        let total: f32 = smoothed.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(smoothed[11] > 0.0);
        assert!((smoothed[11] - smoothed[1]).abs() < 1e-6);
        assert!(smoothed[0] > smoothed[1]);
    }

    #[test]
    fn modes_compare_circular_neighbours() {
        let histo = [3.0f32, 1.0, 2.0, 1.0, 1.0, 2.0];
        assert_eq!(find_circular_modes(&histo), vec![0, 2]);
        assert!(find_circular_modes(&[1.0f32; 4]).is_empty());
    }
}
