//! Quadratic 1D fitting through three equally spaced samples.

/// Estimates the sub-sample offset of a maximum.
///
/// Given samples at `x = -1, 0, +1` (`fm`, `f0`, `fp`), this returns the peak
/// offset `dx` in `[-1, 1]` when the fitted parabola is concave and stable.
/// Flat, convex or non-finite samples return `None`.
pub fn quad_peak_offset_1d(fm: f32, f0: f32, fp: f32) -> Option<f32> {
    if !fm.is_finite() || !f0.is_finite() || !fp.is_finite() {
        return None;
    }

    let denom = fm - 2.0 * f0 + fp;
    if denom.abs() < 1e-12 || denom >= 0.0 {
        return None;
    }

    let dx = 0.5 * (fm - fp) / denom;
    if dx.is_finite() && dx.abs() <= 1.0 {
        Some(dx)
    } else {
        None
    }
}

/// Estimates the sub-sample offset of a minimum.
pub fn quad_valley_offset_1d(fm: f32, f0: f32, fp: f32) -> Option<f32> {
    quad_peak_offset_1d(-fm, -f0, -fp)
}

/// Fits a maximum or a minimum depending on `valley`.
pub(crate) fn quad_extremum_offset_1d(fm: f32, f0: f32, fp: f32, valley: bool) -> Option<f32> {
    if valley {
        quad_valley_offset_1d(fm, f0, fp)
    } else {
        quad_peak_offset_1d(fm, f0, fp)
    }
}
