//! Subpixel (and subscale) localization of discrete extrema.
//!
//! Each axis is refined independently with a three-sample quadratic fit
//! around the integer location. An axis whose fit fails keeps its integer
//! coordinate; the functions report whether every axis converged so callers
//! can decide whether to keep poorly localized points.

pub mod quad1d;

use crate::image::ImageView;
use crate::point::InterestPoint;
use quad1d::quad_extremum_offset_1d;

/// Result of refining a point inside a stack of score planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackFit {
    /// Fractional plane index of the refined extremum.
    pub plane: f32,
    /// True when the x, y and plane fits all succeeded.
    pub converged: bool,
}

/// Refines `point.x` and `point.y` around `(point.ix, point.iy)` in `field`.
///
/// Returns true when both axes converged.
pub fn fit_peak(field: ImageView<'_, f32>, point: &mut InterestPoint) -> bool {
    let (ix, iy) = (point.ix, point.iy);
    let f0 = field.get_clamped(ix, iy);
    let xm = field.get_clamped(ix - 1, iy);
    let xp = field.get_clamped(ix + 1, iy);
    let ym = field.get_clamped(ix, iy - 1);
    let yp = field.get_clamped(ix, iy + 1);
    let valley = xm + xp + ym + yp > 4.0 * f0;

    let dx = quad_extremum_offset_1d(xm, f0, xp, valley);
    let dy = quad_extremum_offset_1d(ym, f0, yp, valley);
    point.x = ix as f32 + dx.unwrap_or(0.0);
    point.y = iy as f32 + dy.unwrap_or(0.0);
    dx.is_some() && dy.is_some()
}

/// Refines position and plane of `point`, detected at integer `plane` of
/// `fields`.
///
/// The plane fit needs both neighbouring planes; at the first or last plane it
/// reports failure and keeps the integer plane.
pub fn fit_peak_stack(
    fields: &[ImageView<'_, f32>],
    plane: usize,
    point: &mut InterestPoint,
) -> StackFit {
    let Some(center) = fields.get(plane) else {
        return StackFit {
            plane: plane as f32,
            converged: false,
        };
    };
    let spatial = fit_peak(*center, point);

    let (ix, iy) = (point.ix, point.iy);
    let f0 = center.get_clamped(ix, iy);
    let neighbours = plane
        .checked_sub(1)
        .and_then(|below| Some((fields.get(below)?, fields.get(plane + 1)?)));
    let ds = neighbours.and_then(|(below, above)| {
        let sm = below.get_clamped(ix, iy);
        let sp = above.get_clamped(ix, iy);
        let valley = sm + sp > 2.0 * f0;
        quad_extremum_offset_1d(sm, f0, sp, valley)
    });

    StackFit {
        plane: plane as f32 + ds.unwrap_or(0.0),
        converged: spatial && ds.is_some(),
    }
}
