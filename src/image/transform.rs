//! 2D affine transforms and bilinear resampling.
//!
//! Transforms are written in the forward direction (source pixel to output
//! pixel) and composed with [`Affine2::then`]. Rasterization walks the output
//! grid and maps each output pixel center back through the inverse transform.
//! Samples falling outside the source are edge-extended.

use crate::image::{ImageView, OwnedImage};
use crate::util::{IpDetectError, IpResult};

/// Affine map `(x, y) -> (a*x + b*y + tx, c*x + d*y + ty)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    tx: f32,
    ty: f32,
}

impl Affine2 {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Pure translation by `(dx, dy)`.
    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::identity()
        }
    }

    /// Rotation by `theta` radians about the origin; `(1, 0)` maps to
    /// `(cos theta, sin theta)`, the same convention as `atan2(Iy, Ix)`.
    pub fn rotate(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Axis-aligned scaling about the origin.
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Returns the transform that applies `self` first and `next` second.
    pub fn then(self, next: Affine2) -> Affine2 {
        Affine2 {
            a: next.a * self.a + next.b * self.c,
            b: next.a * self.b + next.b * self.d,
            c: next.c * self.a + next.d * self.c,
            d: next.c * self.b + next.d * self.d,
            tx: next.a * self.tx + next.b * self.ty + next.tx,
            ty: next.c * self.tx + next.d * self.ty + next.ty,
        }
    }

    /// Returns the inverse transform, or `None` if the linear part is singular.
    pub fn inverse(&self) -> Option<Affine2> {
        let det = self.a * self.d - self.b * self.c;
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        Some(Affine2 {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + b * self.ty),
            ty: -(c * self.tx + d * self.ty),
        })
    }

    /// Maps a point through the transform.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }
}

/// Samples `src` at a real-valued position with bilinear interpolation and
/// edge extension.
pub fn sample_bilinear(src: ImageView<'_, f32>, x: f32, y: f32) -> f32 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as isize;
    let y0 = y0 as isize;

    let a = src.get_clamped(x0, y0);
    let b = src.get_clamped(x0 + 1, y0);
    let c = src.get_clamped(x0, y0 + 1);
    let d = src.get_clamped(x0 + 1, y0 + 1);

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;
    a * w00 + b * w10 + c * w01 + d * w11
}

/// Rasterizes `src` through the forward transform into a `width x height` image.
pub fn warp_bilinear(
    src: ImageView<'_, f32>,
    forward: &Affine2,
    width: usize,
    height: usize,
) -> IpResult<OwnedImage<f32>> {
    let inverse = forward.inverse().ok_or(IpDetectError::InvalidConfig {
        reason: "transform is not invertible",
    })?;
    let mut out = OwnedImage::filled(width, height, 0.0f32)?;
    for v in 0..height {
        for u in 0..width {
            let (sx, sy) = inverse.apply(u as f32, v as f32);
            out.set(u, v, sample_bilinear(src, sx, sy));
        }
    }
    Ok(out)
}
