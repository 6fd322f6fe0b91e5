//! Interest point records and point-set utilities.

use crate::image::tiles::Rect;
use crate::util::{IpDetectError, IpResult};
use std::cmp::Ordering;
use std::ops::Index;

/// Interest function value at a detected point.
///
/// Corner scores are compared signed, blob scores by magnitude; the two
/// predicates below keep those comparisons explicit at the call sites.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Score(pub f32);

impl Score {
    /// Returns the raw score.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true when the score is strictly greater than `threshold`.
    pub fn exceeds(self, threshold: f32) -> bool {
        self.0 > threshold
    }

    /// Returns true when `|score|` is strictly greater than `threshold`.
    pub fn magnitude_exceeds(self, threshold: f32) -> bool {
        self.0.abs() > threshold
    }
}

/// One detected keypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct InterestPoint {
    /// Subpixel column.
    pub x: f32,
    /// Subpixel row.
    pub y: f32,
    /// Integer column, mainly for internal use.
    pub ix: isize,
    /// Integer row, mainly for internal use.
    pub iy: isize,
    /// Detection scale; 1.0 for single-scale detection.
    pub scale: f32,
    /// Canonical orientation in `[-pi, pi)`, `None` until assigned.
    pub orientation: Option<f32>,
    /// Interest function value.
    pub interest: Score,
    /// Descriptor vector, empty at detection time.
    pub descriptor: Vec<f32>,
}

impl InterestPoint {
    /// Creates an unoriented point at an integer location.
    pub fn new(ix: isize, iy: isize, scale: f32, interest: f32) -> Self {
        Self {
            x: ix as f32,
            y: iy as f32,
            ix,
            iy,
            scale,
            orientation: None,
            interest: Score(interest),
            descriptor: Vec::new(),
        }
    }

    /// Number of position coordinates.
    pub fn size(&self) -> usize {
        2
    }

    /// Returns coordinate `index` (0 = x, 1 = y).
    pub fn coord(&self, index: usize) -> IpResult<f32> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            _ => Err(IpDetectError::IndexOutOfBounds {
                index,
                len: 2,
                context: "interest point coordinate",
            }),
        }
    }

    /// Moves the point by an integer offset, keeping both coordinate forms in sync.
    pub fn translate(&mut self, dx: usize, dy: usize) {
        self.x += dx as f32;
        self.y += dy as f32;
        self.ix += dx as isize;
        self.iy += dy as isize;
    }

    /// Returns a copy of the point carrying `orientation`.
    pub fn with_orientation(&self, orientation: f32) -> Self {
        Self {
            orientation: Some(orientation),
            ..self.clone()
        }
    }
}

impl Index<usize> for InterestPoint {
    type Output = f32;

    /// Panics for any index other than 0 or 1.
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("interest point: invalid coordinate index {index}"),
        }
    }
}

/// Orders points by descending interest with deterministic tie-breaking.
pub fn cmp_interest_desc(a: &InterestPoint, b: &InterestPoint) -> Ordering {
    b.interest
        .0
        .total_cmp(&a.interest.0)
        .then_with(|| a.iy.cmp(&b.iy))
        .then_with(|| a.ix.cmp(&b.ix))
}

/// Sorts by descending interest and keeps at most `max_points` points.
///
/// `max_points == 0` sorts without truncating.
pub fn cull(points: &mut Vec<InterestPoint>, max_points: usize) {
    points.sort_by(cmp_interest_desc);
    if max_points > 0 && points.len() > max_points {
        points.truncate(max_points);
    }
}

/// Keeps only the points inside `bbox`.
pub fn crop_points(points: &[InterestPoint], bbox: Rect) -> Vec<InterestPoint> {
    points
        .iter()
        .filter(|p| bbox.contains(p.x, p.y))
        .cloned()
        .collect()
}

/// Row-major 3x3 homography.
pub type Homography = [[f64; 3]; 3];

/// Distance between `p2` and `p1` mapped through `h`, used to score keypoint
/// correspondences during robust matching.
///
/// Returns infinity when `h` sends `p1` to the line at infinity.
pub fn transfer_error(h: &Homography, p1: &InterestPoint, p2: &InterestPoint) -> f64 {
    let (x, y) = (f64::from(p1.x), f64::from(p1.y));
    let u = h[0][0] * x + h[0][1] * y + h[0][2];
    let v = h[1][0] * x + h[1][1] * y + h[1][2];
    let w = h[2][0] * x + h[2][1] * y + h[2][2];
    if w.abs() < 1e-12 {
        return f64::INFINITY;
    }
    let dx = f64::from(p2.x) - u / w;
    let dy = f64::from(p2.y) - v / w;
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::{cull, transfer_error, InterestPoint, Score};

    fn point(ix: isize, interest: f32) -> InterestPoint {
        InterestPoint::new(ix, 0, 1.0, interest)
    }

    #[test]
    fn cull_keeps_highest_scores_first() {
        let mut pts = vec![point(0, 0.1), point(1, 0.9), point(2, 0.5), point(3, 0.7)];
        cull(&mut pts, 2);
        let scores: Vec<f32> = pts.iter().map(|p| p.interest.value()).collect();
        assert_eq!(scores, vec![0.9, 0.7]);
    }

    #[test]
    fn zero_limit_disables_culling() {
        let mut pts = vec![point(0, 0.1), point(1, 0.9)];
        cull(&mut pts, 0);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].ix, 1);
    }

    #[test]
    fn score_predicates() {
        assert!(Score(0.5).exceeds(0.4));
        assert!(!Score(0.4).exceeds(0.4));
        assert!(Score(-0.5).magnitude_exceeds(0.4));
        assert!(!Score(-0.5).exceeds(0.4));
    }

    #[test]
    fn transfer_error_with_translation() {
        let h = [[1.0, 0.0, 3.0], [0.0, 1.0, 4.0], [0.0, 0.0, 1.0]];
        let p1 = InterestPoint::new(1, 1, 1.0, 0.0);
        let p2 = InterestPoint::new(4, 5, 1.0, 0.0);
        assert!(transfer_error(&h, &p1, &p2).abs() < 1e-9);
        let p3 = InterestPoint::new(7, 9, 1.0, 0.0);
        assert!((transfer_error(&h, &p1, &p3) - 5.0).abs() < 1e-9);
    }
}
