//! Small numeric helpers shared by the detectors.

/// Rounds half away from zero for the non-negative coordinates used here
/// (`(int)(v + 0.5)` for positive `v`).
pub(crate) fn round_coord(v: f32) -> isize {
    (v + 0.5).floor() as isize
}
