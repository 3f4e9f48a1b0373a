//! Stateless gesture predicates over a landmark frame.
//!
//! All functions here are pure; session state (debouncing, cooldowns, pen tracking) lives in
//! [`super::state`].

use nalgebra::{Point2, Vector2};

use crate::hand::{LandmarkFrame, FINGERTIPS, PALM_LANDMARKS};

/// Computes the palm center: the mean of the wrist and the four finger base knuckles, in
/// normalized coordinates.
pub fn palm_center(frame: &LandmarkFrame) -> Point2<f32> {
    let mut sum = Vector2::zeros();
    for lm in PALM_LANDMARKS {
        sum += frame.get(*lm).xy();
    }
    Point2::from(sum / PALM_LANDMARKS.len() as f32)
}

/// Whether the hand forms a fist.
///
/// True iff *every* fingertip is within `threshold` (normalized units) of the palm center;
/// partial closure is not a fist.
pub fn is_fist(frame: &LandmarkFrame, threshold: f32) -> bool {
    let center = palm_center(frame).coords;
    FINGERTIPS
        .iter()
        .all(|tip| (frame.get(*tip).xy() - center).norm() < threshold)
}

/// Whether two filtered fingertip positions are close enough to count as a pinch.
///
/// The normalized delta is scaled to pixels per axis, and each axis is checked against
/// `threshold_px` on its own. The box-shaped acceptance region (rather than a radius) tolerates
/// canvases whose axes scale differently.
pub fn is_pinching(
    thumb: Vector2<f32>,
    index: Vector2<f32>,
    width_px: f32,
    height_px: f32,
    threshold_px: f32,
) -> bool {
    let dx = (thumb.x - index.x) * width_px;
    let dy = (thumb.y - index.y) * height_px;
    dx.abs() < threshold_px && dy.abs() < threshold_px
}

/// Pixel midpoint between the thumb and index tips.
///
/// Hosts draw a cursor marker here while the fingers are pinched together.
pub fn pinch_midpoint_px(
    thumb: Vector2<f32>,
    index: Vector2<f32>,
    width_px: f32,
    height_px: f32,
) -> Point2<f32> {
    Point2::new(
        (thumb.x + index.x) * 0.5 * width_px,
        (thumb.y + index.y) * 0.5 * height_px,
    )
}
