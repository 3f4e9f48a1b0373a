//! Hand landmark data model.
//!
//! Landmark positions follow the 21-point MediaPipe hand layout. Index identity is a stable
//! contract with the upstream tracker and is never reordered; [`LandmarkIdx`] names the indices
//! this crate relies on.

use anyhow::{ensure, Result};
use nalgebra::Vector2;

/// Number of landmarks in a hand frame.
pub const LANDMARK_COUNT: usize = 21;

/// A single hand landmark in normalized image coordinates.
///
/// `x` and `y` are in `[0, 1]`. `z` is a relative depth estimate that gesture interpretation
/// does not use.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The landmark's position in the image plane, ignoring depth.
    pub fn xy(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: Carpometacarpal joint, the lowest joint of the thumb, located near the wrist.
/// - **MCP**: Metacarpophalangeal joint, the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// The wrist and finger base knuckles, averaged to estimate the palm center.
pub(crate) const PALM_LANDMARKS: &[LandmarkIdx] = {
    use LandmarkIdx::*;
    &[Wrist, IndexFingerMcp, MiddleFingerMcp, RingFingerMcp, PinkyMcp]
};

/// The five fingertip landmarks.
pub(crate) const FINGERTIPS: &[LandmarkIdx] = {
    use LandmarkIdx::*;
    &[
        ThumbTip,
        IndexFingerTip,
        MiddleFingerTip,
        RingFingerTip,
        PinkyTip,
    ]
};

/// One tracked hand: an ordered, fixed-length set of [`LANDMARK_COUNT`] landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Wraps a full set of landmarks.
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Builds a frame from a tracker output slice.
    ///
    /// Fails when the slice does not hold exactly [`LANDMARK_COUNT`] landmarks. A frame of the
    /// wrong shape is never partially interpreted; fingertip and knuckle indices are all
    /// load-bearing.
    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self> {
        ensure!(
            landmarks.len() == LANDMARK_COUNT,
            "expected {} landmarks, got {}",
            LANDMARK_COUNT,
            landmarks.len()
        );
        let mut frame = [Landmark::default(); LANDMARK_COUNT];
        frame.copy_from_slice(landmarks);
        Ok(Self { landmarks: frame })
    }

    /// Returns the landmark at `index`.
    pub fn get(&self, index: LandmarkIdx) -> Landmark {
        self.landmarks[index as usize]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Returns the frame flipped horizontally (`x → 1 − x`).
    ///
    /// Selfie-view video is usually mirrored for display; flipping the landmarks keeps gesture
    /// coordinates aligned with what the user sees.
    pub fn mirror_x(&self) -> Self {
        let mut landmarks = self.landmarks;
        for lm in &mut landmarks {
            lm.x = 1.0 - lm.x;
        }
        Self { landmarks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_wrong_shapes() {
        let short = vec![Landmark::default(); 20];
        assert!(LandmarkFrame::from_slice(&short).is_err());

        let long = vec![Landmark::default(); 22];
        assert!(LandmarkFrame::from_slice(&long).is_err());

        let exact = vec![Landmark::default(); LANDMARK_COUNT];
        assert!(LandmarkFrame::from_slice(&exact).is_ok());
    }

    #[test]
    fn named_indices_match_the_wire_layout() {
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        landmarks[4] = Landmark::new(0.4, 0.0, 0.0);
        landmarks[8] = Landmark::new(0.8, 0.0, 0.0);
        landmarks[0] = Landmark::new(0.1, 0.0, 0.0);

        let frame = LandmarkFrame::new(landmarks);
        assert_eq!(frame.get(LandmarkIdx::ThumbTip).x, 0.4);
        assert_eq!(frame.get(LandmarkIdx::IndexFingerTip).x, 0.8);
        assert_eq!(frame.get(LandmarkIdx::Wrist).x, 0.1);
    }

    #[test]
    fn mirroring_flips_x_only() {
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        landmarks[8] = Landmark::new(0.25, 0.6, 0.1);

        let mirrored = LandmarkFrame::new(landmarks).mirror_x();
        let tip = mirrored.get(LandmarkIdx::IndexFingerTip);
        assert_eq!(tip.x, 0.75);
        assert_eq!(tip.y, 0.6);
        assert_eq!(tip.z, 0.1);
    }
}
