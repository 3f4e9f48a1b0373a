//! Per-frame orchestration: filtering, classification, command emission.
//!
//! A [`GesturePipeline`] is one complete drawing session. It is single-threaded and
//! frame-driven: the caller feeds one [`Frame`] at a time, at whatever cadence the upstream
//! tracker produces, and receives the resulting commands through a
//! [`DrawSink`](crate::gesture::state::DrawSink). Backpressure (dropping or buffering frames
//! when inference lags) is the caller's concern; nothing here blocks or queues.

use std::collections::HashMap;

use anyhow::{ensure, Result};
use nalgebra::Point2;

use crate::{
    filter::{Ema, Filter, FilterBank, OneEuroFilter, OneEuroParams},
    gesture::{
        classifier,
        state::{DrawSink, GestureInput, GestureStateMachine},
    },
    hand::{LandmarkFrame, LandmarkIdx},
};

/// The points tracked through the filter bank.
///
/// The draw point and the pinch-detection index point come from the same landmark but are
/// filtered independently, so pinch stability and stroke smoothness can be tuned apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedPoint {
    /// Index fingertip, as the stroke cursor.
    Draw,
    /// Thumb tip, as used by pinch detection.
    PinchThumb,
    /// Index fingertip, as used by pinch detection.
    PinchIndex,
}

/// Secondary smoothing applied to the draw point after the adaptive filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokePolicy {
    /// Use the adaptive filter output directly.
    Raw,
    /// Blend the filter output through an extra exponential moving average.
    Ema {
        alpha: f32,
    },
    /// Like [`StrokePolicy::Ema`], but additionally interpolates from the previously emitted
    /// point toward the target while a stroke is active, hiding inference-rate stutter.
    Interpolated {
        alpha: f32,
    },
}

/// Interpolation only applies while emissions are at most this many seconds apart.
const INTERP_WINDOW: f64 = 0.050;
/// Upper bound on the per-frame blend toward the target point.
const INTERP_MAX_BLEND: f32 = 0.3;

/// One input frame from the tracking collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Capture timestamp in seconds. Must be non-decreasing within a session; frames that do
    /// not advance the clock leave the filters untouched.
    pub timestamp: f64,
    /// The tracked hand, or `None` when no hand was detected.
    pub landmarks: Option<LandmarkFrame>,
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Parameters shared by the three tracked-point filters.
    pub filter: OneEuroParams,
    /// Normalized fingertip-to-palm distance below which the hand counts as a fist.
    pub fist_threshold: f32,
    /// Per-axis pixel distance below which thumb and index tips count as pinching.
    pub pinch_threshold_px: f32,
    /// Time in seconds after a clear during which drawing stays suppressed.
    pub cooldown_duration: f64,
    /// Secondary smoothing of the draw point.
    pub stroke: StrokePolicy,
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
}

impl Config {
    /// The default whiteboard tuning: gentle filtering plus EMA and stroke interpolation.
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            filter: OneEuroParams {
                min_cutoff: 1.0,
                beta: 0.05,
                d_cutoff: 0.8,
            },
            fist_threshold: 0.12,
            pinch_threshold_px: 50.0,
            cooldown_duration: 1.0,
            stroke: StrokePolicy::Interpolated { alpha: 0.4 },
            canvas_width,
            canvas_height,
        }
    }

    /// A lower-latency tuning: stiffer filtering, no secondary smoothing.
    pub fn low_latency(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            filter: OneEuroParams {
                min_cutoff: 2.2,
                beta: 0.18,
                d_cutoff: 1.2,
            },
            stroke: StrokePolicy::Raw,
            ..Self::new(canvas_width, canvas_height)
        }
    }

    /// Checks the configuration, rejecting values the filters and predicates cannot support.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.filter.min_cutoff > 0.0, "min_cutoff must be positive");
        ensure!(self.filter.d_cutoff > 0.0, "d_cutoff must be positive");
        ensure!(self.filter.beta >= 0.0, "beta must not be negative");
        ensure!(self.fist_threshold > 0.0, "fist_threshold must be positive");
        ensure!(
            self.pinch_threshold_px > 0.0,
            "pinch_threshold_px must be positive"
        );
        ensure!(
            self.cooldown_duration >= 0.0,
            "cooldown_duration must not be negative"
        );
        ensure!(
            self.canvas_width > 0.0 && self.canvas_height > 0.0,
            "canvas must have a nonzero size"
        );
        if let StrokePolicy::Ema { alpha } | StrokePolicy::Interpolated { alpha } = self.stroke {
            ensure!(
                (0.0..=1.0).contains(&alpha),
                "stroke EMA alpha must be within [0, 1]"
            );
        }
        Ok(())
    }
}

/// A complete drawing session: filter bank, gesture state machine and draw-point smoothing.
#[derive(Debug)]
pub struct GesturePipeline {
    config: Config,
    bank: FilterBank<TrackedPoint>,
    machine: GestureStateMachine,
    stroke_ema: Option<Ema<2>>,
    /// Anchor for stroke interpolation: the last emitted draw point and its emission time.
    last_emitted: Option<(Point2<f32>, f64)>,
    /// Whether the filters currently track a live hand; cleared on hand loss so the next valid
    /// frame reseeds them instead of smoothing against stale state.
    seeded: bool,
}

impl GesturePipeline {
    /// Creates a pipeline for one drawing session.
    ///
    /// Fails if `config` does not pass [`Config::validate`].
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let stroke_ema = match config.stroke {
            StrokePolicy::Raw => None,
            StrokePolicy::Ema { alpha } | StrokePolicy::Interpolated { alpha } => {
                Some(Ema::new(alpha))
            }
        };
        Ok(Self {
            bank: FilterBank::new(),
            machine: GestureStateMachine::new(config.cooldown_duration),
            stroke_ema,
            last_emitted: None,
            seeded: false,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a stroke is currently active.
    pub fn is_pen_down(&self) -> bool {
        self.machine.is_pen_down()
    }

    /// Updates the canvas dimensions, e.g. after a window resize.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not strictly positive.
    pub fn set_canvas_size(&mut self, width_px: f32, height_px: f32) {
        assert!(width_px > 0.0 && height_px > 0.0);
        self.config.canvas_width = width_px;
        self.config.canvas_height = height_px;
    }

    /// Processes one frame, delivering the resulting commands to `sink` in order.
    pub fn process(&mut self, frame: &Frame, sink: &mut impl DrawSink) {
        let now = frame.timestamp;
        let Some(landmarks) = &frame.landmarks else {
            // Definitive hand loss. Filter state goes stale here and is reseeded on
            // reacquisition rather than smoothed against.
            self.machine.step(now, GestureInput::HandLost, sink);
            self.seeded = false;
            self.last_emitted = None;
            if let Some(ema) = &mut self.stroke_ema {
                ema.reset();
            }
            return;
        };

        if classifier::is_fist(landmarks, self.config.fist_threshold) {
            // Neither drawing nor filtering happens while the hand forms a fist; the filters
            // pick the signal back up, with the elapsed gap, once the hand opens.
            self.machine.step(now, GestureInput::Fist, sink);
            self.last_emitted = None;
            return;
        }

        let raw = HashMap::from([
            (
                TrackedPoint::Draw,
                landmarks.get(LandmarkIdx::IndexFingerTip).xy(),
            ),
            (
                TrackedPoint::PinchThumb,
                landmarks.get(LandmarkIdx::ThumbTip).xy(),
            ),
            (
                TrackedPoint::PinchIndex,
                landmarks.get(LandmarkIdx::IndexFingerTip).xy(),
            ),
        ]);

        let filtered = if self.seeded {
            self.bank.advance(now, &raw)
        } else {
            log::debug!("hand acquired at t={now:.3}, seeding filters");
            if self.bank.is_empty() {
                for (key, value) in &raw {
                    self.bank
                        .insert(*key, OneEuroFilter::new(now, *value, self.config.filter));
                }
            } else {
                self.bank.reset(now, &raw);
            }
            self.seeded = true;
            raw
        };

        let pinch = classifier::is_pinching(
            filtered[&TrackedPoint::PinchThumb],
            filtered[&TrackedPoint::PinchIndex],
            self.config.canvas_width,
            self.config.canvas_height,
            self.config.pinch_threshold_px,
        );

        let draw = filtered[&TrackedPoint::Draw];
        let target = Point2::new(
            draw.x * self.config.canvas_width,
            draw.y * self.config.canvas_height,
        );
        let draw_point = self.smooth_draw_point(target, now);

        self.machine
            .step(now, GestureInput::Open { pinch, draw_point }, sink);

        // The interpolation anchor follows emitted points and dies with the stroke.
        self.last_emitted = if self.machine.is_pen_down() {
            Some((draw_point, now))
        } else {
            None
        };
    }

    /// Applies the configured [`StrokePolicy`] to the filtered draw point.
    fn smooth_draw_point(&mut self, target_px: Point2<f32>, now: f64) -> Point2<f32> {
        let target = match &mut self.stroke_ema {
            Some(ema) => Point2::from(ema.push(target_px.coords)),
            None => target_px,
        };
        if !matches!(self.config.stroke, StrokePolicy::Interpolated { .. }) {
            return target;
        }
        match self.last_emitted {
            // Ease from the last emitted point toward the target while emissions are recent,
            // so strokes advance smoothly even when inference arrives in bursts.
            Some((prev, at)) if now - at < INTERP_WINDOW => {
                let blend = (((now - at) / INTERP_WINDOW) as f32).min(INTERP_MAX_BLEND);
                prev + (target - prev) * blend
            }
            _ => target,
        }
    }
}
