//! Pen gesture interpretation.
//!
//! Converts per-frame classifier output and filtered coordinates into an ordered stream of
//! drawing commands. All session state is owned here; independent sessions are just independent
//! [`GestureStateMachine`] values.

use nalgebra::Point2;

/// A drawing command, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Erase the whole canvas.
    ClearCanvas,
    /// Start a stroke at the given point.
    PenDown(Point2<f32>),
    /// Continue the active stroke to the given point.
    MoveTo(Point2<f32>),
    /// End the active stroke.
    PenUp,
}

/// Receives the command stream produced by a [`GestureStateMachine`].
///
/// Implemented for closures, so a renderer (or a test collecting into a `Vec`) plugs in
/// directly.
pub trait DrawSink {
    fn handle(&mut self, command: DrawCommand);
}

impl<F: FnMut(DrawCommand)> DrawSink for F {
    fn handle(&mut self, command: DrawCommand) {
        self(command);
    }
}

/// Classifier view of one frame, consumed by [`GestureStateMachine::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    /// No hand was detected this frame.
    HandLost,
    /// The hand forms a fist. No coordinates; drawing is suppressed while clearing.
    Fist,
    /// The hand is open: the pinch predicate plus the smoothed draw point in pixels.
    Open { pinch: bool, draw_point: Point2<f32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No hand tracked.
    Idle,
    /// Hand present, drawing allowed.
    Tracking,
    /// Post-clear window (or an ongoing fist); drawing suppressed.
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pen {
    Up,
    Down,
}

/// Session state, exclusively owned by one state machine.
///
/// Invariants: the pen is down only while `last_point` is set, and a frame that clears the
/// canvas never also draws.
#[derive(Debug, Clone)]
struct GestureSession {
    state: State,
    pen: Pen,
    /// Set once a fist has cleared the canvas; released when the fist opens. One clear per
    /// continuous fist.
    cleared_this_fist: bool,
    last_clear_time: f64,
    last_point: Option<Point2<f32>>,
}

/// Derives drawing commands from classified frames.
#[derive(Debug, Clone)]
pub struct GestureStateMachine {
    cooldown_duration: f64,
    session: GestureSession,
}

impl GestureStateMachine {
    /// Creates a machine in the idle state.
    ///
    /// `cooldown_duration` is the time in seconds after a canvas clear during which drawing
    /// stays suppressed.
    pub fn new(cooldown_duration: f64) -> Self {
        Self {
            cooldown_duration,
            session: GestureSession {
                state: State::Idle,
                pen: Pen::Up,
                cleared_this_fist: false,
                last_clear_time: f64::NEG_INFINITY,
                last_point: None,
            },
        }
    }

    /// Whether a stroke is currently active.
    pub fn is_pen_down(&self) -> bool {
        self.session.pen == Pen::Down
    }

    /// The most recently emitted stroke point, while the pen is down.
    pub fn last_point(&self) -> Option<Point2<f32>> {
        self.session.last_point
    }

    /// Advances the machine by one frame, delivering this frame's commands to `sink` in order.
    ///
    /// `now` is the frame timestamp in seconds, on the same clock as previous frames.
    pub fn step(&mut self, now: f64, input: GestureInput, sink: &mut impl DrawSink) {
        let session = &mut self.session;
        match input {
            GestureInput::HandLost => {
                if session.pen == Pen::Down {
                    sink.handle(DrawCommand::PenUp);
                }
                if session.state != State::Idle {
                    log::debug!("hand lost at t={now:.3}, going idle");
                }
                session.pen = Pen::Up;
                session.last_point = None;
                session.cleared_this_fist = false;
                session.state = State::Idle;
            }
            GestureInput::Fist => {
                if !session.cleared_this_fist {
                    if session.pen == Pen::Down {
                        // A clearing frame never draws; end the stroke before wiping it.
                        sink.handle(DrawCommand::PenUp);
                        session.pen = Pen::Up;
                        session.last_point = None;
                    }
                    log::debug!("fist at t={now:.3}, clearing canvas");
                    sink.handle(DrawCommand::ClearCanvas);
                    session.last_clear_time = now;
                    session.cleared_this_fist = true;
                }
                // Held fists keep drawing suppressed but clear only once.
                session.state = State::Cooldown;
            }
            GestureInput::Open { pinch, draw_point } => {
                // The fist opened; the next fist may clear again.
                session.cleared_this_fist = false;

                if now - session.last_clear_time < self.cooldown_duration {
                    session.state = State::Cooldown;
                    return;
                }
                session.state = State::Tracking;

                match (pinch, session.pen) {
                    (true, Pen::Up) => {
                        log::trace!("pen down at {draw_point:?}");
                        sink.handle(DrawCommand::PenDown(draw_point));
                        sink.handle(DrawCommand::MoveTo(draw_point));
                        session.pen = Pen::Down;
                        session.last_point = Some(draw_point);
                    }
                    (true, Pen::Down) => {
                        sink.handle(DrawCommand::MoveTo(draw_point));
                        session.last_point = Some(draw_point);
                    }
                    (false, Pen::Down) => {
                        log::trace!("pen up");
                        sink.handle(DrawCommand::PenUp);
                        session.pen = Pen::Up;
                        session.last_point = None;
                    }
                    (false, Pen::Up) => {}
                }
            }
        }
    }
}
