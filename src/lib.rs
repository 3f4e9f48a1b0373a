//! Hand-gesture drawing core.
//!
//! Turns the noisy landmark stream of a MediaPipe-style hand tracker into a stable drawing
//! signal: smoothed cursor coordinates plus discrete pen-down, pen-up and canvas-clear events.
//!
//! The crate owns neither inference nor rendering. The tracker feeds one [`pipeline::Frame`]
//! per inference result (or `None` landmarks when the hand is lost), and the resulting
//! [`gesture::state::DrawCommand`]s are delivered to a caller-supplied sink in order.
//!
//! # Coordinates
//!
//! Landmark coordinates are normalized to `[0, 1]` in both axes, with the origin in the top-left
//! corner of the camera image. Drawing commands carry pixel coordinates, scaled by the configured
//! canvas size.
//!
//! # Example
//!
//! ```
//! use airdraw::pipeline::{Config, Frame, GesturePipeline};
//!
//! let mut pipeline = GesturePipeline::new(Config::new(1280.0, 720.0))?;
//!
//! let mut commands = Vec::new();
//! let frame = Frame { timestamp: 0.0, landmarks: None };
//! pipeline.process(&frame, &mut |cmd| commands.push(cmd));
//! assert!(commands.is_empty());
//! # Ok::<(), anyhow::Error>(())
//! ```

use log::LevelFilter;

pub mod filter;
pub mod gesture;
pub mod hand;
pub mod pipeline;

/// Initializes logging for tests and example hosts.
///
/// Output is filtered to this crate at `debug` level. Repeated calls are ignored.
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter(Some(env!("CARGO_PKG_NAME")), LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
