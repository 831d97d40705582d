//! The painter (§4.7): walks a layout tree and emits replayable draw
//! commands to a `Canvas` sink (§6), honoring an optional clip rect and the
//! `html`/`body` background cascade.

mod command;
mod paint;

pub use command::{BorderSide, Borders, Canvas, CommandRecorder, Corners, DrawCommand, FontStyle, Radius, replay};
pub use paint::{ImagePixelLookup, NoImages, paint};
