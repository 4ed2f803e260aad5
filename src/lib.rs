//! thotindex - bounding-box / table synchronization core
//!
//! Lets an operator verify and correct machine-generated transcriptions of
//! tabular register pages: each transcribed row is tied to a bounding box
//! on the page scan, and the two stay in sync through every edit.
//!
//! - [`geometry`]: image/screen transforms under zoom and pan
//! - [`document`]: the ordered rows, their boxes, and clamping rules
//! - [`calibration`]: advisory column-center guides
//! - [`command`]: reversible mutations and the undo stack
//! - [`editor`]: the interaction controller and its event dispatch
//! - [`tsv`] / [`persist`]: the wire format and correction-file workflow
//!
//! Rendering and input-device wiring are host concerns: a renderer reads
//! the editor's state, the host feeds [`editor::InputEvent`]s in.

pub mod calibration;
pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod persist;
pub mod tsv;
pub mod types;

pub use document::Document;
pub use editor::{Editor, InputEvent};
pub use error::{Result, ThotError};
pub use types::*;

/// Get the library version.
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
