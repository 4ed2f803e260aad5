//! Data types for the transcription editor core.

mod row;
mod view_state;

pub use row::*;
pub use view_state::*;
