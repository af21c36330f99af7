//! Collaborator contracts at the bridge boundary.
//!
//! The renderer side implements [`FrameSource`]; the UI side implements
//! [`PaintTarget`]. The transfer core depends only on these traits, so it
//! carries no knowledge of any particular rendering backend or toolkit.

mod source;
mod target;

pub use source::FrameSource;
pub use target::PaintTarget;
