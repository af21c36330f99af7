//! UI-facing view node.
//!
//! [`CanvasView`] is the piece an embedding toolkit holds: it owns the
//! presenter half of a bridge, follows its allocated layout box, and gates
//! repaint pulses on the toolkit's attachment/visibility/enablement state.

mod canvas;

pub use canvas::{CanvasView, SizeListener};
