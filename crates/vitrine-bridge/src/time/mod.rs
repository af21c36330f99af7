//! Timing utilities for the two bridge cadences.
//!
//! [`ResizeGuard`] implements the post-resize debounce consulted by the
//! capture side; [`FramePacer`] paces an external render loop at a fixed
//! rate. Both are plain `Instant` state with no coupling to the transfer
//! core.

mod debounce;
mod pacer;

pub use debounce::ResizeGuard;
pub use pacer::FramePacer;
