//! Frame transfer core.
//!
//! Owns the pooled pixel buffer, the CPU image surface, and the lock-free
//! handshake between the two external cadences:
//!
//! - the render loop drives [`FrameCapture`]: read the finished frame's BGRA
//!   pixels into the pool, write them into the image surface, publish;
//! - the UI repaint pulse drives [`FramePresenter`]: blit the latest
//!   published image onto the visible surface under a vertical flip, release
//!   the capture side for the next frame.
//!
//! The two halves communicate only through [`slot::FrameSlot`]; no operation
//! blocks, and a cadence that finds the bridge busy simply skips its cycle.

mod capture;
mod config;
mod image;
mod pool;
mod presenter;
mod slot;

pub use capture::{FrameCapture, FrameOutcome};
pub use config::{BridgeConfig, FrameBridge};
pub use image::ImageSurface;
pub use presenter::{FramePresenter, PumpOutcome};

/// Bytes per pixel of the transfer format (BGRA, 8 bits per channel).
pub const PIXEL_BYTES: usize = 4;
