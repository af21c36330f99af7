//! Vitrine bridge crate.
//!
//! Carries frames produced by an offscreen renderer into a retained-mode UI
//! surface: the render loop writes BGRA pixels into a pooled buffer, the UI's
//! repaint pulse blits the latest completed image, and a two-flag handshake
//! keeps exactly one frame in flight without locks.

pub mod transfer;
pub mod view;
pub mod core;
pub mod time;

pub mod logging;
pub mod coords;
