use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::coords::DisplayBounds;
use crate::time::ResizeGuard;

use super::PIXEL_BYTES;
use super::capture::FrameCapture;
use super::pool::PixelPool;
use super::presenter::FramePresenter;
use super::slot::FrameSlot;

/// Construction parameters for a frame bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Largest surface the bridge must ever carry; sizes the staging pool
    /// once, for the component's lifetime. Derive from the attached monitors
    /// via [`DisplayBounds::from_monitors`].
    pub bounds: DisplayBounds,

    /// How long after a resize the capture side keeps skipping reads. A
    /// just-resized target can report a stale stride for a frame; the window
    /// is tunable per backend, with an inclusive boundary.
    pub resize_debounce: Duration,
}

impl BridgeConfig {
    pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(20);

    pub fn new(bounds: DisplayBounds) -> Self {
        Self {
            bounds,
            resize_debounce: Self::DEFAULT_RESIZE_DEBOUNCE,
        }
    }

    pub fn with_resize_debounce(mut self, window: Duration) -> Self {
        self.resize_debounce = window;
        self
    }
}

/// Entry point: builds the two connected halves of a bridge.
pub struct FrameBridge;

impl FrameBridge {
    /// Validates `config` and creates the capture/presenter pair.
    ///
    /// [`FrameCapture`] moves to the render context, [`FramePresenter`] stays
    /// with the UI; they share only the internal handoff slot. Bounds that
    /// cannot be staged in addressable memory are a configuration error here,
    /// never a frame-time failure.
    pub fn split(config: BridgeConfig) -> Result<(FrameCapture, FramePresenter)> {
        let capacity = staging_capacity(config.bounds)?;
        log::debug!(
            "frame bridge for bounds {}x{}: {capacity} byte pool, {:?} resize debounce",
            config.bounds.width(),
            config.bounds.height(),
            config.resize_debounce,
        );

        let slot = Arc::new(FrameSlot::new());
        let capture = FrameCapture::new(
            Arc::clone(&slot),
            PixelPool::new(capacity),
            config.bounds,
            ResizeGuard::new(config.resize_debounce),
        );
        let presenter = FramePresenter::new(slot);
        Ok((capture, presenter))
    }
}

/// Pool capacity for `bounds`, rejecting sizes that overflow addressable
/// memory.
fn staging_capacity(bounds: DisplayBounds) -> Result<usize> {
    let bytes = (bounds.width() as u64)
        .checked_mul(bounds.height() as u64)
        .and_then(|pixels| pixels.checked_mul(PIXEL_BYTES as u64))
        .and_then(|bytes| bytes.checked_add(PixelPool::PAD_BYTES as u64))
        .and_then(|bytes| usize::try_from(bytes).ok())
        .filter(|&bytes| bytes <= isize::MAX as usize);

    bytes.ok_or_else(|| {
        anyhow::anyhow!(
            "display bounds {}x{} exceed addressable staging capacity",
            bounds.width(),
            bounds.height(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_debounce_is_twenty_millis() {
        let config = BridgeConfig::new(DisplayBounds::new(1920, 1080));
        assert_eq!(config.resize_debounce, Duration::from_millis(20));
    }

    #[test]
    fn split_reports_pool_sized_for_the_bounds() {
        let config = BridgeConfig::new(DisplayBounds::new(1920, 1080));
        let (capture, _presenter) = FrameBridge::split(config).expect("valid bounds");
        assert_eq!(
            capture.pool_capacity(),
            1920 * 1080 * PIXEL_BYTES + PIXEL_BYTES
        );
        assert_eq!(capture.pool_active_len(), 0);
    }

    #[test]
    fn split_rejects_unaddressable_bounds() {
        let config = BridgeConfig::new(DisplayBounds::new(u32::MAX, u32::MAX));
        assert!(FrameBridge::split(config).is_err());
    }
}
