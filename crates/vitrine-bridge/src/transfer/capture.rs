use std::sync::Arc;
use std::time::Instant;

use crate::coords::{DisplayBounds, SurfaceSize};
use crate::core::FrameSource;
use crate::time::ResizeGuard;

use super::PIXEL_BYTES;
use super::image::ImageSurface;
use super::pool::PixelPool;
use super::slot::FrameSlot;

/// What one capture cycle did.
///
/// Skips are normal operation, not errors; callers that care (tests,
/// instrumentation) can count them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// A frame was read and published for the presenter.
    Published,
    /// No dimensions have been applied yet; there is nothing to capture
    /// into.
    NoSurface,
    /// The previous frame has not been consumed by the presenter.
    InFlight,
    /// Inside the post-resize quiet window.
    Resizing,
}

/// Render-loop half of the bridge.
///
/// Owned by the render context: invoke [`frame`](Self::frame) once per
/// completed render and [`surface_resized`](Self::surface_resized) when the
/// render target changes size (both from the same context). Nothing here
/// blocks; a busy bridge skips the cycle and reports why.
pub struct FrameCapture {
    slot: Arc<FrameSlot>,
    pool: PixelPool,
    bounds: DisplayBounds,
    resize_guard: ResizeGuard,
    dims: Option<SurfaceSize>,
    rebuild: bool,
}

impl FrameCapture {
    pub(crate) fn new(
        slot: Arc<FrameSlot>,
        pool: PixelPool,
        bounds: DisplayBounds,
        resize_guard: ResizeGuard,
    ) -> Self {
        Self {
            slot,
            pool,
            bounds,
            resize_guard,
            dims: None,
            rebuild: false,
        }
    }

    /// Records a render-target size change.
    ///
    /// Width/height are clamped to ≥1 (toolkits deliver zero and negative
    /// sizes while a surface is collapsed or mid-drag) and to the display
    /// bounds the pool was sized for. The pool extent and the debounce stamp
    /// update immediately; the image surface itself is rebuilt on the next
    /// successful capture cycle, inside the exclusive slot window.
    pub fn surface_resized(&mut self, width: i32, height: i32) {
        let requested = SurfaceSize::from_signed(width, height);
        let size = self.bounds.clamp(requested);
        if size != requested {
            log::warn!(
                "surface resize {}x{} exceeds display bounds {}x{}; clamped",
                requested.width(),
                requested.height(),
                self.bounds.width(),
                self.bounds.height(),
            );
        }

        self.resize_guard.mark(Instant::now());
        self.pool.fit(size);
        if self.dims != Some(size) {
            self.dims = Some(size);
            self.rebuild = true;
        }

        log::debug!(
            "surface resized to {}x{} ({} active bytes of {})",
            size.width(),
            size.height(),
            self.pool.active_len(),
            self.pool.capacity(),
        );
    }

    /// Captures one frame from `source` if the bridge is ready for one.
    ///
    /// Reads the overlap of the renderer-reported surface and the applied
    /// dimensions (they can briefly disagree around a resize), stages it in
    /// the pool, writes it into the image surface, and publishes.
    pub fn frame(&mut self, source: &mut dyn FrameSource) -> FrameOutcome {
        let Some(dims) = self.dims else {
            log::trace!("capture skipped: no dimensions applied yet");
            return FrameOutcome::NoSurface;
        };
        if !self.slot.producer_released() {
            log::trace!("capture skipped: frame in flight");
            return FrameOutcome::InFlight;
        }
        if !self.resize_guard.settled(Instant::now()) {
            log::trace!("capture skipped: inside resize quiet window");
            return FrameOutcome::Resizing;
        }
        let Some(mut lease) = self.slot.claim() else {
            // The presenter can only have made the slot more available since
            // the check above; treat a lost claim as one more busy cycle.
            return FrameOutcome::InFlight;
        };

        let surface = lease.surface_mut();
        if self.rebuild || surface.as_ref().map(ImageSurface::size) != Some(dims) {
            *surface = Some(ImageSurface::new(dims));
            self.rebuild = false;
        }
        let Some(image) = surface.as_mut() else {
            // Unreachable after the rebuild above; the dropped lease is
            // re-released by the next pulse.
            return FrameOutcome::NoSurface;
        };

        let read = source.surface_size().min_axes(image.size());
        let len = read.pixel_count() * PIXEL_BYTES;
        let staging = self.pool.stage_mut(len);
        source.read_pixels(read.width(), read.height(), staging);
        image.write_region(read.width(), read.height(), staging);

        lease.publish();
        log::trace!("published {}x{} frame", read.width(), read.height());
        FrameOutcome::Published
    }

    /// Dimensions last applied via [`surface_resized`](Self::surface_resized).
    pub fn dimensions(&self) -> Option<SurfaceSize> {
        self.dims
    }

    /// Fixed capacity of the staging pool in bytes.
    pub fn pool_capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Active staging extent for the current dimensions in bytes.
    pub fn pool_active_len(&self) -> usize {
        self.pool.active_len()
    }
}
