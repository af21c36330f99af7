use crate::coords::SurfaceSize;
use crate::core::PaintTarget;
use crate::transfer::{FramePresenter, PumpOutcome};

/// Size-change callback registered by the embedder.
///
/// Receives the snapped layout size so the renderer can be told to resize its
/// offscreen target; the renderer's own resize notification then reaches the
/// capture side on the render context.
pub type SizeListener = Box<dyn FnMut(SurfaceSize)>;

/// UI-tree node that displays bridged frames.
///
/// The embedding toolkit drives it with:
/// - [`layout`](Self::layout) on every layout pass with the allocated box,
/// - [`set_attached`](Self::set_attached) /
///   [`set_visible`](Self::set_visible) / [`set_enabled`](Self::set_enabled)
///   from its scene and visibility model,
/// - [`on_pulse`](Self::on_pulse) on every repaint pulse.
///
/// Pulses only do work while [`pulse_active`](Self::pulse_active) — attached,
/// visible, and enabled all at once. An inactive view neither draws nor
/// releases the capture side, which then idles after one pending frame.
pub struct CanvasView {
    presenter: FramePresenter,
    size: Option<SurfaceSize>,
    size_listener: Option<SizeListener>,
    attached: bool,
    visible: bool,
    enabled: bool,
    active: bool,
}

impl CanvasView {
    /// Wraps the presenter half of a bridge.
    ///
    /// A fresh view is visible and enabled but not attached, matching a node
    /// constructed outside any UI tree.
    pub fn new(presenter: FramePresenter) -> Self {
        Self {
            presenter,
            size: None,
            size_listener: None,
            attached: false,
            visible: true,
            enabled: true,
            active: false,
        }
    }

    /// Registers the callback invoked when the snapped layout size changes.
    pub fn set_size_listener(&mut self, listener: impl FnMut(SurfaceSize) + 'static) {
        self.size_listener = Some(Box::new(listener));
    }

    /// Applies the layout box allocated by the toolkit.
    ///
    /// The box is snapped to whole pixels and clamped to ≥1×1; the listener
    /// fires only when the snapped size actually changed, so a layout pass
    /// that moves the node without resizing it stays quiet.
    pub fn layout(&mut self, width: f64, height: f64) {
        let snapped = SurfaceSize::from_signed(width.round() as i32, height.round() as i32);
        if self.size == Some(snapped) {
            return;
        }
        self.size = Some(snapped);

        log::debug!("canvas laid out at {}x{}", snapped.width(), snapped.height());
        if let Some(listener) = self.size_listener.as_mut() {
            listener(snapped);
        }
    }

    /// Snapped size of the last layout pass.
    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
        self.update_activity();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.update_activity();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.update_activity();
    }

    /// True while the view should receive repaint pulses.
    pub fn pulse_active(&self) -> bool {
        self.active
    }

    /// One repaint pulse; a no-op while inactive.
    pub fn on_pulse(&mut self, target: &mut dyn PaintTarget) -> PumpOutcome {
        if !self.active {
            return PumpOutcome::Idle;
        }
        self.presenter.pump(target)
    }

    fn update_activity(&mut self) {
        let active = self.attached && self.visible && self.enabled;
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            log::debug!("canvas pulse started");
        } else {
            log::debug!("canvas pulse stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::coords::{DisplayBounds, Transform2D};
    use crate::transfer::{BridgeConfig, FrameBridge, FrameCapture, FrameOutcome, ImageSurface};

    struct NullTarget {
        draws: u32,
    }

    impl PaintTarget for NullTarget {
        fn draw_image(&mut self, _image: &ImageSurface, _transform: Transform2D) {
            self.draws += 1;
        }
    }

    struct OnePixelSource;

    impl crate::core::FrameSource for OnePixelSource {
        fn surface_size(&self) -> SurfaceSize {
            SurfaceSize::MIN
        }

        fn read_pixels(&mut self, _width: u32, _height: u32, dst: &mut [u8]) {
            dst.fill(0xFF);
        }
    }

    fn view_with_capture() -> (CanvasView, FrameCapture) {
        let config = BridgeConfig::new(DisplayBounds::new(64, 64))
            .with_resize_debounce(Duration::ZERO);
        let (capture, presenter) = FrameBridge::split(config).expect("valid test bounds");
        (CanvasView::new(presenter), capture)
    }

    // ── activity gating ───────────────────────────────────────────────────

    #[test]
    fn fresh_view_is_inactive_until_attached() {
        let (mut view, _capture) = view_with_capture();
        assert!(!view.pulse_active());
        view.set_attached(true);
        assert!(view.pulse_active());
    }

    #[test]
    fn any_cleared_condition_stops_the_pulse() {
        let (mut view, _capture) = view_with_capture();
        view.set_attached(true);

        view.set_visible(false);
        assert!(!view.pulse_active());
        view.set_visible(true);
        assert!(view.pulse_active());

        view.set_enabled(false);
        assert!(!view.pulse_active());
        view.set_enabled(true);
        assert!(view.pulse_active());

        view.set_attached(false);
        assert!(!view.pulse_active());
    }

    #[test]
    fn inactive_pulse_neither_draws_nor_releases() {
        let (mut view, mut capture) = view_with_capture();
        let mut source = OnePixelSource;
        let mut target = NullTarget { draws: 0 };

        capture.surface_resized(1, 1);
        assert_eq!(capture.frame(&mut source), FrameOutcome::Published);

        // Detached view: the pulse is a true no-op, so the capture side
        // stays blocked exactly like a stopped repaint timer would leave it.
        assert_eq!(view.on_pulse(&mut target), PumpOutcome::Idle);
        assert_eq!(target.draws, 0);
        assert_eq!(capture.frame(&mut source), FrameOutcome::InFlight);

        view.set_attached(true);
        assert_eq!(view.on_pulse(&mut target), PumpOutcome::Drawn);
        assert_eq!(target.draws, 1);
        assert_eq!(capture.frame(&mut source), FrameOutcome::Published);
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn layout_snaps_and_notifies_on_change_only() {
        let (mut view, _capture) = view_with_capture();
        let seen: Rc<RefCell<Vec<SurfaceSize>>> = Rc::default();
        let sink = Rc::clone(&seen);
        view.set_size_listener(move |size| sink.borrow_mut().push(size));

        view.layout(800.4, 599.6);
        view.layout(800.4, 599.6);
        view.layout(800.0, 600.0);

        assert_eq!(*seen.borrow(), vec![SurfaceSize::new(800, 600)]);
    }

    #[test]
    fn layout_clamps_a_collapsed_box() {
        let (mut view, _capture) = view_with_capture();
        view.layout(0.0, -5.0);
        assert_eq!(view.size(), Some(SurfaceSize::MIN));
    }
}
