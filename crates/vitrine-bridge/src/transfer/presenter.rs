use std::sync::Arc;

use crate::coords::Transform2D;
use crate::core::PaintTarget;

use super::slot::FrameSlot;

/// What one presenter pulse did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PumpOutcome {
    /// A newly published frame was drawn onto the target.
    Drawn,
    /// No unconsumed frame; nothing was drawn.
    Idle,
}

/// UI-pulse half of the bridge.
///
/// Invoke [`pump`](Self::pump) once per repaint pulse while the owning view
/// is active. Every pulse releases the capture side for its next frame,
/// whether or not anything was drawn — that release is what paces the render
/// loop to the UI's consumption.
pub struct FramePresenter {
    slot: Arc<FrameSlot>,
}

impl FramePresenter {
    pub(crate) fn new(slot: Arc<FrameSlot>) -> Self {
        Self { slot }
    }

    /// One repaint pulse: draws the latest published frame, if any.
    ///
    /// The image is drawn at the target origin under a vertical flip, since
    /// captured rows are ordered bottom-up (see
    /// [`FrameSource`](crate::core::FrameSource)). The release happens after
    /// the draw, so the capture side can never write the image while the
    /// target is reading it.
    pub fn pump(&mut self, target: &mut dyn PaintTarget) -> PumpOutcome {
        let Some(lease) = self.slot.take_ready() else {
            self.slot.release();
            return PumpOutcome::Idle;
        };

        let drawn = match lease.surface() {
            Some(image) => {
                target.draw_image(image, Transform2D::vertical_flip(image.height()));
                true
            }
            // A ready flag without a surface never happens (publish follows
            // the write); skip gracefully if it somehow does.
            None => false,
        };
        lease.consume();

        if drawn { PumpOutcome::Drawn } else { PumpOutcome::Idle }
    }
}
