use crate::coords::SurfaceSize;

/// Offscreen render target the capture side reads completed frames from.
///
/// Row order is bottom-up: row 0 is the bottom of the rendered picture, the
/// readback convention of GL-style backends whose origin is the lower-left
/// corner. The presenter's vertical flip restores top-down display order.
/// Sources backed by top-down APIs reverse their rows to meet this contract.
pub trait FrameSource {
    /// Current pixel dimensions of the offscreen surface.
    ///
    /// May briefly disagree with the size last applied to the bridge while a
    /// resize is propagating; the capture side reads only the overlap.
    fn surface_size(&self) -> SurfaceSize;

    /// Fills `dst` with a `width × height` block of BGRA pixels from the
    /// surface origin, row-major bottom-up, tightly packed at stride
    /// `width * 4`.
    ///
    /// `dst` is exactly `width * height * 4` bytes. Readback failures are the
    /// source's to report; the block it leaves behind is shown as-is for one
    /// frame.
    fn read_pixels(&mut self, width: u32, height: u32, dst: &mut [u8]);
}
