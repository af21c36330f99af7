use crate::coords::Transform2D;
use crate::transfer::ImageSurface;

/// Visible drawing surface the presenter blits completed frames onto.
pub trait PaintTarget {
    /// Draws `image` with its origin at the target origin, mapped through
    /// `transform`.
    ///
    /// Targets without affine support may instead map source rows through
    /// `transform` during the copy; the presenter only ever passes a vertical
    /// flip.
    fn draw_image(&mut self, image: &ImageSurface, transform: Transform2D);
}
