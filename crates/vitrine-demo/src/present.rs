use vitrine_bridge::coords::Transform2D;
use vitrine_bridge::core::PaintTarget;
use vitrine_bridge::transfer::ImageSurface;

/// Paint target over one softbuffer frame: `width × height` packed
/// `0xAARRGGBB` words, which is exactly what little-endian BGRA bytes spell,
/// so image rows copy straight across.
pub struct SoftTarget<'a> {
    words: &'a mut [u32],
    width: u32,
    height: u32,
}

impl<'a> SoftTarget<'a> {
    pub fn new(words: &'a mut [u32], width: u32, height: u32) -> Self {
        debug_assert_eq!(words.len(), width as usize * height as usize);
        Self {
            words,
            width,
            height,
        }
    }
}

impl PaintTarget for SoftTarget<'_> {
    /// softbuffer has no affine support, so each source row's center is
    /// mapped through `transform` to its destination row during the copy —
    /// the row-flip rendition of the presenter's vertical flip.
    fn draw_image(&mut self, image: &ImageSurface, transform: Transform2D) {
        let copy_w = image.width().min(self.width) as usize;
        let stride = self.width as usize;
        for y in 0..image.height() {
            let (_, fy) = transform.apply(0.0, y as f32 + 0.5);
            let fy = fy.floor();
            if fy < 0.0 || fy >= self.height as f32 {
                continue;
            }
            let start = fy as usize * stride;
            self.words[start..start + copy_w].copy_from_slice(&image.row_words(y)[..copy_w]);
        }
    }
}

#[cfg(test)]
mod tests {
    use vitrine_bridge::coords::SurfaceSize;

    use super::*;

    #[test]
    fn vertical_flip_puts_source_row_zero_at_the_bottom() {
        let mut image = ImageSurface::new(SurfaceSize::new(2, 2));
        image.write_region(2, 2, &[1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2]);

        let mut words = vec![0u32; 4];
        let mut target = SoftTarget::new(&mut words, 2, 2);
        target.draw_image(&image, Transform2D::vertical_flip(2));

        // Source row 0 (all 0x01 bytes) lands on the last target row.
        assert_eq!(words, vec![0x0202_0202, 0x0202_0202, 0x0101_0101, 0x0101_0101]);
    }

    #[test]
    fn image_wider_than_target_is_cropped() {
        let mut image = ImageSurface::new(SurfaceSize::new(4, 1));
        image.write_region(4, 1, &[9; 16]);

        let mut words = vec![0u32; 2];
        let mut target = SoftTarget::new(&mut words, 2, 1);
        target.draw_image(&image, Transform2D::vertical_flip(1));

        assert_eq!(words, vec![0x0909_0909, 0x0909_0909]);
    }

    #[test]
    fn rows_mapped_outside_the_target_are_skipped() {
        let mut image = ImageSurface::new(SurfaceSize::new(1, 4));
        image.write_region(1, 4, &[7; 16]);

        // Target is shorter than the image: only rows that land inside it
        // are written, without panicking.
        let mut words = vec![0u32; 2];
        let mut target = SoftTarget::new(&mut words, 1, 2);
        target.draw_image(&image, Transform2D::vertical_flip(4));

        assert_eq!(words, vec![0x0707_0707, 0x0707_0707]);
    }
}
