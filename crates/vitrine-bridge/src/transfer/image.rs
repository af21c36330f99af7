use crate::coords::SurfaceSize;

use super::PIXEL_BYTES;

/// CPU-side bitmap mirroring the render target: BGRA8, row-major, stride
/// `width * 4`.
///
/// Rebuilt when dimensions change; otherwise overwritten in place by the
/// capture side and read by the presenter. Storage is a word vector so both
/// the byte view and the packed `0xAARRGGBB` word view (what little-endian
/// BGRA bytes spell) are free and correctly aligned.
#[derive(Debug)]
pub struct ImageSurface {
    size: SurfaceSize,
    pixels: Vec<u32>,
}

impl ImageSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixels: vec![0; size.pixel_count()],
        }
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height()
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.size.width() as usize * PIXEL_BYTES
    }

    /// Writes a `width × height` block of BGRA bytes into the top-left
    /// corner.
    ///
    /// `src` rows are tightly packed at `width * 4`; pixels outside the block
    /// keep their previous contents. The block is clamped to the surface, so
    /// a source/surface size mismatch can never write out of bounds.
    pub fn write_region(&mut self, width: u32, height: u32, src: &[u8]) {
        let w = width.min(self.size.width()) as usize;
        let h = height.min(self.size.height()) as usize;
        let src_stride = width as usize * PIXEL_BYTES;
        let dst_stride = self.stride();
        debug_assert!(src.len() >= src_stride * h, "source block too short");

        let dst = bytemuck::cast_slice_mut::<u32, u8>(&mut self.pixels);
        for row in 0..h {
            let s = row * src_stride;
            let d = row * dst_stride;
            dst[d..d + w * PIXEL_BYTES].copy_from_slice(&src[s..s + w * PIXEL_BYTES]);
        }
    }

    /// All pixels as BGRA bytes.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// All pixels as packed words.
    pub fn words(&self) -> &[u32] {
        &self.pixels
    }

    /// One row as BGRA bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.bytes()[start..start + stride]
    }

    /// One row as packed words.
    pub fn row_words(&self, y: u32) -> &[u32] {
        let w = self.size.width() as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }
}
