use crate::coords::SurfaceSize;

use super::PIXEL_BYTES;

/// Reusable pixel staging buffer sized once for the largest possible surface.
///
/// The backing allocation never grows or shrinks after construction; a resize
/// only moves the active length. Interactive drag-resizing therefore causes
/// no heap traffic anywhere in the transfer path.
///
/// Invariant: `active ≤ bytes.len()`, upheld because resize dimensions are
/// clamped to the same display bounds the capacity was computed from.
#[derive(Debug)]
pub(crate) struct PixelPool {
    bytes: Vec<u8>,
    active: usize,
}

impl PixelPool {
    /// One trailing pixel of slack; readback paths may touch a word past the
    /// last pixel.
    pub const PAD_BYTES: usize = PIXEL_BYTES;

    /// Bytes needed to stage a full `size` frame, pad included.
    pub fn len_for(size: SurfaceSize) -> usize {
        size.pixel_count() * PIXEL_BYTES + Self::PAD_BYTES
    }

    /// Allocates `capacity` bytes up front. No dimensions are applied yet:
    /// the active length starts at zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
            active: 0,
        }
    }

    /// Sets the active length for `size` without reallocating.
    pub fn fit(&mut self, size: SurfaceSize) {
        let len = Self::len_for(size);
        debug_assert!(
            len <= self.bytes.len(),
            "pool fit {len} exceeds capacity {}",
            self.bytes.len()
        );
        self.active = len.min(self.bytes.len());
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn active_len(&self) -> usize {
        self.active
    }

    /// Staging slice for a read of `len` bytes from the buffer start.
    pub fn stage_mut(&mut self, len: usize) -> &mut [u8] {
        debug_assert!(len <= self.active, "stage {len} exceeds active {}", self.active);
        let end = len.min(self.bytes.len());
        &mut self.bytes[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_for_bounds(w: u32, h: u32) -> PixelPool {
        PixelPool::new(PixelPool::len_for(SurfaceSize::new(w, h)))
    }

    #[test]
    fn capacity_includes_the_pad() {
        let pool = pool_for_bounds(10, 10);
        assert_eq!(pool.capacity(), 10 * 10 * PIXEL_BYTES + PIXEL_BYTES);
    }

    #[test]
    fn fit_sets_active_length_for_the_dimensions() {
        let mut pool = pool_for_bounds(100, 100);
        pool.fit(SurfaceSize::new(80, 60));
        assert_eq!(pool.active_len(), 80 * 60 * PIXEL_BYTES + PIXEL_BYTES);
    }

    #[test]
    fn capacity_is_stable_across_fits() {
        let mut pool = pool_for_bounds(100, 100);
        let capacity = pool.capacity();
        for size in [(1, 1), (100, 100), (37, 91), (1, 100)] {
            pool.fit(SurfaceSize::new(size.0, size.1));
            assert_eq!(pool.capacity(), capacity);
        }
    }

    #[test]
    fn active_tracks_the_latest_fit_only() {
        let mut pool = pool_for_bounds(4000, 4000);
        pool.fit(SurfaceSize::new(50, 50));
        pool.fit(SurfaceSize::new(4000, 4000));
        pool.fit(SurfaceSize::new(50, 50));
        assert_eq!(pool.active_len(), 50 * 50 * PIXEL_BYTES + PIXEL_BYTES);
    }

    #[test]
    fn stage_returns_the_requested_prefix() {
        let mut pool = pool_for_bounds(10, 10);
        pool.fit(SurfaceSize::new(10, 10));
        assert_eq!(pool.stage_mut(40).len(), 40);
    }
}
