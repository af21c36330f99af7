use super::SurfaceSize;

/// The largest surface the display environment can ask for: per-axis maxima
/// over all attached monitors' native pixel resolutions.
///
/// Injected at construction rather than computed from a process-wide query,
/// so capacity sizing is testable with small synthetic bounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayBounds {
    width: u32,
    height: u32,
}

impl DisplayBounds {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Per-axis maxima over monitor pixel sizes.
    ///
    /// An empty iterator (headless environment) yields 1×1; callers that want
    /// a usable fallback should supply one explicitly.
    pub fn from_monitors<I>(monitors: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut width = 1;
        let mut height = 1;
        for (w, h) in monitors {
            width = width.max(w);
            height = height.max(h);
        }
        Self { width, height }
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.height
    }

    /// `size` clamped into these bounds, component-wise.
    #[inline]
    pub fn clamp(self, size: SurfaceSize) -> SurfaceSize {
        SurfaceSize::new(size.width().min(self.width), size.height().min(self.height))
    }

    /// True when `size` fits inside these bounds on both axes.
    #[inline]
    pub fn contains(self, size: SurfaceSize) -> bool {
        size.width() <= self.width && size.height() <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_monitors_takes_per_axis_maxima() {
        // A tall portrait monitor next to a wide landscape one: the bound is
        // the bounding box, not the largest single monitor.
        let b = DisplayBounds::from_monitors([(2560, 1440), (1080, 1920)]);
        assert_eq!((b.width(), b.height()), (2560, 1920));
    }

    #[test]
    fn from_monitors_empty_is_min() {
        let b = DisplayBounds::from_monitors([]);
        assert_eq!((b.width(), b.height()), (1, 1));
    }

    #[test]
    fn new_clamps_zero_axes() {
        let b = DisplayBounds::new(0, 1080);
        assert_eq!((b.width(), b.height()), (1, 1080));
    }

    #[test]
    fn clamp_limits_oversized_surfaces() {
        let b = DisplayBounds::new(1920, 1080);
        assert_eq!(
            b.clamp(SurfaceSize::new(4000, 500)),
            SurfaceSize::new(1920, 500)
        );
        assert_eq!(
            b.clamp(SurfaceSize::new(100, 100)),
            SurfaceSize::new(100, 100)
        );
    }

    #[test]
    fn contains_matches_clamp() {
        let b = DisplayBounds::new(1920, 1080);
        assert!(b.contains(SurfaceSize::new(1920, 1080)));
        assert!(!b.contains(SurfaceSize::new(1921, 1080)));
    }
}
