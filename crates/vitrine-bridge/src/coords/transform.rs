/// Row-major 2×3 affine transform applied when compositing onto a target.
///
/// Maps source coordinates as:
/// - `x' = sx * x + kx * y + tx`
/// - `y' = ky * x + sy * y + ty`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2D {
    pub sx: f32,
    pub kx: f32,
    pub tx: f32,
    pub ky: f32,
    pub sy: f32,
    pub ty: f32,
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        sx: 1.0,
        kx: 0.0,
        tx: 0.0,
        ky: 0.0,
        sy: 1.0,
        ty: 0.0,
    };

    /// The compositing flip: scale Y by −1 and translate by `height`, so an
    /// image with bottom-up row order lands top-down on the target.
    #[inline]
    pub fn vertical_flip(height: u32) -> Self {
        Self {
            sx: 1.0,
            kx: 0.0,
            tx: 0.0,
            ky: 0.0,
            sy: -1.0,
            ty: height.max(1) as f32,
        }
    }

    #[inline]
    pub fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (
            self.sx * x + self.kx * y + self.tx,
            self.ky * x + self.sy * y + self.ty,
        )
    }
}
