/// Force command for the policy-controlled paddle
///
/// Components are expressed in [-1, 1] per axis and scaled by the table's
/// force scale when applied. Out-of-range values are clamped before use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleAction {
    pub fx: f32,
    pub fy: f32,
}

impl PaddleAction {
    pub const ZERO: Self = Self { fx: 0.0, fy: 0.0 };

    pub fn new(fx: f32, fy: f32) -> Self {
        Self { fx, fy }
    }

    /// Clamp both components into [-1, 1]
    pub fn clamped(self) -> Self {
        Self {
            fx: self.fx.clamp(-1.0, 1.0),
            fy: self.fy.clamp(-1.0, 1.0),
        }
    }
}

impl From<[f32; 2]> for PaddleAction {
    fn from(a: [f32; 2]) -> Self {
        Self::new(a[0], a[1])
    }
}
