/// A point or vector in table coordinates
///
/// The table uses screen-style coordinates: x grows rightward, y grows
/// downward, with the policy paddle's goal at y = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Position and velocity of a rigid body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Which goal mouth the ball crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Ball crossed y < 0 (behind the policy paddle)
    Top,
    /// Ball crossed y > height (behind the opponent paddle)
    Bottom,
}

/// Snapshot of the simulation, taken once per step for observations and
/// rendering
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub ball: BodyState,
    /// Policy-controlled paddle (top half)
    pub top_paddle: Vec2,
    /// Bot- or human-controlled paddle (bottom half)
    pub bottom_paddle: Vec2,
    pub steps: u32,
    pub width: f32,
    pub height: f32,
}

impl TableState {
    /// Check that a position lies inside the table
    pub fn is_in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}
