use serde::{Deserialize, Serialize};

/// Configuration for the air-hockey table and simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table width in world units
    pub width: f32,
    /// Table height in world units
    pub height: f32,
    /// Radius of the ball
    pub ball_radius: f32,
    /// Radius of both paddles
    pub paddle_radius: f32,
    /// Width of each goal mouth, centered on the table
    pub goal_width: f32,
    /// Distance of each paddle's start position from its own goal line
    pub paddle_offset: f32,

    /// Mass of the ball
    pub ball_mass: f32,
    /// Mass of the policy paddle (heavy, so the ball cannot knock it away)
    pub paddle_mass: f32,
    /// Multiplier turning a [-1, 1] action component into a force
    pub force_scale: f32,
    /// Linear damping on the moving bodies (stands in for air drag)
    pub linear_damping: f32,
    /// Simulated time per environment step, in seconds
    pub dt: f32,
    /// Physics substeps per environment step
    pub substeps: usize,

    /// Maximum serve speed per axis when the ball is launched randomly
    pub serve_speed: f32,
    /// Per-step horizontal speed cap for the scripted opponent
    pub bot_speed: f32,

    // Rewards (for RL)
    /// Terminal reward magnitude for a goal (+/- depending on which goal)
    pub goal_reward: f32,
    /// Shaping reward per step while the ball is in the opponent half
    pub shaping_reward: f32,
    /// Step count at which an episode truncates
    pub max_steps: u32,

    /// Training mode: scripted opponent on the bottom paddle and a random
    /// serve. When false the bottom paddle follows a manual target and the
    /// ball starts at rest.
    pub with_bot: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 700.0,
            ball_radius: 15.0,
            paddle_radius: 25.0,
            goal_width: 180.0,
            paddle_offset: 100.0,
            ball_mass: 1.0,
            paddle_mass: 20.0,
            force_scale: 50_000.0,
            linear_damping: 0.6,
            dt: 1.0 / 60.0,
            substeps: 10,
            serve_speed: 200.0,
            bot_speed: 8.0,
            goal_reward: 10.0,
            shaping_reward: 0.001,
            max_steps: 2000,
            with_bot: true,
        }
    }
}

impl TableConfig {
    /// Training configuration: scripted opponent, random serve
    pub fn new() -> Self {
        Self::default()
    }

    /// Play configuration: manual opponent, ball served at rest
    pub fn for_play() -> Self {
        Self {
            with_bot: false,
            ..Default::default()
        }
    }

    /// y coordinate of the center line
    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }
}
