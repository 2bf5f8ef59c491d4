use rapier2d::prelude::*;

use super::{
    action::PaddleAction,
    bot::Bot,
    config::TableConfig,
    state::{BodyState, Goal, TableState, Vec2},
};
use rand::Rng;

/// Result of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the ball crossed a goal line
    pub terminated: bool,
    /// Whether the step limit was reached without a goal
    pub truncated: bool,
    /// Which goal was scored, if any
    pub outcome: Option<Goal>,
}

/// The air-hockey engine: a rapier2d world plus the rules around it
///
/// Owns the ball (dynamic), the policy paddle (dynamic, driven by forces)
/// and the opponent paddle (kinematic, driven by the scripted bot or by a
/// manual target). The world is rebuilt from scratch on every reset.
pub struct HockeyEngine {
    config: TableConfig,
    bot: Bot,
    rng: rand::rngs::ThreadRng,
    manual_target: Option<Vec2>,
    steps: u32,

    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    ball: RigidBodyHandle,
    top_paddle: RigidBodyHandle,
    bottom_paddle: RigidBodyHandle,
}

impl HockeyEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: TableConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.dt / config.substeps as f32;

        let bot = Bot::new(config.bot_speed);

        let mut engine = Self {
            config,
            bot,
            rng: rand::thread_rng(),
            manual_target: None,
            steps: 0,
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            ball: RigidBodyHandle::invalid(),
            top_paddle: RigidBodyHandle::invalid(),
            bottom_paddle: RigidBodyHandle::invalid(),
        };
        engine.rebuild_world();
        engine
    }

    /// Reset the simulation for a new episode and return the initial state
    pub fn reset(&mut self) -> TableState {
        self.rebuild_world();
        self.snapshot()
    }

    /// Execute one step: apply the policy action, move the opponent, run the
    /// physics substeps and score the outcome
    pub fn step(&mut self, action: PaddleAction) -> StepResult {
        let c = self.config.clone();

        // Force on the policy paddle, clamped before scaling
        let a = action.clamped();
        {
            let body = &mut self.bodies[self.top_paddle];
            body.reset_forces(true);
            body.add_force(vector![a.fx * c.force_scale, a.fy * c.force_scale], true);
        }

        // Opponent paddle target for this step
        let target = if c.with_bot {
            let ball_x = self.bodies[self.ball].translation().x;
            let paddle_x = self.bodies[self.bottom_paddle].translation().x;
            let x = self
                .bot
                .track(paddle_x, ball_x)
                .clamp(c.paddle_radius, c.width - c.paddle_radius);
            Vec2::new(x, c.height - c.paddle_offset)
        } else {
            let current = self.bodies[self.bottom_paddle].translation();
            self.manual_target
                .unwrap_or(Vec2::new(current.x, current.y))
        };
        self.bodies[self.bottom_paddle]
            .set_next_kinematic_translation(vector![target.x, target.y]);

        // Fixed timestep split into substeps, re-clamping the paddles after
        // each one so neither can tunnel past its half
        let gravity = vector![0.0, 0.0];
        for _ in 0..c.substeps {
            self.pipeline.step(
                &gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
            self.constrain_paddles();
        }

        self.steps += 1;

        let ball_y = self.bodies[self.ball].translation().y;

        let mut reward = 0.0;
        let mut terminated = false;
        let mut outcome = None;

        if ball_y < 0.0 {
            reward = c.goal_reward;
            terminated = true;
            outcome = Some(Goal::Top);
        } else if ball_y > c.height {
            reward = -c.goal_reward;
            terminated = true;
            outcome = Some(Goal::Bottom);
        }
        // Keep the ball pinned in the opponent half
        if ball_y < c.center_y() {
            reward += c.shaping_reward;
        }

        let truncated = !terminated && self.steps >= c.max_steps;

        StepResult {
            reward,
            terminated,
            truncated,
            outcome,
        }
    }

    /// Set the manual target for the opponent paddle (play mode)
    ///
    /// The target is clamped onto the bottom half so the paddle invariant
    /// holds regardless of where the mouse is.
    pub fn set_opponent_target(&mut self, x: f32, y: f32) {
        let c = &self.config;
        let r = c.paddle_radius;
        self.manual_target = Some(Vec2::new(
            x.clamp(r, c.width - r),
            y.clamp(c.height / 2.0 + r, c.height - r),
        ));
    }

    /// Snapshot of the current simulation state
    pub fn snapshot(&self) -> TableState {
        let ball = &self.bodies[self.ball];
        let top = self.bodies[self.top_paddle].translation();
        let bottom = self.bodies[self.bottom_paddle].translation();

        TableState {
            ball: BodyState {
                position: Vec2::new(ball.translation().x, ball.translation().y),
                velocity: Vec2::new(ball.linvel().x, ball.linvel().y),
            },
            top_paddle: Vec2::new(top.x, top.y),
            bottom_paddle: Vec2::new(bottom.x, bottom.y),
            steps: self.steps,
            width: self.config.width,
            height: self.config.height,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Place the ball directly (test support)
    #[cfg(test)]
    pub(crate) fn set_ball(&mut self, position: Vec2, velocity: Vec2) {
        let body = &mut self.bodies[self.ball];
        body.set_translation(vector![position.x, position.y], true);
        body.set_linvel(vector![velocity.x, velocity.y], true);
    }

    /// Tear down and recreate the physics world
    fn rebuild_world(&mut self) {
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.islands = IslandManager::new();
        self.broad_phase = DefaultBroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ccd_solver = CCDSolver::new();
        self.steps = 0;
        self.manual_target = None;

        let c = self.config.clone();

        self.create_walls(&c);

        // Training serves the ball with a random launch; play leaves it at
        // rest for the human to strike first
        let serve = if c.with_bot {
            Vec2::new(
                self.rng.gen_range(-c.serve_speed..c.serve_speed),
                self.rng.gen_range(-c.serve_speed..c.serve_speed),
            )
        } else {
            Vec2::ZERO
        };

        self.ball = self.create_ball(&c, serve);
        self.top_paddle = self.create_policy_paddle(&c);
        self.bottom_paddle = self.create_opponent_paddle(&c);
    }

    /// Static walls with goal mouths left open at top and bottom
    fn create_walls(&mut self, c: &TableConfig) {
        let goal_left = (c.width - c.goal_width) / 2.0;
        let goal_right = (c.width + c.goal_width) / 2.0;

        let segments = [
            // Side walls
            (point![0.0, 0.0], point![0.0, c.height]),
            (point![c.width, 0.0], point![c.width, c.height]),
            // Top wall, split around the goal
            (point![0.0, 0.0], point![goal_left, 0.0]),
            (point![goal_right, 0.0], point![c.width, 0.0]),
            // Bottom wall, split around the goal
            (point![0.0, c.height], point![goal_left, c.height]),
            (point![goal_right, c.height], point![c.width, c.height]),
        ];

        for (a, b) in segments {
            self.colliders.insert(
                ColliderBuilder::segment(a, b)
                    .restitution(1.0)
                    .friction(0.0)
                    .build(),
            );
        }
    }

    fn create_ball(&mut self, c: &TableConfig, serve: Vec2) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![c.width / 2.0, c.height / 2.0])
            .linvel(vector![serve.x, serve.y])
            .linear_damping(c.linear_damping)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(
            ColliderBuilder::ball(c.ball_radius)
                .restitution(1.0)
                .friction(0.0)
                .mass(c.ball_mass)
                .build(),
            handle,
            &mut self.bodies,
        );
        handle
    }

    fn create_policy_paddle(&mut self, c: &TableConfig) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![c.width / 2.0, c.paddle_offset])
            .linear_damping(c.linear_damping)
            .lock_rotations()
            .build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(
            ColliderBuilder::ball(c.paddle_radius)
                .restitution(1.0)
                .friction(0.0)
                .mass(c.paddle_mass)
                .build(),
            handle,
            &mut self.bodies,
        );
        handle
    }

    fn create_opponent_paddle(&mut self, c: &TableConfig) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![c.width / 2.0, c.height - c.paddle_offset])
            .build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(
            ColliderBuilder::ball(c.paddle_radius)
                .restitution(1.0)
                .friction(0.0)
                .mass(c.paddle_mass)
                .build(),
            handle,
            &mut self.bodies,
        );
        handle
    }

    /// Clamp both paddles inside the table and onto their own half
    fn constrain_paddles(&mut self) {
        let r = self.config.paddle_radius;
        let w = self.config.width;
        let h = self.config.height;

        let top = &mut self.bodies[self.top_paddle];
        let p = *top.translation();
        let clamped = vector![p.x.clamp(r, w - r), p.y.clamp(r, h / 2.0 - r)];
        if clamped != p {
            top.set_translation(clamped, true);
        }

        let bottom = &mut self.bodies[self.bottom_paddle];
        let p = *bottom.translation();
        let clamped = vector![p.x.clamp(r, w - r), p.y.clamp(h / 2.0 + r, h - r)];
        if clamped != p {
            bottom.set_translation(clamped, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> TableConfig {
        // No bot, no random serve: the world starts at rest
        TableConfig::for_play()
    }

    #[test]
    fn test_reset() {
        let mut engine = HockeyEngine::new(quiet_config());
        let state = engine.reset();

        assert_eq!(state.steps, 0);
        assert_eq!(state.ball.position, Vec2::new(250.0, 350.0));
        assert_eq!(state.ball.velocity, Vec2::ZERO);
        assert_eq!(state.top_paddle, Vec2::new(250.0, 100.0));
        assert_eq!(state.bottom_paddle, Vec2::new(250.0, 600.0));
    }

    #[test]
    fn test_training_reset_serves_the_ball() {
        let mut engine = HockeyEngine::new(TableConfig::default());
        let state = engine.reset();
        let v = state.ball.velocity;

        assert!(v.x.abs() <= 200.0);
        assert!(v.y.abs() <= 200.0);
    }

    #[test]
    fn test_step_counts() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        let result = engine.step(PaddleAction::ZERO);
        assert!(!result.terminated);
        assert!(!result.truncated);
        assert_eq!(engine.steps(), 1);
    }

    #[test]
    fn test_force_moves_policy_paddle() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        let before = engine.snapshot().top_paddle;
        for _ in 0..5 {
            engine.step(PaddleAction::new(1.0, 0.0));
        }
        let after = engine.snapshot().top_paddle;

        assert!(after.x > before.x);
    }

    #[test]
    fn test_paddles_stay_on_their_half() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        let c = engine.config().clone();
        let r = c.paddle_radius;

        // Shove the policy paddle as hard as possible toward the opponent
        // half, with a deliberately out-of-range action
        for _ in 0..200 {
            engine.step(PaddleAction::new(5.0, 100.0));
            let s = engine.snapshot();
            assert!(s.top_paddle.x >= r && s.top_paddle.x <= c.width - r);
            assert!(s.top_paddle.y >= r && s.top_paddle.y <= c.height / 2.0 - r);
            assert!(s.bottom_paddle.y >= c.height / 2.0 + r);
            assert!(s.bottom_paddle.y <= c.height - r);
        }
    }

    #[test]
    fn test_top_goal_rewards_positive() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        // Ball just above the top goal mouth, moving straight out
        engine.set_ball(Vec2::new(250.0, 30.0), Vec2::new(0.0, -800.0));

        let mut result = engine.step(PaddleAction::ZERO);
        for _ in 0..20 {
            if result.terminated {
                break;
            }
            result = engine.step(PaddleAction::ZERO);
        }

        assert!(result.terminated);
        assert_eq!(result.outcome, Some(Goal::Top));
        // Terminal goal reward plus the upper-half shaping bonus
        assert!(result.reward >= 10.0);
    }

    #[test]
    fn test_bottom_goal_rewards_negative() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        engine.set_ball(Vec2::new(250.0, 670.0), Vec2::new(0.0, 800.0));

        let mut result = engine.step(PaddleAction::ZERO);
        for _ in 0..20 {
            if result.terminated {
                break;
            }
            result = engine.step(PaddleAction::ZERO);
        }

        assert!(result.terminated);
        assert_eq!(result.outcome, Some(Goal::Bottom));
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_ball_bounces_off_walls() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        // Aim at the left wall, away from either goal
        engine.set_ball(Vec2::new(100.0, 350.0), Vec2::new(-600.0, 0.0));

        let mut bounced = false;
        for _ in 0..60 {
            let result = engine.step(PaddleAction::ZERO);
            assert!(!result.terminated);
            let s = engine.snapshot();
            assert!(s.ball.position.x >= 0.0);
            if s.ball.velocity.x > 0.0 {
                bounced = true;
                break;
            }
        }
        assert!(bounced);
    }

    #[test]
    fn test_shaping_reward_in_upper_half() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        // Ball parked in the opponent half, not near a goal
        engine.set_ball(Vec2::new(250.0, 200.0), Vec2::ZERO);
        let result = engine.step(PaddleAction::ZERO);

        assert!(!result.terminated);
        assert!((result.reward - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_truncation_at_step_limit() {
        let mut config = quiet_config();
        config.max_steps = 50;
        let mut engine = HockeyEngine::new(config);
        engine.reset();

        let mut result = engine.step(PaddleAction::ZERO);
        for _ in 0..49 {
            assert!(!result.truncated);
            result = engine.step(PaddleAction::ZERO);
        }

        assert!(result.truncated);
        assert!(!result.terminated);
        assert_eq!(engine.steps(), 50);
    }

    #[test]
    fn test_bot_tracks_ball() {
        let mut engine = HockeyEngine::new(TableConfig::default());
        engine.reset();

        // Park the ball near the right wall; the bot should drift toward it
        engine.set_ball(Vec2::new(430.0, 350.0), Vec2::ZERO);

        let before = engine.snapshot().bottom_paddle.x;
        for _ in 0..10 {
            engine.step(PaddleAction::ZERO);
        }
        let after = engine.snapshot().bottom_paddle.x;

        assert!(after > before);
    }

    #[test]
    fn test_manual_target_is_clamped_to_bottom_half() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        // Try to drag the opponent paddle into the policy half
        engine.set_opponent_target(250.0, 50.0);
        for _ in 0..10 {
            engine.step(PaddleAction::ZERO);
        }

        let s = engine.snapshot();
        let c = engine.config();
        assert!(s.bottom_paddle.y >= c.height / 2.0 + c.paddle_radius);
    }

    #[test]
    fn test_manual_target_moves_paddle() {
        let mut engine = HockeyEngine::new(quiet_config());
        engine.reset();

        engine.set_opponent_target(100.0, 650.0);
        for _ in 0..5 {
            engine.step(PaddleAction::ZERO);
        }

        let s = engine.snapshot();
        assert!((s.bottom_paddle.x - 100.0).abs() < 1.0);
        assert!((s.bottom_paddle.y - 650.0).abs() < 1.0);
    }
}
