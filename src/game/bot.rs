/// Scripted opponent used as a training sparring partner
///
/// Tracks the ball's horizontal position with a per-step speed cap. The
/// vertical position is pinned by the engine; no learning, no state machine.
#[derive(Debug, Clone)]
pub struct Bot {
    speed_limit: f32,
}

impl Bot {
    pub fn new(speed_limit: f32) -> Self {
        Self { speed_limit }
    }

    /// Next x position for the opponent paddle given the ball's x
    ///
    /// Moves toward the ball by at most `speed_limit` units, snapping onto
    /// it when closer than that.
    pub fn track(&self, paddle_x: f32, ball_x: f32) -> f32 {
        let diff = ball_x - paddle_x;
        if diff.abs() < self.speed_limit {
            ball_x
        } else {
            paddle_x + self.speed_limit * diff.signum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snaps_when_close() {
        let bot = Bot::new(8.0);
        assert_eq!(bot.track(100.0, 104.0), 104.0);
        assert_eq!(bot.track(100.0, 97.0), 97.0);
    }

    #[test]
    fn test_speed_cap() {
        let bot = Bot::new(8.0);
        assert_eq!(bot.track(100.0, 400.0), 108.0);
        assert_eq!(bot.track(400.0, 100.0), 392.0);
    }

    #[test]
    fn test_stationary_when_aligned() {
        let bot = Bot::new(8.0);
        assert_eq!(bot.track(250.0, 250.0), 250.0);
    }

    #[test]
    fn test_converges_onto_ball() {
        let bot = Bot::new(8.0);
        let mut x = 50.0;
        for _ in 0..100 {
            x = bot.track(x, 450.0);
        }
        assert_eq!(x, 450.0);
    }
}
