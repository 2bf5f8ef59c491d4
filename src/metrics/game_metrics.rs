use crate::game::Goal;
use std::time::{Duration, Instant};

pub struct MatchMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub player_goals: u32,
    pub policy_goals: u32,
    pub games_played: u32,
}

impl MatchMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            player_goals: 0,
            policy_goals: 0,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Record a finished game. Goal::Top means the bottom player scored.
    pub fn on_game_over(&mut self, outcome: Goal) {
        self.games_played += 1;
        match outcome {
            Goal::Top => self.player_goals += 1,
            Goal::Bottom => self.policy_goals += 1,
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    pub fn format_score(&self) -> String {
        format!("{} - {}", self.player_goals, self.policy_goals)
    }
}

impl Default for MatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = MatchMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_score_tracking() {
        let mut metrics = MatchMetrics::new();

        metrics.on_game_over(Goal::Top);
        assert_eq!(metrics.player_goals, 1);
        assert_eq!(metrics.policy_goals, 0);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(Goal::Bottom);
        metrics.on_game_over(Goal::Bottom);
        assert_eq!(metrics.player_goals, 1);
        assert_eq!(metrics.policy_goals, 2);
        assert_eq!(metrics.games_played, 3);

        assert_eq!(metrics.format_score(), "1 - 2");
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = MatchMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
