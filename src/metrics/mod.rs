pub mod game_metrics;
pub mod training_stats;

pub use game_metrics::MatchMetrics;
pub use training_stats::TrainingStats;
