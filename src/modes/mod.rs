pub mod play;
pub mod train;
pub mod visualize;

pub use play::PlayMode;
pub use train::{TrainConfig, TrainMode};
pub use visualize::{VisualizationSpeed, VisualizeMode};
