use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use ml_hockey::game::TableConfig;
use ml_hockey::modes::{PlayMode, TrainConfig, TrainMode, VisualizeMode};
use ml_hockey::rl::{InferenceBackend, TrainingBackend, default_device};

#[derive(Parser)]
#[command(name = "ml_hockey")]
#[command(version, about = "Air hockey with PPO training and a playable policy")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Model file path (written by train, read by play/visualize)
    #[arg(long, default_value = "models/air_hockey_ppo.bin")]
    model: PathBuf,

    /// Number of training episodes
    #[arg(long, default_value = "10000")]
    episodes: usize,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Train a PPO agent against the scripted bot
    Train,
    /// Play against a trained policy with the mouse
    Play,
    /// Watch a trained policy play the scripted bot
    Visualize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let device = default_device();

    match cli.mode {
        Mode::Train => {
            let config = TrainConfig::new(cli.episodes, cli.model);
            let mut train_mode = TrainMode::<TrainingBackend>::new(config, device);
            train_mode.run()?;
        }
        Mode::Play => match PlayMode::<InferenceBackend>::new(&cli.model, device) {
            Ok(mut play_mode) => play_mode.run().await?,
            Err(err) => {
                println!("Could not load a model from {:?}: {:#}", cli.model, err);
                println!("Train one first with: ml_hockey --mode train");
            }
        },
        Mode::Visualize => {
            let config = TableConfig::default();
            let mut visualize_mode =
                VisualizeMode::<InferenceBackend>::new(&cli.model, config, device)?;
            visualize_mode.run().await?;
        }
    }

    Ok(())
}
