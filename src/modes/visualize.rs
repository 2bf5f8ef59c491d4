//! Visualization mode for watching trained agents
//!
//! This module implements a TUI-based visualization mode that loads a trained
//! model and displays the agent playing against the scripted bot. Users can
//! control playback speed, pause, and reset episodes.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=real-time)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use burn::module::AutodiffModule;
use burn::tensor::{Tensor, backend::Backend};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{Stderr, stderr},
    path::Path,
    time::Duration,
};
use tokio::time::{Interval, interval};

use crate::game::TableConfig;
use crate::metrics::MatchMetrics;
use crate::render::Renderer;
use crate::rl::{ActorCriticNetwork, HockeyEnvironment, load_network};

/// Visualization speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationSpeed {
    /// Slow: 8 Hz (125ms per step)
    Slow,
    /// Normal: 20 Hz (50ms per step)
    Normal,
    /// Fast: 30 Hz (33ms per step)
    Fast,
    /// Real-time: 60 Hz, the simulated timestep
    RealTime,
}

impl VisualizationSpeed {
    /// Get the tick interval for this speed
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(125),
            Self::Normal => Duration::from_millis(50),
            Self::Fast => Duration::from_millis(33),
            Self::RealTime => Duration::from_millis(16),
        }
    }
}

/// Visualization mode for watching trained agents
pub struct VisualizeMode<B: Backend> {
    /// Trained neural network (in inference mode)
    network: ActorCriticNetwork<B>,

    /// Air-hockey environment with the scripted bot as opponent
    env: HockeyEnvironment<B>,

    /// Renderer for TUI display
    renderer: Renderer,

    /// Goal tally across episodes
    metrics: MatchMetrics,

    /// Whether to quit the visualization
    should_quit: bool,

    /// Whether playback is paused
    paused: bool,

    /// Current playback speed
    speed: VisualizationSpeed,

    /// Number of episodes completed
    episode_count: usize,
}

impl<B: Backend> VisualizeMode<B> {
    /// Create a new visualization mode
    ///
    /// Loads a trained model from the specified path and initializes the
    /// environment with the scripted bot enabled.
    pub fn new(model_path: &Path, config: TableConfig, device: B::Device) -> Result<Self> {
        // Load trained network
        use burn::backend::Autodiff;
        let (network, metadata) = load_network::<Autodiff<B>>(model_path, &device)
            .with_context(|| format!("Failed to load model from {:?}", model_path))?;

        // Convert to inference mode
        let network = network.valid();

        println!("{}", "=".repeat(60));
        println!("Loaded Model Information");
        println!("{}", "=".repeat(60));
        println!("Model path: {:?}", model_path);
        println!("Episodes trained: {}", metadata.episodes_trained);
        println!("Training steps: {}", metadata.training_steps);
        println!("Version: {}", metadata.version);
        println!("{}", "=".repeat(60));
        println!();
        println!("Starting visualization...");
        println!();

        let env = HockeyEnvironment::new(config, device);

        Ok(Self {
            network,
            env,
            renderer: Renderer::new(),
            metrics: MatchMetrics::new(),
            should_quit: false,
            paused: false,
            speed: VisualizationSpeed::Normal,
            episode_count: 0,
        })
    }

    /// Run the visualization loop
    ///
    /// Sets up the terminal, runs the main visualization loop, and cleans up
    /// on exit.
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_visualization_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    /// Main visualization loop
    async fn run_visualization_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Simulation ticks based on speed
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        let mut obs = self.env.reset();
        let mut done = false;

        loop {
            tokio::select! {
                // Handle keyboard input
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                // Simulation tick
                _ = tick_timer.tick() => {
                    if !self.paused {
                        if done {
                            // Auto-restart
                            obs = self.env.reset();
                            done = false;
                            self.episode_count += 1;
                            self.metrics.on_game_start();
                        } else {
                            let (next_obs, finished) = self.step_agent(obs)?;
                            obs = next_obs;
                            done = finished;
                            if let Some(outcome) = self.env.last_outcome() {
                                self.metrics.on_game_over(outcome);
                            }
                        }
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.render_frame(frame);
                    }).context("Failed to draw frame")?;
                }

                // Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Step the agent forward one action
    ///
    /// Uses the mean of the Gaussian policy (no exploration noise) and steps
    /// the environment.
    fn step_agent(&mut self, obs: Tensor<B, 1>) -> Result<(Tensor<B, 1>, bool)> {
        let action = deterministic_action(&self.network, obs);
        let (next_obs, _reward, terminated, truncated) = self.env.step(action);
        Ok((next_obs, terminated || truncated))
    }

    /// Handle keyboard events
    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                KeyCode::Char('r') => {
                    // Manual reset
                    self.env.reset();
                    self.episode_count += 1;
                    self.metrics.on_game_start();
                }
                KeyCode::Char('1') => {
                    self.change_speed(VisualizationSpeed::Slow, tick_timer);
                }
                KeyCode::Char('2') => {
                    self.change_speed(VisualizationSpeed::Normal, tick_timer);
                }
                KeyCode::Char('3') => {
                    self.change_speed(VisualizationSpeed::Fast, tick_timer);
                }
                KeyCode::Char('4') => {
                    self.change_speed(VisualizationSpeed::RealTime, tick_timer);
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Change the visualization speed
    fn change_speed(&mut self, new_speed: VisualizationSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        tick_timer.reset_after(self.speed.tick_interval());
    }

    /// Render the current frame
    fn render_frame(&self, frame: &mut ratatui::Frame) {
        let paused = if self.paused { " (paused)" } else { "" };
        let controls = format!(
            "Episode {} | Space to pause | R to reset | 1-4 speed{}",
            self.episode_count + 1,
            paused
        );
        self.renderer.render(
            frame,
            self.env.state(),
            self.env.config(),
            &self.metrics,
            None,
            &controls,
        );
    }

    /// Cleanup terminal state
    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Mean-policy action for a single observation
///
/// Runs a forward pass and returns the actor head's mean output, which is the
/// greedy action under a Gaussian policy.
pub fn deterministic_action<B: Backend>(
    network: &ActorCriticNetwork<B>,
    obs: Tensor<B, 1>,
) -> [f32; 2] {
    let obs_batch = obs.unsqueeze_dim(0); // [1, 8]
    let (mean, _value) = network.forward(obs_batch);

    let data = mean.into_data();
    let vals = data.as_slice::<f32>().expect("mean tensor data");
    [vals[0], vals[1]]
}
