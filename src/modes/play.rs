//! Human-vs-policy play mode
//!
//! Loads a trained model and lets a human play against it. The human controls
//! the bottom paddle with the mouse; the policy drives the top paddle. The
//! policy sees a mirrored observation so the table looks the same to it as it
//! did during training.
//!
//! # Controls
//!
//! - Mouse: Move your paddle (bottom half of the table)
//! - P/Space: Pause
//! - R: Restart the match
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use burn::module::AutodiffModule;
use burn::tensor::backend::Backend;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseEvent,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    io::{Stderr, stderr},
    path::Path,
    time::{Duration, Instant},
};
use tokio::time::interval;

use crate::game::{Goal, HockeyEngine, PaddleAction, TableConfig};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::MatchMetrics;
use crate::render::Renderer;
use crate::rl::{ActorCriticNetwork, create_mirrored_observation, load_network};

use super::visualize::deterministic_action;

/// How long the WIN/LOSE banner stays up before the next serve
const BANNER_DURATION: Duration = Duration::from_secs(2);

/// Play mode: human against a trained policy
pub struct PlayMode<B: Backend> {
    /// Trained neural network (in inference mode)
    network: ActorCriticNetwork<B>,

    /// Physics engine with the scripted bot disabled
    engine: HockeyEngine,

    /// Renderer for TUI display
    renderer: Renderer,

    /// Input handler for keyboard and mouse
    input_handler: InputHandler,

    /// Score and match time tracking
    metrics: MatchMetrics,

    /// Backend device for observation tensors
    device: B::Device,

    /// Whether to quit
    should_quit: bool,

    /// Whether the match is paused
    paused: bool,

    /// Active goal banner and when it went up
    banner: Option<(String, Instant)>,
}

impl<B: Backend> PlayMode<B> {
    /// Create a new play mode, loading the trained model from `model_path`
    pub fn new(model_path: &Path, device: B::Device) -> Result<Self> {
        use burn::backend::Autodiff;
        let (network, metadata) = load_network::<Autodiff<B>>(model_path, &device)
            .with_context(|| format!("Failed to load model from {:?}", model_path))?;

        let network = network.valid();

        println!(
            "Loaded model from {:?} ({} episodes trained)",
            model_path, metadata.episodes_trained
        );
        println!("You control the bottom paddle with the mouse. First to score wins the round.");
        println!();

        let engine = HockeyEngine::new(TableConfig::for_play());

        Ok(Self {
            network,
            engine,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            metrics: MatchMetrics::new(),
            device,
            should_quit: false,
            paused: false,
            banner: None,
        })
    }

    /// Run the play loop
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal with mouse capture
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    /// Main game loop
    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Physics at the simulated 60 Hz timestep
        let mut tick_timer = interval(Duration::from_millis(16));

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        self.engine.reset();
        self.metrics.on_game_start();

        loop {
            tokio::select! {
                // Handle keyboard and mouse input
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        let frame_area = terminal_area(terminal)?;
                        self.handle_event(event, frame_area);
                    }
                }

                // Physics tick
                _ = tick_timer.tick() => {
                    self.tick();
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

    /// Advance one physics step, or count down the goal banner
    fn tick(&mut self) {
        if self.paused {
            return;
        }

        // Between-round banner holds the table still for a couple of seconds
        if let Some((_, shown_at)) = &self.banner {
            if shown_at.elapsed() >= BANNER_DURATION {
                self.banner = None;
                self.engine.reset();
                self.metrics.on_game_start();
            }
            return;
        }

        // Policy sees the table mirrored so its own paddle reads the way it
        // did during training. The resulting action applies directly to the
        // top paddle without flipping.
        let state = self.engine.snapshot();
        let obs = create_mirrored_observation::<B>(&state, &self.device);
        let action = deterministic_action(&self.network, obs);

        let result = self.engine.step(PaddleAction::from(action));

        if result.terminated {
            if let Some(outcome) = result.outcome {
                self.metrics.on_game_over(outcome);
                // Goal::Top means the ball crossed the top line, scored by
                // the human on the bottom paddle.
                let message = match outcome {
                    Goal::Top => "YOU WIN!",
                    Goal::Bottom => "YOU LOSE!",
                };
                self.banner = Some((message.to_string(), Instant::now()));
            }
        } else if result.truncated {
            self.engine.reset();
            self.metrics.on_game_start();
        }
    }

    /// Handle a terminal event
    fn handle_event(&mut self, event: Event, frame_area: Rect) {
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return;
                }
                match self.input_handler.handle_key_event(key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Pause => self.paused = !self.paused,
                    KeyAction::Restart => {
                        self.banner = None;
                        self.engine.reset();
                        self.metrics.on_game_start();
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, frame_area),
            _ => {}
        }
    }

    /// Translate a mouse event into a paddle target
    fn handle_mouse(&mut self, mouse: MouseEvent, frame_area: Rect) {
        let table_area = Renderer::table_area(frame_area);
        if let Some(target) =
            self.input_handler
                .handle_mouse_event(mouse, table_area, self.engine.config())
        {
            self.engine.set_opponent_target(target.x, target.y);
        }
    }

    /// Render the current frame
    fn render_frame(&self, frame: &mut ratatui::Frame) {
        let state = self.engine.snapshot();
        let paused = if self.paused { " (paused)" } else { "" };
        let controls = format!("Mouse to move | P to pause | R to restart{}", paused);
        let banner = self.banner.as_ref().map(|(message, _)| message.as_str());
        self.renderer.render(
            frame,
            &state,
            self.engine.config(),
            &self.metrics,
            banner,
            &controls,
        );
    }

    /// Cleanup terminal state
    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Current terminal area as a Rect
fn terminal_area(terminal: &Terminal<CrosstermBackend<Stderr>>) -> Result<Rect> {
    let size = terminal.size().context("Failed to query terminal size")?;
    Ok(Rect::new(0, 0, size.width, size.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{
        ActorCriticConfig, InferenceBackend, PPOAgent, PPOConfig, TrainingBackend, default_device,
        save_model,
    };
    use tempfile::TempDir;

    #[test]
    fn test_play_mode_requires_model() {
        let device = default_device();
        let result =
            PlayMode::<InferenceBackend>::new(Path::new("/nonexistent/model.bin"), device);
        assert!(result.is_err());
    }

    #[test]
    fn test_play_mode_creation() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("play_model.bin");

        let device = default_device();
        let network = ActorCriticConfig::new(8, 2).init::<TrainingBackend>(&device);
        let agent = PPOAgent::new(network, PPOConfig::default(), 8, 2, device.clone());
        save_model(&agent, &model_path).unwrap();

        let mode = PlayMode::<InferenceBackend>::new(&model_path, device).unwrap();
        assert!(!mode.paused);
        assert!(mode.banner.is_none());
        // Play mode runs without the scripted bot
        assert!(!mode.engine.config().with_bot);
    }

    #[test]
    fn test_policy_drives_top_paddle() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("play_model.bin");

        let device = default_device();
        let network = ActorCriticConfig::new(8, 2).init::<TrainingBackend>(&device);
        let agent = PPOAgent::new(network, PPOConfig::default(), 8, 2, device.clone());
        save_model(&agent, &model_path).unwrap();

        let mut mode = PlayMode::<InferenceBackend>::new(&model_path, device).unwrap();
        mode.engine.reset();

        for _ in 0..5 {
            mode.tick();
        }

        assert_eq!(mode.engine.steps(), 5);
    }

    #[test]
    fn test_banner_pauses_physics() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("play_model.bin");

        let device = default_device();
        let network = ActorCriticConfig::new(8, 2).init::<TrainingBackend>(&device);
        let agent = PPOAgent::new(network, PPOConfig::default(), 8, 2, device.clone());
        save_model(&agent, &model_path).unwrap();

        let mut mode = PlayMode::<InferenceBackend>::new(&model_path, device).unwrap();
        mode.engine.reset();
        mode.banner = Some(("YOU WIN!".to_string(), Instant::now()));

        mode.tick();
        assert_eq!(mode.engine.steps(), 0);
    }
}
