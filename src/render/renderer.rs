use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph,
        canvas::{Canvas, Circle, Line as CanvasLine},
    },
};

use crate::game::{TableConfig, TableState};
use crate::metrics::MatchMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Render one frame: header stats, the table, and a controls footer.
    ///
    /// `banner` overlays a message (WIN/LOSE) in the middle of the table.
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &TableState,
        config: &TableConfig,
        metrics: &MatchMetrics,
        banner: Option<&str>,
        controls: &str,
    ) {
        let chunks = Self::layout(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        let table_area = Self::table_area(frame.area());
        let table = self.render_table(state, config);
        frame.render_widget(table, table_area);

        if let Some(message) = banner {
            let banner_area = Self::banner_area(table_area);
            frame.render_widget(self.render_banner(message), banner_area);
        }

        let footer = self.render_controls(controls);
        frame.render_widget(footer, chunks[2]);
    }

    /// Screen rectangle the table is drawn into
    ///
    /// Input handling uses this to translate mouse positions into table
    /// coordinates, so it must match the layout used by `render`.
    pub fn table_area(frame_area: Rect) -> Rect {
        let chunks = Self::layout(frame_area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(chunks[1])[1]
    }

    fn layout(frame_area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Table area
                Constraint::Length(3), // Footer
            ])
            .split(frame_area)
    }

    fn banner_area(table_area: Rect) -> Rect {
        let height = 3.min(table_area.height);
        let y = table_area.y + (table_area.height.saturating_sub(height)) / 2;
        Rect::new(table_area.x, y, table_area.width, height)
    }

    fn render_table<'a>(&self, state: &'a TableState, config: &'a TableConfig) -> Canvas<'a, impl Fn(&mut ratatui::widgets::canvas::Context) + 'a> {
        let w = f64::from(config.width);
        let h = f64::from(config.height);
        let goal_left = f64::from((config.width - config.goal_width) / 2.0);
        let goal_right = f64::from((config.width + config.goal_width) / 2.0);

        // Table y grows downward; the canvas y axis grows upward, so drawing
        // flips with y' = h - y. The policy paddle ends up at the top of the
        // screen and the human paddle at the bottom.
        let flip = move |y: f32| h - f64::from(y);

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Air Hockey "),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(move |ctx| {
                // Walls, with the goal mouths left open
                for (x1, y1, x2, y2) in [
                    (0.0, 0.0, 0.0, h),
                    (w, 0.0, w, h),
                    (0.0, h, goal_left, h),
                    (goal_right, h, w, h),
                    (0.0, 0.0, goal_left, 0.0),
                    (goal_right, 0.0, w, 0.0),
                ] {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: Color::White,
                    });
                }

                // Center line
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: h / 2.0,
                    x2: w,
                    y2: h / 2.0,
                    color: Color::DarkGray,
                });

                // Goal mouths
                for y in [0.0, h] {
                    ctx.draw(&CanvasLine {
                        x1: goal_left,
                        y1: y,
                        x2: goal_right,
                        y2: y,
                        color: Color::Yellow,
                    });
                }

                // Policy paddle (top of screen)
                ctx.draw(&Circle {
                    x: f64::from(state.top_paddle.x),
                    y: flip(state.top_paddle.y),
                    radius: f64::from(config.paddle_radius),
                    color: Color::Red,
                });

                // Player / bot paddle (bottom of screen)
                ctx.draw(&Circle {
                    x: f64::from(state.bottom_paddle.x),
                    y: flip(state.bottom_paddle.y),
                    radius: f64::from(config.paddle_radius),
                    color: Color::Cyan,
                });

                // Ball
                ctx.draw(&Circle {
                    x: f64::from(state.ball.position.x),
                    y: flip(state.ball.position.y),
                    radius: f64::from(config.ball_radius),
                    color: Color::Green,
                });
            })
    }

    fn render_stats(&self, state: &TableState, metrics: &MatchMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.format_score(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_banner(&self, message: &str) -> Paragraph<'_> {
        let color = if message.contains("WIN") {
            Color::Green
        } else {
            Color::Red
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                message.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls<'a>(&self, controls: &'a str) -> Paragraph<'a> {
        let text = vec![Line::from(vec![
            Span::styled(controls, Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_area_within_frame() {
        let frame = Rect::new(0, 0, 120, 40);
        let area = Renderer::table_area(frame);

        assert!(area.y >= 3); // Below the header
        assert!(area.x > 0); // Centered horizontally
        assert!(area.right() <= frame.right());
        assert!(area.bottom() <= frame.bottom() - 3); // Above the footer
    }

    #[test]
    fn test_table_area_is_stable() {
        let frame = Rect::new(0, 0, 100, 30);
        assert_eq!(Renderer::table_area(frame), Renderer::table_area(frame));
    }
}
