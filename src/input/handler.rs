use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::game::{TableConfig, Vec2};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Pause,
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => KeyAction::Pause,
            _ => KeyAction::None,
        }
    }

    /// Translate a mouse event over the table area into a paddle target in
    /// table coordinates.
    ///
    /// The screen top maps to table y 0, so rows grow with table y directly.
    /// Returns `None` for events outside the table or non-movement events.
    /// The engine clamps the target onto the bottom half, so the caller can
    /// pass it through unchanged.
    pub fn handle_mouse_event(
        &self,
        mouse: MouseEvent,
        table_area: Rect,
        config: &TableConfig,
    ) -> Option<Vec2> {
        match mouse.kind {
            MouseEventKind::Moved
            | MouseEventKind::Drag(_)
            | MouseEventKind::Down(_) => {}
            _ => return None,
        }

        if table_area.width == 0 || table_area.height == 0 {
            return None;
        }
        if !table_area.contains(ratatui::layout::Position::new(mouse.column, mouse.row)) {
            return None;
        }

        let fx = (f32::from(mouse.column - table_area.x) + 0.5) / f32::from(table_area.width);
        let fy = (f32::from(mouse.row - table_area.y) + 0.5) / f32::from(table_area.height);

        Some(Vec2::new(fx * config.width, fy * config.height))
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, MouseButton};

    fn mouse_moved(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(q), KeyAction::Quit);

        let q_upper = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(q_upper), KeyAction::Quit);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(esc), KeyAction::Quit);
    }

    #[test]
    fn test_restart_key() {
        let handler = InputHandler::new();

        let r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(r), KeyAction::Restart);
    }

    #[test]
    fn test_pause_keys() {
        let handler = InputHandler::new();

        let p = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(p), KeyAction::Pause);

        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(space), KeyAction::Pause);
    }

    #[test]
    fn test_unknown_keys() {
        let handler = InputHandler::new();

        for code in [KeyCode::Char('x'), KeyCode::Char('+'), KeyCode::Char('-')] {
            let key = KeyEvent::new(code, KeyModifiers::NONE);
            assert_eq!(handler.handle_key_event(key), KeyAction::None);
        }
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_mouse_mapping_center() {
        let handler = InputHandler::new();
        let area = Rect::new(10, 5, 50, 20);
        let config = TableConfig::default();

        // Middle of the table area maps near the middle of the table
        let target = handler
            .handle_mouse_event(mouse_moved(35, 15), area, &config)
            .unwrap();

        assert!((target.x - config.width / 2.0).abs() < config.width / 50.0);
        assert!((target.y - config.height / 2.0).abs() < config.height / 20.0);
    }

    #[test]
    fn test_mouse_mapping_corners() {
        let handler = InputHandler::new();
        let area = Rect::new(0, 0, 100, 50);
        let config = TableConfig::default();

        // Top-left corner maps near table origin
        let target = handler
            .handle_mouse_event(mouse_moved(0, 0), area, &config)
            .unwrap();
        assert!(target.x < config.width / 50.0);
        assert!(target.y < config.height / 25.0);

        // Bottom-right corner maps near (width, height)
        let target = handler
            .handle_mouse_event(mouse_moved(99, 49), area, &config)
            .unwrap();
        assert!(target.x > config.width * 0.98);
        assert!(target.y > config.height * 0.97);
    }

    #[test]
    fn test_mouse_outside_table_ignored() {
        let handler = InputHandler::new();
        let area = Rect::new(10, 5, 50, 20);
        let config = TableConfig::default();

        assert!(handler
            .handle_mouse_event(mouse_moved(5, 10), area, &config)
            .is_none());
        assert!(handler
            .handle_mouse_event(mouse_moved(70, 10), area, &config)
            .is_none());
    }

    #[test]
    fn test_mouse_scroll_ignored() {
        let handler = InputHandler::new();
        let area = Rect::new(0, 0, 100, 50);
        let config = TableConfig::default();

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 50,
            row: 25,
            modifiers: KeyModifiers::NONE,
        };
        assert!(handler.handle_mouse_event(scroll, area, &config).is_none());

        let drag = MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 50,
            row: 25,
            modifiers: KeyModifiers::NONE,
        };
        assert!(handler.handle_mouse_event(drag, area, &config).is_some());
    }
}
