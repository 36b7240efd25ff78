use glfw::{MouseButton, Modifiers, WindowEvent, Action};
use glam::Vec2;
use std::collections::HashMap;
use crate::input::Input;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64
}

impl From<CursorPosition> for Vec2 {
    fn from(position: CursorPosition) -> Self {
        Vec2::new(position.x as f32, position.y as f32)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Button {
    pub button: MouseButton,
    pub modifiers: Modifiers
}

#[derive(Debug, Clone)]
pub struct Mouse {
    cursor_position: CursorPosition,
    is_cursor_within_window: bool,
    clicked_buttons: HashMap<Button, CursorPosition>,
    released_buttons: HashMap<Button, CursorPosition>
}

impl Mouse {
    pub fn get_cursor_position(&self) -> CursorPosition {
        self.cursor_position
    }

    pub fn is_cursor_within_window(&self) -> bool {
        self.is_cursor_within_window
    }

    pub fn get_clicked_buttons(&self) -> &HashMap<Button, CursorPosition> {
        &self.clicked_buttons
    }

    pub fn get_released_buttons(&self) -> &HashMap<Button, CursorPosition>  {
        &self.released_buttons
    }
}

impl Input for Mouse {
    fn new() -> Self {
        Mouse {
            cursor_position: CursorPosition { x: 0.0, y: 0.0 },
            is_cursor_within_window: false,
            clicked_buttons: HashMap::new(),
            released_buttons: HashMap::new()
        }
    }

    fn update(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CursorEnter(entered) => self.is_cursor_within_window = entered,
            WindowEvent::MouseButton(button, action, modifiers) => {
                let button = Button { button, modifiers };
                match action {
                    Action::Release => {
                        self.released_buttons.insert(button, self.cursor_position);
                    }
                    Action::Press => {
                        self.clicked_buttons.insert(button, self.cursor_position);
                    }
                    Action::Repeat => {}
                }
            },
            WindowEvent::CursorPos(x, y) => {
                self.cursor_position = CursorPosition { x, y };
            },
            _ => {}
        }
    }

    fn clear(&mut self) {
        self.clicked_buttons.clear();
        self.released_buttons.clear();
    }
}
