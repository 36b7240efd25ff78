use crate::input::mouse::{Mouse, Button, CursorPosition};
use crate::input::keyboard::KeyBoard;
use crate::input::{Input, CameraInput, CameraKey};
use std::collections::{HashMap, HashSet};
use glam::Vec2;
use glfw::{Key, WindowEvent};

#[cfg(feature = "trace")]
use tracing::{debug, instrument};

/// Maps a logical camera key onto the physical key bound to it.
pub fn bound_key(key: CameraKey) -> Key {
    match key {
        CameraKey::Forward => Key::W,
        CameraKey::Back => Key::S,
        CameraKey::Left => Key::A,
        CameraKey::Right => Key::D,
        CameraKey::Up => Key::E,
        CameraKey::Down => Key::Q
    }
}

/// Mouse and keyboard combined, tracking what stays held across frames.
#[derive(Debug, Clone)]
pub struct MultiInput {
    mouse: Mouse,
    keyboard: KeyBoard,
    held_buttons: HashMap<Button, CursorPosition>,
    held_keys: HashSet<Key>
}

impl MultiInput {
    pub fn get_cursor_position(&self) -> CursorPosition {
        self.mouse.get_cursor_position()
    }

    pub fn get_held_buttons(&self) -> &HashMap<Button, CursorPosition> {
        &self.held_buttons
    }

    pub fn get_held_keys(&self) -> &HashSet<Key> {
        &self.held_keys
    }

    /// True if the key went down this frame or is still held from an earlier one.
    pub fn is_down(&self, key: Key) -> bool {
        self.keyboard.get_pressed_keys().contains(&key) || self.held_keys.contains(&key)
    }
}

impl CameraInput for MultiInput {
    fn is_key_down(&self, key: CameraKey) -> bool {
        self.is_down(bound_key(key))
    }

    fn cursor_position(&self) -> Vec2 {
        self.mouse.get_cursor_position().into()
    }
}

impl Input for MultiInput {
    #[cfg_attr(feature = "trace", instrument)]
    fn new() -> Self {
        Self {
            mouse: Mouse::new(),
            keyboard: KeyBoard::new(),
            held_buttons: HashMap::new(),
            held_keys: HashSet::new()
        }
    }

    #[cfg_attr(feature = "trace", instrument(skip(self)))]
    fn update(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Key(..) => self.keyboard.update(event),
            WindowEvent::CursorPos(..)
            | WindowEvent::MouseButton(..)
            | WindowEvent::CursorEnter(_) => self.mouse.update(event),
            _ => {}
        }

        // held = held - released
        let released_buttons = self.mouse.get_released_buttons();
        self.held_buttons.retain(|k, _| !released_buttons.contains_key(k));
        self.held_keys = self.held_keys.difference(self.keyboard.get_released_keys()).copied().collect();
    }

    #[cfg_attr(feature = "trace", instrument(skip(self)))]
    fn clear(&mut self) {
        self.held_buttons.extend(self.mouse.get_clicked_buttons());
        self.held_keys.extend(self.keyboard.get_pressed_keys());
        #[cfg(feature = "trace")]
        debug!("Carried {} keys into the next frame.", self.held_keys.len());

        self.mouse.clear();
        self.keyboard.clear();
    }
}
