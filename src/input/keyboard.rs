use glfw::{Key, WindowEvent, Action};
use std::collections::HashSet;
use crate::input::Input;

/// Key transitions seen since the last `clear`.
#[derive(Debug, Clone)]
pub struct KeyBoard {
    pressed_keys: HashSet<Key>,
    released_keys: HashSet<Key>
}

impl KeyBoard {
    pub fn get_pressed_keys(&self) -> &HashSet<Key> {
        &self.pressed_keys
    }

    pub fn get_released_keys(&self) -> &HashSet<Key> {
        &self.released_keys
    }
}

impl Input for KeyBoard {
    fn new() -> Self {
        KeyBoard {
            pressed_keys: HashSet::new(),
            released_keys: HashSet::new()
        }
    }

    fn update(&mut self, event: WindowEvent) {
        if let WindowEvent::Key(key, _, action, _) = event {
            match action {
                Action::Press => {
                    self.released_keys.remove(&key);
                    self.pressed_keys.insert(key);
                },
                Action::Release => {
                    self.pressed_keys.remove(&key);
                    self.released_keys.insert(key);
                },
                // Repeats carry no new state; the key is already held.
                Action::Repeat => {}
            }
        }
    }

    fn clear(&mut self) {
        self.pressed_keys.clear();
        self.released_keys.clear();
    }
}
