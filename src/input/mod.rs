#[cfg(feature = "window")]
pub mod mouse;
#[cfg(feature = "window")]
pub mod keyboard;
#[cfg(feature = "window")]
pub mod multi_input;

use glam::Vec2;
use std::collections::HashSet;

#[cfg(feature = "window")]
use glfw::WindowEvent;

/// Logical movement keys a camera polls each frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CameraKey {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down
}

impl CameraKey {
    pub const ALL: [CameraKey; 6] = [
        CameraKey::Forward,
        CameraKey::Back,
        CameraKey::Left,
        CameraKey::Right,
        CameraKey::Up,
        CameraKey::Down
    ];
}

/// What a camera needs from the windowing system: key state and the pointer.
pub trait CameraInput {
    fn is_key_down(&self, key: CameraKey) -> bool;

    fn cursor_position(&self) -> Vec2;
}

impl<T: CameraInput + ?Sized> CameraInput for &T {
    fn is_key_down(&self, key: CameraKey) -> bool {
        (**self).is_key_down(key)
    }

    fn cursor_position(&self) -> Vec2 {
        (**self).cursor_position()
    }
}

/// Event-driven input that is fed raw window events and reset once per frame.
#[cfg(feature = "window")]
pub trait Input: Send + Sync {
    fn new() -> Self;

    fn update(&mut self, event: WindowEvent);

    fn clear(&mut self);
}

/// Input filled in directly by the host, e.g. from its own event handling.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keys_down: HashSet<CameraKey>,
    pub cursor: Vec2
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: CameraKey) {
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: CameraKey) {
        self.keys_down.remove(&key);
    }

    pub fn move_cursor(&mut self, position: Vec2) {
        self.cursor = position;
    }
}

impl CameraInput for InputState {
    fn is_key_down(&self, key: CameraKey) -> bool {
        self.keys_down.contains(&key)
    }

    fn cursor_position(&self) -> Vec2 {
        self.cursor
    }
}

/// Forwards key state but pins the pointer at the origin, which leaves
/// mouse-look switched off.
#[derive(Debug, Clone)]
pub struct FrozenCursor<I>(pub I);

impl<I: CameraInput> CameraInput for FrozenCursor<I> {
    fn is_key_down(&self, key: CameraKey) -> bool {
        self.0.is_key_down(key)
    }

    fn cursor_position(&self) -> Vec2 {
        Vec2::ZERO
    }
}
