pub mod free_fly_camera;

use glam::{Mat4, Vec3};

/// World-space up axis every camera builds its basis against.
pub const WORLD_UP: Vec3 = Vec3::Y;

pub trait Camera: Send + Sync {
    fn view(&self) -> Mat4;

    fn inverse_view(&self) -> Mat4;

    fn projection(&self) -> Mat4;

    fn inverse_projection(&self) -> Mat4;

    fn position(&self) -> Vec3;

    fn set_position(&mut self, new_pos: Vec3);

    fn forward_direction(&self) -> Vec3;
}
