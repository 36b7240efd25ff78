use glam::{Mat4, Quat, Vec2, Vec3};
use serde::Deserialize;
use thiserror::Error;

#[cfg(feature = "trace")]
use tracing::{debug, error, instrument};

use crate::camera::{Camera, WORLD_UP};
use crate::camera::free_fly_camera::FreeFlyCameraLoaderError::{DeserializeError, DegenerateForward};
use crate::input::{CameraInput, CameraKey};
use crate::load::{load_deserializable_from_file, load_deserializable_from_json, JSONLoad, LoadError};

/// Translation speed in world units per second.
pub const MOVE_SPEED: f32 = 5.0;
/// Scale applied to raw pointer deltas before they become rotation input.
pub const MOUSE_SENSITIVITY: f32 = 0.002;
pub const ROTATION_SPEED: f32 = 0.3;

pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 3.0);
pub const DEFAULT_FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Perspective camera flown with six movement keys and mouse-look.
///
/// The view matrix is rebuilt on every [`on_update`](FreeFlyCamera::on_update);
/// the projection only changes through [`on_resize`](FreeFlyCamera::on_resize),
/// so nothing meaningful comes out of `projection()` before the first resize.
#[derive(Debug, Clone)]
pub struct FreeFlyCamera {
    position: Vec3,
    forward_direction: Vec3,

    vertical_fov: f32,
    near_clip: f32,
    far_clip: f32,

    viewport_width: u32,
    viewport_height: u32,

    view: Mat4,
    projection: Mat4,
    inverse_view: Mat4,
    inverse_projection: Mat4,

    last_mouse_position: Vec2
}

impl FreeFlyCamera {
    /// `vertical_fov` is in degrees.
    pub fn new(vertical_fov: f32, near_clip: f32, far_clip: f32) -> Self {
        Self {
            position: DEFAULT_POSITION,
            forward_direction: DEFAULT_FORWARD,
            vertical_fov,
            near_clip,
            far_clip,
            viewport_width: 0,
            viewport_height: 0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            last_mouse_position: Vec2::ZERO
        }
    }

    /// Advances the camera by one frame of `dt` seconds using the current input.
    #[cfg_attr(feature = "trace", instrument(skip(self, input)))]
    pub fn on_update<I: CameraInput>(&mut self, dt: f32, input: &I) {
        let mouse_position = input.cursor_position();
        let delta = (mouse_position - self.last_mouse_position) * MOUSE_SENSITIVITY;
        self.last_mouse_position = mouse_position;

        // Built against the fixed world up, not re-orthonormalized.
        let right_direction = self.forward_direction.cross(WORLD_UP);

        let step = MOVE_SPEED * dt;

        if input.is_key_down(CameraKey::Forward) {
            self.position += self.forward_direction * step;
        }
        if input.is_key_down(CameraKey::Back) {
            self.position -= self.forward_direction * step;
        }
        if input.is_key_down(CameraKey::Right) {
            self.position += right_direction * step;
        }
        if input.is_key_down(CameraKey::Left) {
            self.position -= right_direction * step;
        }
        if input.is_key_down(CameraKey::Up) {
            self.position += WORLD_UP * step;
        }
        if input.is_key_down(CameraKey::Down) {
            self.position -= WORLD_UP * step;
        }

        if delta.x != 0.0 || delta.y != 0.0 {
            let pitch_delta = delta.y * self.rotation_speed();
            let yaw_delta = delta.x * self.rotation_speed();

            // Pitch composed with yaw, in that order.
            let rotation = (Quat::from_axis_angle(right_direction, -pitch_delta)
                * Quat::from_axis_angle(WORLD_UP, -yaw_delta))
                .normalize();

            self.forward_direction = (rotation * self.forward_direction).normalize();

            #[cfg(feature = "trace")]
            debug!("Rotated forward direction to: {:?}", self.forward_direction);
        }

        self.recalculate_view();
    }

    /// Rebuilds the projection for a new viewport. Unchanged dimensions are ignored.
    #[cfg_attr(feature = "trace", instrument(skip(self)))]
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == self.viewport_width && height == self.viewport_height {
            return
        }

        self.viewport_width = width;
        self.viewport_height = height;

        #[cfg(feature = "trace")]
        debug!("Viewport changed to {}x{}. Recalculating projection.", width, height);

        self.recalculate_projection();
    }

    /// Takes `position` as the previous pointer location so the next update
    /// sees no jump, e.g. right after the cursor is captured.
    pub fn sync_cursor(&mut self, position: Vec2) {
        self.last_mouse_position = position;
    }

    pub fn rotation_speed(&self) -> f32 {
        ROTATION_SPEED
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn vertical_fov(&self) -> f32 {
        self.vertical_fov
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near_clip, self.far_clip)
    }

    fn recalculate_projection(&mut self) {
        let aspect_ratio = self.viewport_width as f32 / self.viewport_height as f32;

        self.projection = Mat4::perspective_rh_gl(
            self.vertical_fov.to_radians(),
            aspect_ratio,
            self.near_clip,
            self.far_clip
        );
        self.inverse_projection = self.projection.inverse();
    }

    fn recalculate_view(&mut self) {
        self.view = Mat4::look_at_rh(
            self.position,
            self.position + self.forward_direction,
            WORLD_UP
        );
        self.inverse_view = self.view.inverse();
    }
}

impl Camera for FreeFlyCamera {
    fn view(&self) -> Mat4 {
        self.view
    }

    fn inverse_view(&self) -> Mat4 {
        self.inverse_view
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn inverse_projection(&self) -> Mat4 {
        self.inverse_projection
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, new_pos: Vec3) {
        self.position = new_pos;
        self.recalculate_view();
    }

    fn forward_direction(&self) -> Vec3 {
        self.forward_direction
    }
}

pub const FREE_FLY_CAMERA_LOAD_ID: &str = "free_fly_camera";

const MIN_RIGHT_LENGTH_SQUARED: f32 = 1e-6;

#[derive(Deserialize, Debug, Clone)]
pub struct FreeFlyCameraJSON {
    vertical_fov: f32,
    near_clip: f32,
    far_clip: f32,
    #[serde(default)]
    position: Option<[f32; 3]>,
    #[serde(default)]
    forward_direction: Option<[f32; 3]>
}

impl FreeFlyCameraJSON {
    fn build(&self) -> Result<FreeFlyCamera, FreeFlyCameraLoaderError> {
        let mut camera = FreeFlyCamera::new(self.vertical_fov, self.near_clip, self.far_clip);

        if let Some(position) = self.position {
            camera.position = Vec3::from(position);
        }

        if let Some(forward) = self.forward_direction {
            let raw = Vec3::from(forward);
            if raw.length_squared() == 0.0 {
                return Err(DegenerateForward { forward })
            }

            // Looking straight along the up axis leaves no right direction,
            // and look_at would produce a NaN view.
            let forward = raw.normalize();
            if forward.cross(WORLD_UP).length_squared() < MIN_RIGHT_LENGTH_SQUARED {
                return Err(DegenerateForward { forward: raw.into() })
            }
            camera.forward_direction = forward;
        }

        Ok(camera)
    }
}

#[derive(Debug, Clone)]
pub struct FreeFlyCameraLoader {
    path: String
}

impl FreeFlyCameraLoader {
    #[cfg_attr(feature = "trace", instrument)]
    pub fn new(file_path: String) -> Self {
        Self {
            path: file_path
        }
    }

    #[cfg_attr(feature = "trace", instrument)]
    pub fn load(&self) -> anyhow::Result<FreeFlyCamera> {
        let json: FreeFlyCameraJSON = load_deserializable_from_file(&self.path, FREE_FLY_CAMERA_LOAD_ID)
            .map_err(|e| {
                #[cfg(feature = "trace")]
                error!("Failed to load free fly camera JSON from file: {:?}", self.path);

                DeserializeError {
                    path: self.path.clone(),
                    source: e
                }
            })?;

        Ok(json.build()?)
    }

    #[cfg_attr(feature = "trace", instrument)]
    pub fn from_json(json: JSONLoad) -> anyhow::Result<FreeFlyCamera> {
        let camera_json: FreeFlyCameraJSON = load_deserializable_from_json(json, FREE_FLY_CAMERA_LOAD_ID)
            .map_err(|e| {
                DeserializeError {
                    path: String::from("<inline>"),
                    source: e
                }
            })?;

        Ok(camera_json.build()?)
    }
}

#[derive(Error, Debug)]
pub enum FreeFlyCameraLoaderError {
    #[error("Failed to load free fly camera JSON from file: {path:?}")]
    DeserializeError {
        path: String,
        source: LoadError
    },

    #[error("Forward direction {forward:?} is zero or parallel to the up axis")]
    DegenerateForward {
        forward: [f32; 3]
    }
}
