pub mod load;
pub mod camera;
pub mod input;
pub mod graphics;

#[cfg(feature="trace")]
pub mod log;

pub use camera::Camera;
pub use camera::free_fly_camera::{FreeFlyCamera, FreeFlyCameraLoader};
pub use graphics::shader::{BoundProgram, ShaderError, ShaderProgram};
pub use input::{CameraInput, CameraKey, FrozenCursor, InputState};
