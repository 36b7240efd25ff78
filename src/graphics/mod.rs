pub mod backend;
pub mod shader;

pub use backend::{ShaderBackend, ShaderStage, UniformValue};
pub use shader::{BoundProgram, ShaderError, ShaderLoader, ShaderProgram};
