//! The slice of the graphics API that shader programs are built on.
//!
//! [`ShaderBackend`] mirrors the primitive GL calls one for one, so a
//! [`ShaderProgram`](crate::graphics::shader::ShaderProgram) is defined purely
//! in terms of them and can run against a real context or a recording fake.

use std::fmt::{self, Debug, Display};

use glam::{Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER
        }
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment")
        }
    }
}

/// A typed value headed for a uniform slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4)
}

pub trait ShaderBackend {
    type Shader: Copy + Debug;
    type Program: Copy + Debug + PartialEq;
    type UniformLocation: Clone + Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;

    fn shader_source(&self, shader: Self::Shader, source: &str);

    fn compile_shader(&self, shader: Self::Shader);

    fn shader_compile_status(&self, shader: Self::Shader) -> bool;

    fn shader_info_log(&self, shader: Self::Shader) -> String;

    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);

    fn link_program(&self, program: Self::Program);

    fn validate_program(&self, program: Self::Program);

    fn program_link_status(&self, program: Self::Program) -> bool;

    fn program_info_log(&self, program: Self::Program) -> String;

    fn delete_program(&self, program: Self::Program);

    /// `None` clears the active program slot.
    fn use_program(&self, program: Option<Self::Program>);

    /// `None` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;

    /// Uploads to the active program. A `None` location is dropped by the driver.
    fn upload_uniform(&self, location: Option<&Self::UniformLocation>, value: &UniformValue);
}

// Every call below assumes the context is current on the calling thread.
impl ShaderBackend for glow::Context {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, stage.gl_enum()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    // glow has no binding for glValidateProgram; a program that fails to
    // link is already caught through the link status.
    fn validate_program(&self, _program: Self::Program) {}

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn upload_uniform(&self, location: Option<&Self::UniformLocation>, value: &UniformValue) {
        unsafe {
            match value {
                UniformValue::Int(x) => self.uniform_1_i32(location, *x),
                UniformValue::Float(x) => self.uniform_1_f32(location, *x),
                UniformValue::Vec2(v) => self.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => self.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
            }
        }
    }
}
