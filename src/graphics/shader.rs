use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::Deserialize;
use thiserror::Error;

#[cfg(feature="trace")]
use tracing::{instrument, debug, warn, error};

use crate::graphics::backend::{ShaderBackend, ShaderStage, UniformValue};
use crate::graphics::shader::ShaderLoaderError::DeserializeError;
use crate::load::{load_deserializable_from_file, read_source_text, LoadError};

/// Problems met while building or driving a program.
///
/// These are reported, never returned from construction or uniform uploads:
/// a program that failed to build is simply unusable (see
/// [`ShaderProgram::check`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShaderError {
    #[error("Failed to compile {stage} shader: {log}")]
    CompileFailure {
        stage: ShaderStage,
        log: String
    },

    #[error("Failed to link shaders: {log}")]
    LinkFailure {
        log: String
    },

    #[error("Uniform '{name}' doesn't exist")]
    UnknownUniform {
        name: String
    }
}

impl ShaderError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ShaderError::UnknownUniform { .. })
    }
}

/// A linked vertex + fragment program with cached uniform locations.
///
/// The GPU program is released when this value is dropped.
pub struct ShaderProgram<'gl, B: ShaderBackend> {
    backend: &'gl B,
    handle: Option<B::Program>,
    uniform_location_cache: HashMap<String, Option<B::UniformLocation>>,
    diagnostics: Vec<ShaderError>
}

impl<'gl, B: ShaderBackend> ShaderProgram<'gl, B> {
    /// Reads both stages from disk and builds the program. Unreadable files
    /// become empty sources and fail at compile time.
    #[cfg_attr(feature="trace", instrument(skip(backend, vertex_path, fragment_path)))]
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(backend: &'gl B, vertex_path: P, fragment_path: Q) -> Self {
        let vertex_source = read_source_text(vertex_path);
        let fragment_source = read_source_text(fragment_path);

        Self::from_sources(backend, &vertex_source, &fragment_source)
    }

    #[cfg_attr(feature="trace", instrument(skip(backend, vertex_source, fragment_source)))]
    pub fn from_sources(backend: &'gl B, vertex_source: &str, fragment_source: &str) -> Self {
        let mut program = Self {
            backend,
            handle: None,
            uniform_location_cache: HashMap::new(),
            diagnostics: Vec::new()
        };

        program.handle = program.create(vertex_source, fragment_source);
        program
    }

    /// `None` means the program failed to build and every use of it is a no-op.
    pub fn handle(&self) -> Option<B::Program> {
        self.handle
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Everything reported so far, oldest first.
    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    /// `Err` with the first compile or link failure if the program is unusable.
    pub fn check(&self) -> Result<(), ShaderError> {
        match self.diagnostics.iter().find(|d| d.is_fatal()) {
            Some(failure) if self.handle.is_none() => Err(failure.clone()),
            None if self.handle.is_none() => Err(ShaderError::LinkFailure {
                log: String::from("program was never created")
            }),
            _ => Ok(())
        }
    }

    /// Makes this the active program until the returned guard is dropped.
    pub fn bind(&mut self) -> BoundProgram<'_, 'gl, B> {
        self.backend.use_program(self.handle);

        BoundProgram { program: self }
    }

    fn uniform_location(&mut self, name: &str) -> Option<B::UniformLocation> {
        if let Some(location) = self.uniform_location_cache.get(name) {
            return location.clone()
        }

        let backend = self.backend;
        let location = self.handle.and_then(|program| backend.uniform_location(program, name));
        if location.is_none() {
            self.report(ShaderError::UnknownUniform { name: name.to_string() });
        }

        self.uniform_location_cache.insert(name.to_string(), location.clone());
        location
    }

    fn create(&mut self, vertex_source: &str, fragment_source: &str) -> Option<B::Program> {
        // Both stages are always attempted so every compile error gets reported.
        let vs = self.compile_stage(ShaderStage::Vertex, vertex_source);
        let fs = self.compile_stage(ShaderStage::Fragment, fragment_source);

        let program = match self.backend.create_program() {
            Ok(program) => program,
            Err(log) => {
                self.report(ShaderError::LinkFailure { log });
                for shader in vs.into_iter().chain(fs) {
                    self.backend.delete_shader(shader);
                }

                return None
            }
        };

        for shader in vs.iter().chain(fs.iter()) {
            self.backend.attach_shader(program, *shader);
        }
        self.backend.link_program(program);
        self.backend.validate_program(program);

        let failure = if !self.backend.program_link_status(program) {
            Some(self.backend.program_info_log(program))
        } else if vs.is_none() || fs.is_none() {
            Some(String::from("a shader stage failed to compile"))
        } else {
            None
        };

        if let Some(log) = failure {
            self.report(ShaderError::LinkFailure { log });
            self.backend.delete_program(program);
            for shader in vs.into_iter().chain(fs) {
                self.backend.delete_shader(shader);
            }

            return None
        }

        #[cfg(feature="trace")]
        debug!("Successfully linked shaders");

        for shader in vs.into_iter().chain(fs) {
            self.backend.detach_shader(program, shader);
            self.backend.delete_shader(shader);
        }

        Some(program)
    }

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Option<B::Shader> {
        let shader = match self.backend.create_shader(stage) {
            Ok(shader) => shader,
            Err(log) => {
                self.report(ShaderError::CompileFailure { stage, log });
                return None
            }
        };

        self.backend.shader_source(shader, source);
        self.backend.compile_shader(shader);

        if !self.backend.shader_compile_status(shader) {
            let log = self.backend.shader_info_log(shader);
            self.report(ShaderError::CompileFailure { stage, log });
            self.backend.delete_shader(shader);

            return None
        }

        #[cfg(feature="trace")]
        debug!("Successfully compiled {} shader.", stage);

        Some(shader)
    }

    fn report(&mut self, diagnostic: ShaderError) {
        #[cfg(feature="trace")]
        match diagnostic {
            ShaderError::UnknownUniform { .. } => warn!("{}", diagnostic),
            _ => error!("{}", diagnostic)
        }

        self.diagnostics.push(diagnostic);
    }
}

impl<'gl, B: ShaderBackend> Drop for ShaderProgram<'gl, B> {
    fn drop(&mut self) {
        if let Some(program) = self.handle.take() {
            self.backend.delete_program(program);
        }
        self.uniform_location_cache.clear();
    }
}

impl<'gl, B: ShaderBackend> fmt::Debug for ShaderProgram<'gl, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .field("cached_uniforms", &self.uniform_location_cache.len())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

/// A program that is currently the active one. Uniforms can only be set
/// through this guard, and the program is unbound when it goes away.
pub struct BoundProgram<'p, 'gl, B: ShaderBackend> {
    program: &'p mut ShaderProgram<'gl, B>
}

impl<'p, 'gl, B: ShaderBackend> BoundProgram<'p, 'gl, B> {
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let location = self.program.uniform_location(name);
        self.program.backend.upload_uniform(location.as_ref(), &value);
    }

    pub fn set_uniform_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    pub fn set_uniform_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    pub fn set_uniform_vec2(&mut self, name: &str, value: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    pub fn set_uniform_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    pub fn set_uniform_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    pub fn set_uniform_mat4(&mut self, name: &str, value: &Mat4) {
        self.set_uniform(name, UniformValue::Mat4(*value));
    }

    pub fn program(&self) -> &ShaderProgram<'gl, B> {
        self.program
    }

    pub fn unbind(self) {}
}

impl<'p, 'gl, B: ShaderBackend> Drop for BoundProgram<'p, 'gl, B> {
    fn drop(&mut self) {
        self.program.backend.use_program(None);
    }
}

pub const SHADER_LOAD_ID: &str = "shader";

#[derive(Deserialize, Debug, Clone)]
pub struct ShaderJSON {
    pub vertex: String,
    pub fragment: String
}

/// Builds a [`ShaderProgram`] from a JSON file naming its stage sources.
#[derive(Debug, Clone)]
pub struct ShaderLoader {
    path: String
}

impl ShaderLoader {
    #[cfg_attr(feature = "trace", instrument)]
    pub fn new(file_path: String) -> Self {
        Self {
            path: file_path
        }
    }

    /// Fails only if the JSON can't be loaded. Compile and link problems end
    /// up in the program's diagnostics instead.
    #[cfg_attr(feature = "trace", instrument(skip(backend)))]
    pub fn load<'gl, B: ShaderBackend>(&self, backend: &'gl B) -> anyhow::Result<ShaderProgram<'gl, B>> {
        #[cfg(feature = "trace")]
        debug!("Loading Shader Program from file: {:?}", self.path);

        let json: ShaderJSON = load_deserializable_from_file(&self.path, SHADER_LOAD_ID)
            .map_err(|e| {
                #[cfg(feature = "trace")]
                error!("Failed to load Shader JSON from file: {:?}", self.path);

                DeserializeError {
                    source: e,
                    file_path: self.path.clone()
                }
            })?;

        Ok(ShaderProgram::new(backend, &json.vertex, &json.fragment))
    }
}

#[derive(Error, Debug)]
pub enum ShaderLoaderError {
    #[error("Failed to load deserializable from file: {file_path}")]
    DeserializeError {
        source: LoadError,
        file_path: String
    }
}
