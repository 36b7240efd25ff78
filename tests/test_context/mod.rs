use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use flycam_gl::graphics::backend::{ShaderBackend, ShaderStage, UniformValue};

/// A stand-in graphics context. Stages "compile" when their source has a
/// `main` function and balanced delimiters; programs "link" when they have
/// one compiled vertex and one compiled fragment stage. Every call is
/// recorded so tests can count them.
#[derive(Debug, Default)]
pub struct FakeContext {
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<u32, FakeShader>>,
    programs: RefCell<HashMap<u32, FakeProgram>>,
    pub calls: RefCell<Vec<String>>,
    pub location_queries: RefCell<Vec<String>>,
    pub uploads: RefCell<Vec<(Option<i32>, UniformValue)>>,
    pub active_program: Cell<Option<u32>>,
    pub deleted_programs: RefCell<Vec<u32>>,
    pub deleted_shaders: RefCell<Vec<u32>>,
    pub fail_program_creation: Cell<bool>
}

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    uniforms: Vec<String>
}

impl FakeContext {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Self::default()
        }
    }

    pub fn called(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn live_shader_count(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_program_count(&self) -> usize {
        self.programs.borrow().len()
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get().max(1);
        self.next_id.set(id + 1);
        id
    }
}

fn is_well_formed(source: &str) -> bool {
    let mut depth: Vec<char> = Vec::new();
    for c in source.chars() {
        match c {
            '(' | '{' | '[' => depth.push(c),
            ')' => if depth.pop() != Some('(') { return false },
            '}' => if depth.pop() != Some('{') { return false },
            ']' => if depth.pop() != Some('[') { return false },
            _ => {}
        }
    }

    depth.is_empty() && source.contains("void main")
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.split_whitespace().nth(2))
        .map(|name| name.trim_end_matches(';').to_string())
        .collect()
}

impl ShaderBackend for FakeContext {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = i32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        self.record("create_shader");
        let id = self.allocate();
        self.shaders.borrow_mut().insert(id, FakeShader {
            stage,
            source: String::new(),
            compiled: false
        });
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.record("shader_source");
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.record("compile_shader");
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            s.compiled = is_well_formed(&s.source);
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.shaders.borrow().get(&shader).map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        match self.shaders.borrow().get(&shader) {
            Some(s) if s.source.is_empty() => String::from("ERROR: 0:1: '' : empty source"),
            Some(s) if !s.compiled => format!("ERROR: 0:1: syntax error in {} stage", s.stage),
            _ => String::new()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record("delete_shader");
        self.shaders.borrow_mut().remove(&shader);
        self.deleted_shaders.borrow_mut().push(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        self.record("create_program");
        if self.fail_program_creation.get() {
            return Err(String::from("out of memory"))
        }

        let id = self.allocate();
        self.programs.borrow_mut().insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record("attach_shader");
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record("detach_shader");
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: u32) {
        self.record("link_program");
        let shaders = self.shaders.borrow();
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            let stages: HashSet<ShaderStage> = p.attached.iter()
                .filter_map(|id| shaders.get(id))
                .filter(|s| s.compiled)
                .map(|s| s.stage)
                .collect();

            p.linked = stages.contains(&ShaderStage::Vertex) && stages.contains(&ShaderStage::Fragment);
            p.uniforms = p.attached.iter()
                .filter_map(|id| shaders.get(id))
                .flat_map(|s| declared_uniforms(&s.source))
                .collect();
        }
    }

    fn validate_program(&self, _program: u32) {
        self.record("validate_program");
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.programs.borrow().get(&program).map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        match self.programs.borrow().get(&program) {
            Some(p) if !p.linked => String::from("error: missing vertex or fragment stage"),
            _ => String::new()
        }
    }

    fn delete_program(&self, program: u32) {
        self.record("delete_program");
        self.programs.borrow_mut().remove(&program);
        self.deleted_programs.borrow_mut().push(program);
    }

    fn use_program(&self, program: Option<u32>) {
        self.record("use_program");
        self.active_program.set(program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        self.location_queries.borrow_mut().push(name.to_string());
        self.programs.borrow().get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map(|index| index as i32)
    }

    fn upload_uniform(&self, location: Option<&i32>, value: &UniformValue) {
        self.uploads.borrow_mut().push((location.copied(), *value));
    }
}
