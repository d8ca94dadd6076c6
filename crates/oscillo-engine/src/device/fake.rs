//! Recording `GlApi` used by unit tests. No context required.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::paint::Color;

use super::api::{
    Buffer, GlApi, Program, Shader, ShaderStage, UniformLocation, VertexArray,
};

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Viewport(i32, i32, i32, i32),
    Clear(Color),
    CreateVertexArray(VertexArray),
    BindVertexArray(Option<VertexArray>),
    DeleteVertexArray(VertexArray),
    CreateBuffer(Buffer),
    BindArrayBuffer(Option<Buffer>),
    BufferData(Vec<u8>),
    DeleteBuffer(Buffer),
    VertexAttrib { index: u32, components: i32, stride: i32, offset: usize },
    EnableVertexAttrib(u32),
    CreateShader(ShaderStage, Shader),
    CompileShader(Shader),
    DeleteShader(Shader),
    CreateProgram(Program),
    Attach(Program, Shader),
    Detach(Program, Shader),
    Link(Program),
    Validate(Program),
    DeleteProgram(Program),
    UseProgram(Option<Program>),
    UniformMatrix4(UniformLocation, [f32; 16]),
    DrawTriangles(i32, i32),
    // Host-side events, recorded by fake hosts to check ordering against GL calls.
    HostPump,
    HostPresent,
}

/// Marker a shader source must contain to "compile" in the fake driver.
pub(crate) const VALID_MARKER: &str = "void main";

/// Recording GL driver.
///
/// Shaders compile when their source contains [`VALID_MARKER`]; programs
/// link when a vertex and a fragment stage are attached. Individual steps can
/// be forced to fail through the public flags.
#[derive(Default)]
pub(crate) struct RecordingGl {
    pub calls: RefCell<Vec<Call>>,
    pub fail_link: bool,
    pub fail_validate: bool,
    pub refuse_buffers: bool,
    /// Uniforms the fake linker reports as active.
    pub uniforms: Vec<&'static str>,

    // Fake driver object state.
    pub next_name: Cell<u32>,
    pub sources: RefCell<Vec<(Shader, ShaderStage, String)>>,
    pub compiled: RefCell<HashSet<Shader>>,
    pub attached: RefCell<Vec<(Program, Shader)>>,
    pub linked: RefCell<HashSet<Program>>,
    pub validated: RefCell<HashSet<Program>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self { uniforms: vec!["model"], ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Shaders currently attached to `program`.
    pub fn attached_to(&self, program: Program) -> Vec<Shader> {
        self.attached
            .borrow()
            .iter()
            .filter(|(p, _)| *p == program)
            .map(|(_, s)| *s)
            .collect()
    }

    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn name(&self) -> u32 {
        let n = self.next_name.get() + 1;
        self.next_name.set(n);
        n
    }

    fn stage_of(&self, shader: Shader) -> Option<ShaderStage> {
        self.sources
            .borrow()
            .iter()
            .find(|(s, _, _)| *s == shader)
            .map(|(_, stage, _)| *stage)
    }
}

impl GlApi for RecordingGl {
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color_buffer(&self, color: Color) {
        self.record(Call::Clear(color));
    }

    fn create_vertex_array(&self) -> Option<VertexArray> {
        if self.refuse_buffers {
            return None;
        }
        let vao = VertexArray(self.name());
        self.record(Call::CreateVertexArray(vao));
        Some(vao)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: VertexArray) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Option<Buffer> {
        if self.refuse_buffers {
            return None;
        }
        let buffer = Buffer(self.name());
        self.record(Call::CreateBuffer(buffer));
        Some(buffer)
    }

    fn bind_array_buffer(&self, buffer: Option<Buffer>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn array_buffer_static_data(&self, data: &[u8]) {
        self.record(Call::BufferData(data.to_vec()));
    }

    fn delete_buffer(&self, buffer: Buffer) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn vertex_attrib_f32(&self, index: u32, components: i32, stride: i32, offset: usize) {
        self.record(Call::VertexAttrib { index, components, stride, offset });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttrib(index));
    }

    fn create_shader(&self, stage: ShaderStage) -> Option<Shader> {
        let shader = Shader(self.name());
        self.sources.borrow_mut().push((shader, stage, String::new()));
        self.record(Call::CreateShader(stage, shader));
        Some(shader)
    }

    fn shader_source(&self, shader: Shader, source: &str) {
        if let Some(entry) = self.sources.borrow_mut().iter_mut().find(|(s, _, _)| *s == shader) {
            entry.2 = source.to_string();
        }
    }

    fn compile_shader(&self, shader: Shader) {
        self.record(Call::CompileShader(shader));
        let ok = self
            .sources
            .borrow()
            .iter()
            .any(|(s, _, src)| *s == shader && src.contains(VALID_MARKER));
        if ok {
            self.compiled.borrow_mut().insert(shader);
        }
    }

    fn shader_compile_status(&self, shader: Shader) -> bool {
        self.compiled.borrow().contains(&shader)
    }

    fn shader_info_log(&self, shader: Shader, max_len: usize) -> String {
        let mut log = format!("0:1(1): error: shader {} has no entry point\n", shader.0);
        log.truncate(max_len);
        log
    }

    fn delete_shader(&self, shader: Shader) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Option<Program> {
        let program = Program(self.name());
        self.record(Call::CreateProgram(program));
        Some(program)
    }

    fn attach_shader(&self, program: Program, shader: Shader) {
        self.attached.borrow_mut().push((program, shader));
        self.record(Call::Attach(program, shader));
    }

    fn detach_shader(&self, program: Program, shader: Shader) {
        self.attached.borrow_mut().retain(|entry| *entry != (program, shader));
        self.record(Call::Detach(program, shader));
    }

    fn link_program(&self, program: Program) {
        self.record(Call::Link(program));
        let stages: Vec<ShaderStage> = self
            .attached_to(program)
            .into_iter()
            .filter_map(|s| self.stage_of(s))
            .collect();
        let complete = stages.contains(&ShaderStage::Vertex) && stages.contains(&ShaderStage::Fragment);
        if complete && !self.fail_link {
            self.linked.borrow_mut().insert(program);
        }
    }

    fn program_link_status(&self, program: Program) -> bool {
        self.linked.borrow().contains(&program)
    }

    fn validate_program(&self, program: Program) {
        self.record(Call::Validate(program));
        if self.linked.borrow().contains(&program) && !self.fail_validate {
            self.validated.borrow_mut().insert(program);
        }
    }

    fn program_validate_status(&self, program: Program) -> bool {
        self.validated.borrow().contains(&program)
    }

    fn program_info_log(&self, program: Program, max_len: usize) -> String {
        let mut log = format!("program {} failed\n", program.0);
        log.truncate(max_len);
        log
    }

    fn delete_program(&self, program: Program) {
        self.record(Call::DeleteProgram(program));
    }

    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        if !self.linked.borrow().contains(&program) {
            return None;
        }
        self.uniforms
            .iter()
            .position(|u| *u == name)
            .map(|i| UniformLocation(i as i32))
    }

    fn use_program(&self, program: Option<Program>) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_matrix4(&self, location: UniformLocation, columns: &[f32; 16]) {
        self.record(Call::UniformMatrix4(location, *columns));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangles(first, count));
    }
}
