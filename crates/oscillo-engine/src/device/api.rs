use std::fmt;

use crate::paint::Color;

/// Pipeline stage of a shader object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Vertex buffer object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Buffer(pub u32);

/// Vertex array object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexArray(pub u32);

/// Shader object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Shader(pub u32);

/// Program object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Program(pub u32);

/// Resolved uniform location. Always non-negative.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub i32);

/// The subset of the OpenGL 3.3 core API the engine issues.
///
/// All calls act on the context current on the calling thread. Object
/// creators return `None` when the driver hands back the reserved name `0`.
///
/// Implemented by [`NativeGl`](super::NativeGl) for real contexts.
pub trait GlApi {
    // ── state ─────────────────────────────────────────────────────────────

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color_buffer(&self, color: Color);

    // ── geometry ──────────────────────────────────────────────────────────

    fn create_vertex_array(&self) -> Option<VertexArray>;
    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>);
    fn delete_vertex_array(&self, vertex_array: VertexArray);

    fn create_buffer(&self) -> Option<Buffer>;
    fn bind_array_buffer(&self, buffer: Option<Buffer>);
    /// Uploads `data` to the bound array buffer with `STATIC_DRAW` usage.
    fn array_buffer_static_data(&self, data: &[u8]);
    fn delete_buffer(&self, buffer: Buffer);

    /// Describes float attribute `index` of the bound array buffer, unnormalized.
    fn vertex_attrib_f32(&self, index: u32, components: i32, stride: i32, offset: usize);
    fn enable_vertex_attrib_array(&self, index: u32);

    // ── shaders ───────────────────────────────────────────────────────────

    fn create_shader(&self, stage: ShaderStage) -> Option<Shader>;
    fn shader_source(&self, shader: Shader, source: &str);
    fn compile_shader(&self, shader: Shader);
    fn shader_compile_status(&self, shader: Shader) -> bool;
    /// Returns at most `max_len` bytes of the shader info log.
    fn shader_info_log(&self, shader: Shader, max_len: usize) -> String;
    fn delete_shader(&self, shader: Shader);

    // ── programs ──────────────────────────────────────────────────────────

    fn create_program(&self) -> Option<Program>;
    fn attach_shader(&self, program: Program, shader: Shader);
    fn detach_shader(&self, program: Program, shader: Shader);
    fn link_program(&self, program: Program);
    fn program_link_status(&self, program: Program) -> bool;
    fn validate_program(&self, program: Program);
    fn program_validate_status(&self, program: Program) -> bool;
    /// Returns at most `max_len` bytes of the program info log.
    fn program_info_log(&self, program: Program, max_len: usize) -> String;
    fn delete_program(&self, program: Program);

    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation>;
    fn use_program(&self, program: Option<Program>);
    /// Uploads a column-major 4×4 matrix to `location` of the active program.
    fn uniform_matrix4(&self, location: UniformLocation, columns: &[f32; 16]);

    // ── draw ──────────────────────────────────────────────────────────────

    fn draw_triangles(&self, first: i32, count: i32);
}
