use std::ffi::{c_void, CStr, CString};
use std::marker::PhantomData;
use std::ptr;

use ::gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};

use crate::error::{EngineError, ErrorKind, Result};
use crate::paint::Color;

use super::api::{
    Buffer, GlApi, Program, Shader, ShaderStage, UniformLocation, VertexArray,
};

/// `GlApi` over the process-global function pointers of the `gl` crate.
///
/// A value of this type is proof that the entry points were resolved for the
/// context current on this thread. It is neither `Send` nor `Sync`: GL calls
/// must stay on the thread that owns the context.
pub struct NativeGl {
    _thread_bound: PhantomData<*const ()>,
}

impl NativeGl {
    /// Resolves GL entry points through `loader` and checks that the ones the
    /// engine depends on are present.
    ///
    /// The context the loader belongs to must be current on the calling thread.
    pub fn load<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        ::gl::load_with(loader);

        let required = [
            ("glViewport", ::gl::Viewport::is_loaded()),
            ("glGenVertexArrays", ::gl::GenVertexArrays::is_loaded()),
            ("glBufferData", ::gl::BufferData::is_loaded()),
            ("glCreateShader", ::gl::CreateShader::is_loaded()),
            ("glCreateProgram", ::gl::CreateProgram::is_loaded()),
            ("glValidateProgram", ::gl::ValidateProgram::is_loaded()),
            ("glUniformMatrix4fv", ::gl::UniformMatrix4fv::is_loaded()),
            ("glDrawArrays", ::gl::DrawArrays::is_loaded()),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, loaded)| !loaded)
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(EngineError::new(
                ErrorKind::ExtensionLoad,
                format!("unresolved entry points: {}", missing.join(", ")),
            ));
        }

        Ok(Self { _thread_bound: PhantomData })
    }

    /// `GL_VERSION` of the current context.
    pub fn version_string(&self) -> Option<String> {
        self.string(::gl::VERSION)
    }

    /// `GL_RENDERER` of the current context.
    pub fn renderer_string(&self) -> Option<String> {
        self.string(::gl::RENDERER)
    }

    fn string(&self, name: GLenum) -> Option<String> {
        // SAFETY: entry points are loaded; GetString returns a static NUL-terminated string or null.
        unsafe {
            let raw = ::gl::GetString(name);
            if raw.is_null() {
                None
            } else {
                Some(CStr::from_ptr(raw.cast()).to_string_lossy().into_owned())
            }
        }
    }
}

fn stage_enum(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => ::gl::VERTEX_SHADER,
        ShaderStage::Fragment => ::gl::FRAGMENT_SHADER,
    }
}

fn nonzero(name: GLuint) -> Option<GLuint> {
    (name != 0).then_some(name)
}

/// Reads an info log through `read(capacity, written_out, buf)`.
fn read_log(max_len: usize, read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    let mut buf = vec![0u8; max_len];
    let mut written: GLsizei = 0;
    let capacity = GLsizei::try_from(max_len).unwrap_or(GLsizei::MAX);
    read(capacity, &mut written as *mut GLsizei, buf.as_mut_ptr().cast());
    buf.truncate(usize::try_from(written).unwrap_or(0).min(max_len));
    String::from_utf8_lossy(&buf).into_owned()
}

// SAFETY (all methods): `NativeGl` only exists after a successful `load`, and the
// owning host keeps its context current on this thread for the value's lifetime.
impl GlApi for NativeGl {
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { ::gl::Viewport(x, y, width, height) }
    }

    fn clear_color_buffer(&self, color: Color) {
        unsafe {
            ::gl::ClearColor(color.r, color.g, color.b, color.a);
            ::gl::Clear(::gl::COLOR_BUFFER_BIT);
        }
    }

    fn create_vertex_array(&self) -> Option<VertexArray> {
        let mut name: GLuint = 0;
        unsafe { ::gl::GenVertexArrays(1, &mut name) };
        nonzero(name).map(VertexArray)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>) {
        unsafe { ::gl::BindVertexArray(vertex_array.map_or(0, |v| v.0)) }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArray) {
        unsafe { ::gl::DeleteVertexArrays(1, &vertex_array.0) }
    }

    fn create_buffer(&self) -> Option<Buffer> {
        let mut name: GLuint = 0;
        unsafe { ::gl::GenBuffers(1, &mut name) };
        nonzero(name).map(Buffer)
    }

    fn bind_array_buffer(&self, buffer: Option<Buffer>) {
        unsafe { ::gl::BindBuffer(::gl::ARRAY_BUFFER, buffer.map_or(0, |b| b.0)) }
    }

    fn array_buffer_static_data(&self, data: &[u8]) {
        unsafe {
            ::gl::BufferData(
                ::gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
                ::gl::STATIC_DRAW,
            )
        }
    }

    fn delete_buffer(&self, buffer: Buffer) {
        unsafe { ::gl::DeleteBuffers(1, &buffer.0) }
    }

    fn vertex_attrib_f32(&self, index: u32, components: i32, stride: i32, offset: usize) {
        // With a bound array buffer the pointer argument is a byte offset.
        unsafe {
            ::gl::VertexAttribPointer(
                index,
                components,
                ::gl::FLOAT,
                ::gl::FALSE,
                stride,
                ptr::null::<c_void>().wrapping_byte_add(offset),
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { ::gl::EnableVertexAttribArray(index) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Option<Shader> {
        nonzero(unsafe { ::gl::CreateShader(stage_enum(stage)) }).map(Shader)
    }

    fn shader_source(&self, shader: Shader, source: &str) {
        // Explicit length: the source does not need a NUL terminator.
        let text = source.as_ptr().cast::<GLchar>();
        let len = GLint::try_from(source.len()).unwrap_or(GLint::MAX);
        unsafe { ::gl::ShaderSource(shader.0, 1, &text, &len) }
    }

    fn compile_shader(&self, shader: Shader) {
        unsafe { ::gl::CompileShader(shader.0) }
    }

    fn shader_compile_status(&self, shader: Shader) -> bool {
        let mut status: GLint = 0;
        unsafe { ::gl::GetShaderiv(shader.0, ::gl::COMPILE_STATUS, &mut status) };
        status != 0
    }

    fn shader_info_log(&self, shader: Shader, max_len: usize) -> String {
        read_log(max_len, |cap, written, buf| unsafe {
            ::gl::GetShaderInfoLog(shader.0, cap, written, buf)
        })
    }

    fn delete_shader(&self, shader: Shader) {
        unsafe { ::gl::DeleteShader(shader.0) }
    }

    fn create_program(&self) -> Option<Program> {
        nonzero(unsafe { ::gl::CreateProgram() }).map(Program)
    }

    fn attach_shader(&self, program: Program, shader: Shader) {
        unsafe { ::gl::AttachShader(program.0, shader.0) }
    }

    fn detach_shader(&self, program: Program, shader: Shader) {
        unsafe { ::gl::DetachShader(program.0, shader.0) }
    }

    fn link_program(&self, program: Program) {
        unsafe { ::gl::LinkProgram(program.0) }
    }

    fn program_link_status(&self, program: Program) -> bool {
        let mut status: GLint = 0;
        unsafe { ::gl::GetProgramiv(program.0, ::gl::LINK_STATUS, &mut status) };
        status != 0
    }

    fn validate_program(&self, program: Program) {
        unsafe { ::gl::ValidateProgram(program.0) }
    }

    fn program_validate_status(&self, program: Program) -> bool {
        let mut status: GLint = 0;
        unsafe { ::gl::GetProgramiv(program.0, ::gl::VALIDATE_STATUS, &mut status) };
        status != 0
    }

    fn program_info_log(&self, program: Program, max_len: usize) -> String {
        read_log(max_len, |cap, written, buf| unsafe {
            ::gl::GetProgramInfoLog(program.0, cap, written, buf)
        })
    }

    fn delete_program(&self, program: Program) {
        unsafe { ::gl::DeleteProgram(program.0) }
    }

    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        let location = unsafe { ::gl::GetUniformLocation(program.0, name.as_ptr()) };
        (location >= 0).then_some(UniformLocation(location))
    }

    fn use_program(&self, program: Option<Program>) {
        unsafe { ::gl::UseProgram(program.map_or(0, |p| p.0)) }
    }

    fn uniform_matrix4(&self, location: UniformLocation, columns: &[f32; 16]) {
        unsafe { ::gl::UniformMatrix4fv(location.0, 1, ::gl::FALSE, columns.as_ptr()) }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { ::gl::DrawArrays(::gl::TRIANGLES, first, count) }
    }
}
