use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::device::{Buffer, GlApi, Program, UniformLocation, VertexArray};
use crate::error::{EngineError, ErrorKind, Result};

use super::shader::{self, ShaderSources, TRIANGLE_SHADERS};

/// Name of the model-matrix uniform in the vertex stage.
pub const MODEL_UNIFORM: &str = "model";

/// Attribute location of `pos` in the vertex stage.
const POSITION_LOCATION: u32 = 0;

// ── vertex ────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3], // NDC
}

impl Vertex {
    const COMPONENTS: i32 = 3;
    const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;
}

/// The demo triangle, before any transform.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex { position: [-1.0, -1.0, 0.0] },
    Vertex { position: [1.0, -1.0, 0.0] },
    Vertex { position: [0.0, 1.0, 0.0] },
];

// ── renderable ────────────────────────────────────────────────────────────

/// GPU-side geometry plus the program that draws it.
///
/// Owns one vertex array, one static vertex buffer and one linked program.
/// None of them can be modified after [`build`](Self::build); the only
/// operations are drawing with a model matrix and releasing the objects.
#[derive(Debug)]
pub struct Renderable {
    vertex_array: VertexArray,
    buffer: Buffer,
    program: Program,
    model_location: UniformLocation,
    vertex_count: i32,
}

impl Renderable {
    /// Builds the demo triangle with the triangle program.
    pub fn build<G: GlApi>(gl: &G) -> Result<Self> {
        Self::build_with(gl, &TRIANGLE, TRIANGLE_SHADERS)
    }

    /// Uploads `vertices` and builds a program from `sources`.
    ///
    /// Must run once, with the context current. Order:
    /// 1. vertex array + buffer, static upload, attribute 0 layout, unbind
    /// 2. compile + link
    /// 3. validate with the vertex array bound
    /// 4. resolve the `model` uniform
    pub fn build_with<G: GlApi>(
        gl: &G,
        vertices: &[Vertex],
        sources: ShaderSources<'_>,
    ) -> Result<Self> {
        let vertex_count = i32::try_from(vertices.len()).map_err(|_| {
            EngineError::new(ErrorKind::ResourceAllocation, "vertex count exceeds GLsizei")
        })?;

        let vertex_array = gl.create_vertex_array().ok_or_else(|| {
            EngineError::new(ErrorKind::ResourceAllocation, "glGenVertexArrays returned 0")
        })?;

        let Some(buffer) = gl.create_buffer() else {
            gl.delete_vertex_array(vertex_array);
            return Err(EngineError::new(ErrorKind::ResourceAllocation, "glGenBuffers returned 0"));
        };

        gl.bind_vertex_array(Some(vertex_array));
        gl.bind_array_buffer(Some(buffer));
        gl.array_buffer_static_data(bytemuck::cast_slice(vertices));
        gl.vertex_attrib_f32(POSITION_LOCATION, Vertex::COMPONENTS, Vertex::STRIDE, 0);
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        gl.bind_array_buffer(None);
        gl.bind_vertex_array(None);

        log::debug!("uploaded {vertex_count} vertices ({} bytes)", std::mem::size_of_val(vertices));

        let (program, model_location) = match link_and_resolve(gl, vertex_array, sources) {
            Ok(linked) => linked,
            Err(err) => {
                gl.delete_buffer(buffer);
                gl.delete_vertex_array(vertex_array);
                return Err(err);
            }
        };

        Ok(Self {
            vertex_array,
            buffer,
            program,
            model_location,
            vertex_count,
        })
    }

    /// Draws the geometry with `model` applied.
    ///
    /// Activates the program, uploads `model`, draws all vertices as triangles,
    /// then unbinds the vertex array and the program.
    pub fn draw<G: GlApi>(&self, gl: &G, model: &Mat4) {
        gl.use_program(Some(self.program));
        gl.uniform_matrix4(self.model_location, &model.to_cols_array());

        gl.bind_vertex_array(Some(self.vertex_array));
        gl.draw_triangles(0, self.vertex_count);
        gl.bind_vertex_array(None);

        gl.use_program(None);
    }

    /// Deletes the program, buffer and vertex array.
    pub fn release<G: GlApi>(self, gl: &G) {
        gl.delete_program(self.program);
        gl.delete_buffer(self.buffer);
        gl.delete_vertex_array(self.vertex_array);
        log::debug!("renderable released");
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }
}

fn link_and_resolve<G: GlApi>(
    gl: &G,
    vertex_array: VertexArray,
    sources: ShaderSources<'_>,
) -> Result<(Program, UniformLocation)> {
    let program = shader::link_program(gl, sources)?;

    // Core profiles validate against the bound vertex array.
    gl.bind_vertex_array(Some(vertex_array));
    let validated = shader::validate_program(gl, program);
    gl.bind_vertex_array(None);

    let resolved = validated.and_then(|()| {
        gl.uniform_location(program, MODEL_UNIFORM).ok_or_else(|| {
            EngineError::new(
                ErrorKind::ProgramLink,
                format!("uniform `{MODEL_UNIFORM}` is not active in the linked program"),
            )
        })
    });

    match resolved {
        Ok(location) => {
            log::debug!("uniform `{MODEL_UNIFORM}` at location {}", location.0);
            Ok((program, location))
        }
        Err(err) => {
            gl.delete_program(program);
            Err(err)
        }
    }
}
