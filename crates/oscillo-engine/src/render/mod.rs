//! GL rendering subsystem.
//!
//! Setup happens once per context: geometry is uploaded as static data and the
//! program is compiled, linked and validated before the first frame. After that
//! the only per-frame inputs are the model matrix and the draw itself.
//!
//! Convention:
//! - geometry is in normalized device coordinates, one `vec3` per vertex
//! - the model matrix is uploaded column-major to the `model` uniform

mod renderable;
mod shader;

pub use renderable::{Renderable, Vertex, MODEL_UNIFORM, TRIANGLE};
pub use shader::{ShaderSources, TRIANGLE_SHADERS};
