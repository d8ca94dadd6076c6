//! GL device layer.
//!
//! This module is responsible for:
//! - the narrow `GlApi` seam every GL call of the engine goes through
//! - resolving entry points for a current context (`NativeGl`)
//! - typed object names so buffers, arrays, shaders and programs cannot be mixed up

mod api;
mod native;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{Buffer, GlApi, Program, Shader, ShaderStage, UniformLocation, VertexArray};
pub use native::NativeGl;
