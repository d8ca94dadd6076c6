use crate::device::{GlApi, Program, Shader, ShaderStage};
use crate::error::{bounded_log, EngineError, ErrorKind, Result, MAX_DIAGNOSTIC_LEN};

/// GLSL sources for a vertex + fragment program.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// The triangle program: scales positions by 0.4 on x/y, applies `model`, fills red.
pub const TRIANGLE_SHADERS: ShaderSources<'static> = ShaderSources {
    vertex: include_str!("shaders/triangle.vert"),
    fragment: include_str!("shaders/triangle.frag"),
};

/// Compiles one stage.
///
/// On failure the shader object is deleted and the bounded info log is returned
/// in the error; nothing is attached anywhere.
pub(super) fn compile_stage<G: GlApi>(gl: &G, stage: ShaderStage, source: &str) -> Result<Shader> {
    let shader = gl.create_shader(stage).ok_or_else(|| {
        EngineError::new(ErrorKind::ResourceAllocation, format!("glCreateShader({stage}) returned 0"))
    })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let log = bounded_log(gl.shader_info_log(shader, MAX_DIAGNOSTIC_LEN));
        gl.delete_shader(shader);
        return Err(EngineError::new(ErrorKind::ShaderCompile(stage), log));
    }

    log::debug!("{stage} shader compiled");
    Ok(shader)
}

/// Compiles both stages, attaches them and links the program.
///
/// Stage objects are detached and deleted once the program is linked; every
/// object created so far is deleted on failure.
pub(super) fn link_program<G: GlApi>(gl: &G, sources: ShaderSources<'_>) -> Result<Program> {
    let program = gl.create_program().ok_or_else(|| {
        EngineError::new(ErrorKind::ResourceAllocation, "glCreateProgram returned 0")
    })?;

    let mut stages: Vec<Shader> = Vec::with_capacity(2);
    let result = attach_and_link(gl, program, sources, &mut stages);

    for shader in stages {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }

    match result {
        Ok(()) => Ok(program),
        Err(err) => {
            gl.delete_program(program);
            Err(err)
        }
    }
}

fn attach_and_link<G: GlApi>(
    gl: &G,
    program: Program,
    sources: ShaderSources<'_>,
    stages: &mut Vec<Shader>,
) -> Result<()> {
    for (stage, source) in [
        (ShaderStage::Vertex, sources.vertex),
        (ShaderStage::Fragment, sources.fragment),
    ] {
        let shader = compile_stage(gl, stage, source)?;
        gl.attach_shader(program, shader);
        stages.push(shader);
    }

    gl.link_program(program);
    if !gl.program_link_status(program) {
        let log = bounded_log(gl.program_info_log(program, MAX_DIAGNOSTIC_LEN));
        return Err(EngineError::new(ErrorKind::ProgramLink, log));
    }

    Ok(())
}

/// Validates a linked program against the current GL state.
///
/// Checks `VALIDATE_STATUS`; the link flag was already checked by [`link_program`].
pub(super) fn validate_program<G: GlApi>(gl: &G, program: Program) -> Result<()> {
    gl.validate_program(program);
    if !gl.program_validate_status(program) {
        let log = bounded_log(gl.program_info_log(program, MAX_DIAGNOSTIC_LEN));
        return Err(EngineError::new(ErrorKind::ProgramValidate, log));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::{Call, RecordingGl};

    const BROKEN: &str = "#version 330\nvoid mian() {";

    // ── compile_stage ─────────────────────────────────────────────────────

    #[test]
    fn invalid_source_is_reported_with_log() {
        let gl = RecordingGl::new();
        let err = compile_stage(&gl, ShaderStage::Vertex, BROKEN).unwrap_err();

        assert_eq!(err.kind, ErrorKind::ShaderCompile(ShaderStage::Vertex));
        assert!(err.message.contains("error"));
        assert_eq!(gl.count(|c| matches!(c, Call::DeleteShader(_))), 1);
    }

    #[test]
    fn valid_source_compiles() {
        let gl = RecordingGl::new();
        let shader = compile_stage(&gl, ShaderStage::Fragment, TRIANGLE_SHADERS.fragment).unwrap();
        assert!(gl.shader_compile_status(shader));
    }

    // ── link_program ──────────────────────────────────────────────────────

    #[test]
    fn broken_vertex_stage_attaches_nothing() {
        let gl = RecordingGl::new();
        let sources = ShaderSources { vertex: BROKEN, fragment: TRIANGLE_SHADERS.fragment };

        let err = link_program(&gl, sources).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ShaderCompile(ShaderStage::Vertex));
        assert_eq!(gl.count(|c| matches!(c, Call::Attach(..))), 0);
        assert_eq!(gl.count(|c| matches!(c, Call::Link(_))), 0);
        assert_eq!(gl.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
    }

    #[test]
    fn broken_fragment_stage_detaches_the_vertex_stage() {
        let gl = RecordingGl::new();
        let sources = ShaderSources { vertex: TRIANGLE_SHADERS.vertex, fragment: BROKEN };

        let err = link_program(&gl, sources).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ShaderCompile(ShaderStage::Fragment));

        let program = gl
            .calls()
            .iter()
            .find_map(|c| match c {
                Call::CreateProgram(p) => Some(*p),
                _ => None,
            })
            .unwrap();
        assert!(gl.attached_to(program).is_empty());
        // Only the vertex stage was ever attached.
        assert_eq!(gl.count(|c| matches!(c, Call::Attach(..))), 1);
        assert_eq!(gl.count(|c| matches!(c, Call::DeleteShader(_))), 2);
    }

    #[test]
    fn valid_pair_links_and_resolves_model_uniform() {
        let gl = RecordingGl::new();
        let program = link_program(&gl, TRIANGLE_SHADERS).unwrap();

        assert!(gl.program_link_status(program));
        let location = gl.uniform_location(program, "model").unwrap();
        assert!(location.0 >= 0);
    }

    #[test]
    fn linked_program_releases_stage_objects() {
        let gl = RecordingGl::new();
        let program = link_program(&gl, TRIANGLE_SHADERS).unwrap();

        assert!(gl.attached_to(program).is_empty());
        assert_eq!(gl.count(|c| matches!(c, Call::Detach(..))), 2);
        assert_eq!(gl.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert_eq!(gl.count(|c| matches!(c, Call::DeleteProgram(_))), 0);
    }

    #[test]
    fn link_failure_carries_program_log() {
        let gl = RecordingGl { fail_link: true, ..RecordingGl::new() };
        let err = link_program(&gl, TRIANGLE_SHADERS).unwrap_err();

        assert_eq!(err.kind, ErrorKind::ProgramLink);
        assert!(err.message.starts_with("program"));
        assert_eq!(gl.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
    }

    // ── validate_program ──────────────────────────────────────────────────

    #[test]
    fn validation_checks_validate_status_not_link_status() {
        // Link succeeds, validation fails: re-reading LINK_STATUS would pass here.
        let gl = RecordingGl { fail_validate: true, ..RecordingGl::new() };
        let program = link_program(&gl, TRIANGLE_SHADERS).unwrap();
        assert!(gl.program_link_status(program));

        let err = validate_program(&gl, program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProgramValidate);
    }

    #[test]
    fn validation_passes_for_linked_program() {
        let gl = RecordingGl::new();
        let program = link_program(&gl, TRIANGLE_SHADERS).unwrap();
        validate_program(&gl, program).unwrap();
        assert_eq!(gl.count(|c| matches!(c, Call::Validate(_))), 1);
    }
}
