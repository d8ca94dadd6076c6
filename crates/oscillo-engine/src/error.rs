use std::fmt;

use crate::device::ShaderStage;

/// Upper bound on captured driver diagnostics (shader/program info logs).
pub const MAX_DIAGNOSTIC_LEN: usize = 1024;

/// Failure category.
///
/// Every kind maps to its own process exit status, see [`EngineError::exit_code`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// The windowing library (event loop) could not start.
    PlatformInit,
    /// The native window could not be created.
    WindowCreation,
    /// No GL context of the requested version/profile could be made current.
    ContextCreation,
    /// GL entry points could not be resolved for the current context.
    ExtensionLoad,
    /// The driver refused to allocate a buffer, vertex array, shader or program object.
    ResourceAllocation,
    /// A shader stage failed to compile.
    ShaderCompile(ShaderStage),
    /// The program failed to link.
    ProgramLink,
    /// The linked program failed validation against the draw state.
    ProgramValidate,
    /// Presenting the back buffer failed.
    Present,
}

impl ErrorKind {
    /// Non-zero process exit status for this kind.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::PlatformInit => 2,
            ErrorKind::WindowCreation => 3,
            ErrorKind::ContextCreation => 4,
            ErrorKind::ExtensionLoad => 5,
            ErrorKind::ResourceAllocation => 6,
            ErrorKind::ShaderCompile(ShaderStage::Vertex) => 7,
            ErrorKind::ShaderCompile(ShaderStage::Fragment) => 8,
            ErrorKind::ProgramLink => 9,
            ErrorKind::ProgramValidate => 10,
            ErrorKind::Present => 11,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::PlatformInit => f.write_str("platform initialization failed"),
            ErrorKind::WindowCreation => f.write_str("window creation failed"),
            ErrorKind::ContextCreation => f.write_str("GL context creation failed"),
            ErrorKind::ExtensionLoad => f.write_str("GL function loading failed"),
            ErrorKind::ResourceAllocation => f.write_str("GL object allocation failed"),
            ErrorKind::ShaderCompile(stage) => write!(f, "{stage} shader compilation failed"),
            ErrorKind::ProgramLink => f.write_str("shader program link failed"),
            ErrorKind::ProgramValidate => f.write_str("shader program validation failed"),
            ErrorKind::Present => f.write_str("buffer swap failed"),
        }
    }
}

/// Error raised by any setup or per-frame step of the engine.
///
/// `message` carries the captured diagnostic (driver info log, platform error text).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Wraps any displayable platform error.
    pub(crate) fn from_display(kind: ErrorKind, err: impl fmt::Display) -> Self {
        Self::new(kind, err.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.trim_end();
        if message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, message)
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Truncates a driver log to [`MAX_DIAGNOSTIC_LEN`] bytes on a char boundary.
pub(crate) fn bounded_log(mut log: String) -> String {
    if log.len() > MAX_DIAGNOSTIC_LEN {
        let mut end = MAX_DIAGNOSTIC_LEN;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}
