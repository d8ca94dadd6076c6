/// Requested OpenGL context version. Always a core, forward-compatible profile.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for GlVersion {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

/// Window/context configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Inner size in physical pixels.
    pub width: u32,
    pub height: u32,
    pub gl_version: GlVersion,
    /// Synchronize buffer swaps with the display refresh.
    pub vsync: bool,
    /// The viewport is configured once, so resizing is off by default.
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Test Window".to_string(),
            width: 800,
            height: 600,
            gl_version: GlVersion::default(),
            vsync: true,
            resizable: false,
        }
    }
}
