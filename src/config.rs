use std::ffi::{CStr, CString};

use crate::app::error::InitError;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_NAME: &str = "Vulkan";
/// Requested when validation is on. Hosts with an SDK older than 1.1.106
/// only ship the `VK_LAYER_LUNARG_standard_validation` meta-layer and fail
/// this check; request that one through [`AppConfig::with_layers`] there.
pub const DEFAULT_LAYERS: [&CStr; 1] = [c"VK_LAYER_KHRONOS_validation"];

/// Everything the shell needs to know before it touches the window system.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    pub name: String,
    pub validation: ValidationConfig,
}

/// Whether validation layers and the debug messenger are engaged, and which
/// layers get requested when they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub layers: Vec<CString>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            layers: DEFAULT_LAYERS.iter().map(|l| (*l).to_owned()).collect(),
        }
    }
}

impl ValidationConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn layer_names(&self) -> Vec<&CStr> {
        self.layers.iter().map(CString::as_c_str).collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            name: DEFAULT_NAME.to_owned(),
            validation: ValidationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation.enabled = enabled;
        self
    }

    /// Replaces the requested layer list. Names containing a NUL byte are
    /// rejected.
    pub fn with_layers<I, S>(mut self, layers: I) -> Result<Self, InitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        self.validation.layers = layers
            .into_iter()
            .map(|l| CString::new(l).map_err(|e| InitError::Config(e.to_string())))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// The application name as handed to the Vulkan application descriptor.
    pub fn app_name(&self) -> Result<CString, InitError> {
        CString::new(self.name.as_str()).map_err(|_| {
            InitError::Config(format!(
                "application name {:?} contains a NUL byte",
                self.name
            ))
        })
    }
}
