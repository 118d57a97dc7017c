use ash::vk;
use thiserror::Error;

/// Fatal conditions that stop the shell from coming up.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to start the window event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("window handle unavailable: {0}")]
    Handle(#[from] winit::raw_window_handle::HandleError),

    #[error("failed to load the Vulkan library: {0}")]
    Loader(#[from] ash::LoadingError),

    #[error("failed to enumerate {what}: {result}")]
    Enumerate {
        what: &'static str,
        result: vk::Result,
    },

    #[error("Layer not found: {layer}")]
    MissingLayer { layer: String },

    #[error("Fail create instance: {0}")]
    InstanceCreation(vk::Result),

    #[error("Fail set debug messenger: vkCreateDebugUtilsMessengerEXT is not available")]
    MessengerUnavailable,

    #[error("Fail set debug messenger: {0}")]
    MessengerCreation(vk::Result),
}
