//! The native side of the shell.
//!
//! [`App`](super::App) only sequences calls into a [`Platform`]; the ash and
//! winit work lives in [`Vulkan`].

use super::{debug::Messenger, error::InitError, instance, EventSource, Window};
use crate::config::AppConfig;

pub trait Platform {
    type Window: EventSource;
    type Instance;
    type Messenger;

    fn open_window(&mut self, config: &AppConfig) -> Result<Self::Window, InitError>;

    fn create_instance(
        &mut self,
        window: &Self::Window,
        config: &AppConfig,
    ) -> Result<Self::Instance, InitError>;

    fn attach_messenger(&mut self, instance: &Self::Instance)
        -> Result<Self::Messenger, InitError>;

    /// Must not fail; teardown always runs to completion.
    fn detach_messenger(&mut self, instance: &Self::Instance, messenger: Self::Messenger);

    fn destroy_instance(&mut self, instance: Self::Instance);

    /// Destroys the window, then shuts the windowing library down.
    fn close_window(&mut self, window: Self::Window);
}

/// winit window plus a dynamically loaded Vulkan library.
#[derive(Default)]
pub struct Vulkan {
    entry: Option<ash::Entry>,
}

impl Platform for Vulkan {
    type Window = Window;
    type Instance = ash::Instance;
    type Messenger = Messenger;

    fn open_window(&mut self, config: &AppConfig) -> Result<Window, InitError> {
        Window::new(config.width, config.height, &config.name)
    }

    fn create_instance(
        &mut self,
        window: &Window,
        config: &AppConfig,
    ) -> Result<ash::Instance, InitError> {
        let entry = match self.entry.take() {
            Some(entry) => entry,
            None => unsafe { ash::Entry::load() }?,
        };
        let entry = self.entry.insert(entry);
        let window_extensions = window.required_extensions()?;
        instance::create_instance(entry, config, &window_extensions)
    }

    fn attach_messenger(&mut self, instance: &ash::Instance) -> Result<Messenger, InitError> {
        let entry = self.entry.as_ref().ok_or(InitError::MessengerUnavailable)?;
        Messenger::attach(entry, instance)
    }

    fn detach_messenger(&mut self, instance: &ash::Instance, messenger: Messenger) {
        if let Some(entry) = &self.entry {
            messenger.detach(entry, instance);
        }
    }

    fn destroy_instance(&mut self, instance: ash::Instance) {
        unsafe { instance.destroy_instance(None) };
    }

    fn close_window(&mut self, window: Window) {
        window.close();
    }
}
