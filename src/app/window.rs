use std::{ffi::CStr, time::Duration};

use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    raw_window_handle::HasDisplayHandle,
    window::WindowBuilder,
};

use super::error::InitError;

/// Something the run loop can poll until the user asks to quit.
pub trait EventSource {
    fn should_close(&self) -> bool;
    /// Drains whatever the window system has queued, without blocking.
    fn poll_events(&mut self);
}

/// A fixed-size native window together with the event loop that owns it.
///
/// Fields drop in declaration order: the window goes before the event loop,
/// which is the point where winit releases the platform connection. `close`
/// makes the same order explicit.
pub struct Window {
    window: winit::window::Window,
    event_loop: EventLoop<()>,
    close_requested: bool,
}

impl Window {
    pub fn new(width: u32, height: u32, name: &str) -> Result<Self, InitError> {
        let event_loop = EventLoop::new()?;
        // winit never binds a GL context, so only the resize hint is needed
        let window = WindowBuilder::new()
            .with_inner_size(PhysicalSize::new(width, height))
            .with_title(name)
            .with_resizable(false)
            .build(&event_loop)?;
        log::debug!("created {width}x{height} window {name:?}");

        Ok(Self {
            window,
            event_loop,
            close_requested: false,
        })
    }

    /// Destroys the native window, then shuts the event loop down.
    pub fn close(self) {
        let Self {
            window, event_loop, ..
        } = self;
        drop(window);
        drop(event_loop);
        log::debug!("window closed");
    }

    /// Instance extensions the window system needs to present to this window.
    pub fn required_extensions(&self) -> Result<Vec<&'static CStr>, InitError> {
        let names =
            ash_window::enumerate_required_extensions(self.window.display_handle()?.as_raw())
                .map_err(|result| InitError::Enumerate {
                    what: "window-system extensions",
                    result,
                })?;
        Ok(names
            .iter()
            .map(|ext| unsafe { CStr::from_ptr(*ext) })
            .collect())
    }
}

impl EventSource for Window {
    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn poll_events(&mut self) {
        let id = self.window.id();
        let close_requested = &mut self.close_requested;
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _| {
                if let Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    window_id,
                } = event
                {
                    if window_id == id {
                        *close_requested = true;
                    }
                }
            });
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with {code}");
            self.close_requested = true;
        }
    }
}
