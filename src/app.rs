use crate::config::AppConfig;

mod debug;
pub mod error;
pub mod instance;
pub mod platform;
mod window;

pub use debug::MESSAGE_TARGET;
use error::InitError;
use platform::{Platform, Vulkan};
pub use window::{EventSource, Window};

/// Window, Vulkan instance and optional debug messenger, acquired in that
/// order and released in reverse.
///
/// The handles are only `None` while `Drop` is releasing them.
pub struct App<P: Platform = Vulkan> {
    platform: P,
    instance: Option<P::Instance>,
    debug_messenger: Option<P::Messenger>,
    frame_hook: Box<dyn FnMut()>,
    window: Option<P::Window>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, InitError> {
        Self::with_platform(Vulkan::default(), config)
    }
}

impl<P: Platform> App<P> {
    pub fn with_platform(mut platform: P, config: AppConfig) -> Result<Self, InitError> {
        config.app_name()?;

        let window = platform.open_window(&config)?;
        let instance = match platform.create_instance(&window, &config) {
            Ok(instance) => instance,
            Err(err) => {
                platform.close_window(window);
                return Err(err);
            }
        };

        let debug_messenger = if config.validation.enabled {
            match platform.attach_messenger(&instance) {
                Ok(messenger) => Some(messenger),
                Err(err) => {
                    platform.destroy_instance(instance);
                    platform.close_window(window);
                    return Err(err);
                }
            }
        } else {
            None
        };

        Ok(Self {
            platform,
            instance: Some(instance),
            debug_messenger,
            frame_hook: Box::new(|| {}),
            window: Some(window),
        })
    }

    /// Installs the callback invoked once per loop iteration, after events
    /// have been pumped.
    pub fn on_frame(mut self, hook: impl FnMut() + 'static) -> Self {
        self.frame_hook = Box::new(hook);
        self
    }

    /// Blocks until the window is closed.
    pub fn run(&mut self) {
        log::info!("app run");
        if let Some(window) = self.window.as_mut() {
            let frames = drive(window, &mut self.frame_hook);
            log::info!("window closed after {frames} frame(s)");
        }
    }
}

/// Polls `source` and calls `frame` until the close flag is observed.
/// Returns the number of iterations.
pub fn drive<S: EventSource + ?Sized>(source: &mut S, mut frame: impl FnMut()) -> u64 {
    let mut frames = 0;
    while !source.should_close() {
        source.poll_events();
        frame();
        frames += 1;
    }
    frames
}

impl<P: Platform> Drop for App<P> {
    fn drop(&mut self) {
        log::info!("Cleaning up ...");
        if let Some(instance) = self.instance.take() {
            if let Some(messenger) = self.debug_messenger.take() {
                self.platform.detach_messenger(&instance, messenger);
            }
            self.platform.destroy_instance(instance);
        }
        if let Some(window) = self.window.take() {
            self.platform.close_window(window);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use ash::vk;

    use super::*;

    struct Scripted {
        close_after: usize,
        polls: Rc<Cell<usize>>,
    }

    impl EventSource for Scripted {
        fn should_close(&self) -> bool {
            self.polls.get() >= self.close_after
        }

        fn poll_events(&mut self) {
            self.polls.set(self.polls.get() + 1);
        }
    }

    fn scripted(close_after: usize) -> (Scripted, Rc<Cell<usize>>) {
        let polls = Rc::new(Cell::new(0));
        let source = Scripted {
            close_after,
            polls: polls.clone(),
        };
        (source, polls)
    }

    #[test]
    fn returns_once_close_flag_is_set() {
        let (mut source, polls) = scripted(3);
        let mut hooked = 0;
        let frames = drive(&mut source, || hooked += 1);

        assert_eq!(frames, 3);
        assert_eq!(hooked, 3);
        assert_eq!(polls.get(), 3);
    }

    #[test]
    fn already_closed_runs_nothing() {
        let (mut source, polls) = scripted(0);
        let frames = drive(&mut source, || panic!("hook must not run"));

        assert_eq!(frames, 0);
        assert_eq!(polls.get(), 0);
    }

    #[test]
    fn each_frame_follows_a_poll() {
        let (mut source, polls) = scripted(5);
        let mut seen = Vec::new();
        drive(&mut source, || seen.push(polls.get()));

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn boxed_hook_drives_like_a_closure() {
        let (mut source, _) = scripted(2);
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let mut hook: Box<dyn FnMut()> = Box::new(move || counter.set(counter.get() + 1));

        drive(&mut source, &mut hook);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn trait_object_source() {
        let (source, polls) = scripted(1);
        let mut boxed: Box<dyn EventSource> = Box::new(source);
        assert_eq!(drive(boxed.as_mut(), || {}), 1);
        assert_eq!(polls.get(), 1);
    }

    #[derive(Default)]
    struct Journal {
        steps: RefCell<Vec<&'static str>>,
        live_instances: Cell<i32>,
        live_windows: Cell<i32>,
    }

    impl Journal {
        fn record(&self, step: &'static str) {
            self.steps.borrow_mut().push(step);
        }

        fn steps(&self) -> Vec<&'static str> {
            self.steps.borrow().clone()
        }
    }

    /// Stands in for ash/winit and writes every call into a shared journal.
    struct Recording {
        journal: Rc<Journal>,
        close_after: usize,
        missing_layer: bool,
        attach_fails: bool,
    }

    struct FakeInstance;
    struct FakeMessenger;

    impl Platform for Recording {
        type Window = Scripted;
        type Instance = FakeInstance;
        type Messenger = FakeMessenger;

        fn open_window(&mut self, _config: &AppConfig) -> Result<Scripted, InitError> {
            self.journal.record("open window");
            self.journal.live_windows.set(self.journal.live_windows.get() + 1);
            Ok(scripted(self.close_after).0)
        }

        fn create_instance(
            &mut self,
            _window: &Scripted,
            _config: &AppConfig,
        ) -> Result<FakeInstance, InitError> {
            if self.missing_layer {
                return Err(InitError::MissingLayer {
                    layer: "VK_LAYER_LUNARG_standard_validation".into(),
                });
            }
            self.journal.record("create instance");
            self.journal
                .live_instances
                .set(self.journal.live_instances.get() + 1);
            Ok(FakeInstance)
        }

        fn attach_messenger(&mut self, _: &FakeInstance) -> Result<FakeMessenger, InitError> {
            if self.attach_fails {
                return Err(InitError::MessengerCreation(
                    vk::Result::ERROR_EXTENSION_NOT_PRESENT,
                ));
            }
            self.journal.record("attach messenger");
            Ok(FakeMessenger)
        }

        fn detach_messenger(&mut self, _: &FakeInstance, _: FakeMessenger) {
            self.journal.record("detach messenger");
        }

        fn destroy_instance(&mut self, _: FakeInstance) {
            self.journal.record("destroy instance");
            self.journal
                .live_instances
                .set(self.journal.live_instances.get() - 1);
        }

        fn close_window(&mut self, _: Scripted) {
            self.journal.record("destroy window");
            self.journal.record("shut down event loop");
            self.journal.live_windows.set(self.journal.live_windows.get() - 1);
        }
    }

    fn recording() -> (Recording, Rc<Journal>) {
        let journal = Rc::new(Journal::default());
        let platform = Recording {
            journal: journal.clone(),
            close_after: 1,
            missing_layer: false,
            attach_fails: false,
        };
        (platform, journal)
    }

    fn debug_config() -> AppConfig {
        AppConfig::default()
            .with_validation(true)
            .with_layers(["VK_LAYER_LUNARG_standard_validation"])
            .unwrap()
    }

    #[test]
    fn immediate_drop_releases_in_reverse_order() {
        let (platform, journal) = recording();
        let app = App::with_platform(platform, debug_config()).unwrap();
        drop(app);

        assert_eq!(
            journal.steps(),
            vec![
                "open window",
                "create instance",
                "attach messenger",
                "detach messenger",
                "destroy instance",
                "destroy window",
                "shut down event loop",
            ]
        );
        assert_eq!(journal.live_instances.get(), 0);
        assert_eq!(journal.live_windows.get(), 0);
    }

    #[test]
    fn release_build_never_touches_the_messenger() {
        let (platform, journal) = recording();
        let config = AppConfig::default().with_validation(false);
        drop(App::with_platform(platform, config).unwrap());

        assert_eq!(
            journal.steps(),
            vec![
                "open window",
                "create instance",
                "destroy instance",
                "destroy window",
                "shut down event loop",
            ]
        );
    }

    #[test]
    fn attach_failure_leaves_no_instance_alive() {
        let (mut platform, journal) = recording();
        platform.attach_fails = true;
        let result = App::with_platform(platform, debug_config());

        assert!(matches!(result, Err(InitError::MessengerCreation(_))));
        assert_eq!(journal.live_instances.get(), 0);
        assert_eq!(journal.live_windows.get(), 0);
        assert_eq!(
            journal.steps(),
            vec![
                "open window",
                "create instance",
                "destroy instance",
                "destroy window",
                "shut down event loop",
            ]
        );
    }

    #[test]
    fn missing_layer_fails_before_any_instance() {
        let (mut platform, journal) = recording();
        platform.missing_layer = true;
        let result = App::with_platform(platform, debug_config());

        assert!(matches!(result, Err(InitError::MissingLayer { .. })));
        assert!(!journal.steps().contains(&"create instance"));
        assert!(!journal.steps().contains(&"destroy instance"));
        assert_eq!(journal.live_windows.get(), 0);
    }

    #[test]
    fn bad_name_fails_before_the_window_opens() {
        let (platform, journal) = recording();
        let config = AppConfig::default().with_name("nul\0name");
        let result = App::with_platform(platform, config);

        assert!(matches!(result, Err(InitError::Config(_))));
        assert!(journal.steps().is_empty());
    }

    #[test]
    fn run_calls_the_hook_until_close_then_tears_down() {
        let (mut platform, journal) = recording();
        platform.close_after = 3;
        let frames = Rc::new(Cell::new(0));
        let counter = frames.clone();
        let mut app = App::with_platform(platform, debug_config())
            .unwrap()
            .on_frame(move || counter.set(counter.get() + 1));

        app.run();
        assert_eq!(frames.get(), 3);

        drop(app);
        assert_eq!(journal.steps().last(), Some(&"shut down event loop"));
        assert_eq!(journal.live_instances.get(), 0);
    }
}
