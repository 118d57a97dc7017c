use std::ffi::{c_void, CStr};

use ash::vk;

use super::error::InitError;

/// Target of every record the debug callback emits.
pub const MESSAGE_TARGET: &str = "vk_bootstrap_app::validation";

const CREATE_MESSENGER: &CStr = c"vkCreateDebugUtilsMessengerEXT";
const DESTROY_MESSENGER: &CStr = c"vkDestroyDebugUtilsMessengerEXT";

/// Descriptor shared by the standalone messenger and the one chained into
/// instance creation.
pub fn messenger_info() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback))
}

pub fn severity_level(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> log::Level {
    match severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE => log::Level::Debug,
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => log::Level::Info,
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => log::Level::Warn,
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => log::Level::Error,
        _ => log::Level::Warn,
    }
}

unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data_ptr: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    let message = match callback_data_ptr.as_ref() {
        Some(data) if !data.p_message.is_null() => {
            CStr::from_ptr(data.p_message).to_string_lossy()
        }
        _ => "<no message>".into(),
    };
    // straight to the logger: the global max level must not drop these
    log::logger().log(
        &log::Record::builder()
            .level(severity_level(message_severity))
            .target(MESSAGE_TARGET)
            .args(format_args!(
                "validation layer: [{:?}] {}",
                message_type, message
            ))
            .build(),
    );

    // never abort the call that triggered the message
    vk::FALSE
}

unsafe fn entry_point_available(
    entry: &ash::Entry,
    instance: &ash::Instance,
    name: &CStr,
) -> bool {
    entry
        .get_instance_proc_addr(instance.handle(), name.as_ptr())
        .is_some()
}

/// A registered debug-utils messenger. Must be detached before the instance
/// it was attached to is destroyed.
pub struct Messenger {
    loader: ash::ext::debug_utils::Instance,
    handle: vk::DebugUtilsMessengerEXT,
}

impl Messenger {
    pub fn attach(entry: &ash::Entry, instance: &ash::Instance) -> Result<Self, InitError> {
        if !unsafe { entry_point_available(entry, instance, CREATE_MESSENGER) } {
            return Err(InitError::MessengerUnavailable);
        }

        let loader = ash::ext::debug_utils::Instance::new(entry, instance);
        let handle = unsafe { loader.create_debug_utils_messenger(&messenger_info(), None) }
            .map_err(InitError::MessengerCreation)?;
        log::debug!("debug messenger attached");

        Ok(Self { loader, handle })
    }

    /// Silently does nothing if the destroy entry point cannot be resolved.
    pub fn detach(self, entry: &ash::Entry, instance: &ash::Instance) {
        if !unsafe { entry_point_available(entry, instance, DESTROY_MESSENGER) } {
            log::warn!("vkDestroyDebugUtilsMessengerEXT unavailable, skipping detach");
            return;
        }
        unsafe { self.loader.destroy_debug_utils_messenger(self.handle, None) };
    }
}
