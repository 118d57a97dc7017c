//! Extension and validation-layer negotiation, and instance creation.
//!
//! The negotiation itself is pure: it only looks at name lists. The host is
//! queried by the thin wrappers at the bottom, which feed the results in.

use std::ffi::{c_char, CStr, CString};

use ash::vk;

use super::{debug, error::InitError};
use crate::config::{AppConfig, ValidationConfig};

pub const APP_VERSION: u32 = vk::make_api_version(0, 1, 0, 0);
pub const ENGINE_NAME: &CStr = c"Default Engine";
pub const ENGINE_VERSION: u32 = vk::make_api_version(0, 1, 0, 0);

/// The window-system extensions, plus `VK_EXT_debug_utils` when diagnostics
/// are on.
pub fn required_extensions<'a>(
    window_extensions: &[&'a CStr],
    diagnostics: bool,
) -> Vec<&'a CStr> {
    let mut names = window_extensions.to_vec();
    if diagnostics {
        names.push(ash::ext::debug_utils::NAME);
    }

    log::info!("Required Extensions:");
    for name in &names {
        log::info!("\t{}", name.to_string_lossy());
    }
    names
}

/// First requested layer that the host does not report, compared byte for
/// byte.
pub fn first_missing_layer<'a>(
    requested: &[&'a CStr],
    available: &[&CStr],
) -> Option<&'a CStr> {
    requested
        .iter()
        .find(|layer| !available.iter().any(|a| *a == **layer))
        .copied()
}

pub fn check_validation_layers(requested: &[&CStr], available: &[&CStr]) -> bool {
    log_layers(requested, available);
    first_missing_layer(requested, available).is_none()
}

fn log_layers(requested: &[&CStr], available: &[&CStr]) {
    log::debug!("Available Validation Layers:");
    for layer in available {
        log::debug!("\t{}", layer.to_string_lossy());
    }
    log::info!("Requested Validation Layers:");
    for layer in requested {
        log::info!("\t{}", layer.to_string_lossy());
    }
}

/// The name lists that go into `vk::InstanceCreateInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePlan<'a> {
    pub extensions: Vec<&'a CStr>,
    pub layers: Vec<&'a CStr>,
    pub diagnostics: bool,
}

impl<'a> InstancePlan<'a> {
    /// Fails with [`InitError::MissingLayer`] when validation is enabled and a
    /// requested layer is absent. Nothing has been created at that point.
    pub fn negotiate(
        validation: &'a ValidationConfig,
        window_extensions: &[&'a CStr],
        available_layers: &[&CStr],
    ) -> Result<Self, InitError> {
        let extensions = required_extensions(window_extensions, validation.enabled);

        let layers = if validation.enabled {
            let requested = validation.layer_names();
            log_layers(&requested, available_layers);
            if let Some(missing) = first_missing_layer(&requested, available_layers) {
                return Err(InitError::MissingLayer {
                    layer: missing.to_string_lossy().into_owned(),
                });
            }
            requested
        } else {
            Vec::new()
        };

        Ok(Self {
            extensions,
            layers,
            diagnostics: validation.enabled,
        })
    }

    fn extension_ptrs(&self) -> Vec<*const c_char> {
        self.extensions.iter().map(|name| name.as_ptr()).collect()
    }

    fn layer_ptrs(&self) -> Vec<*const c_char> {
        self.layers.iter().map(|name| name.as_ptr()).collect()
    }
}

pub fn available_layers(entry: &ash::Entry) -> Result<Vec<CString>, InitError> {
    let properties = unsafe { entry.enumerate_instance_layer_properties() }.map_err(|result| {
        InitError::Enumerate {
            what: "instance layers",
            result,
        }
    })?;
    Ok(properties
        .iter()
        .filter_map(|p| p.layer_name_as_c_str().ok().map(CStr::to_owned))
        .collect())
}

pub fn create_instance(
    entry: &ash::Entry,
    config: &AppConfig,
    window_extensions: &[&CStr],
) -> Result<ash::Instance, InitError> {
    // the host is only asked about layers when we are going to request some
    let available = if config.validation.enabled {
        available_layers(entry)?
    } else {
        Vec::new()
    };
    let available: Vec<&CStr> = available.iter().map(CString::as_c_str).collect();
    let plan = InstancePlan::negotiate(&config.validation, window_extensions, &available)?;

    let app_name = config.app_name()?;
    let app_info = vk::ApplicationInfo::default()
        .application_name(&app_name)
        .application_version(APP_VERSION)
        .engine_name(ENGINE_NAME)
        .engine_version(ENGINE_VERSION)
        .api_version(vk::API_VERSION_1_0);

    let extension_names = plan.extension_ptrs();
    let layer_names = plan.layer_ptrs();
    // chained so messages raised by vkCreateInstance itself are reported
    let mut debug_info = debug::messenger_info();
    let mut instance_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_extension_names(&extension_names)
        .enabled_layer_names(&layer_names);
    if plan.diagnostics {
        instance_info = instance_info.push_next(&mut debug_info);
    }

    let instance = unsafe { entry.create_instance(&instance_info, None) }
        .map_err(InitError::InstanceCreation)?;
    log::info!(
        "created instance with {} extension(s) and {} layer(s)",
        plan.extensions.len(),
        plan.layers.len()
    );
    Ok(instance)
}
