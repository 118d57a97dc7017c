//! Window and Vulkan instance bootstrap.
//!
//! [`App`] opens a fixed-size window, creates a Vulkan instance with the
//! extensions the window system needs and, when validation is enabled,
//! requests validation layers and routes their messages into `log`.

pub mod app;
pub mod config;

pub use app::{error::InitError, App};
pub use config::{AppConfig, ValidationConfig};
