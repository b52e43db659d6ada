//! Target configuration from the process environment.
//!
//! | Variable             | Required | Default |
//! |----------------------|----------|---------|
//! | `MACOS_HOST`         | yes      |         |
//! | `MACOS_PORT`         | no       | `5900`  |
//! | `MACOS_USERNAME`     | no       |         |
//! | `MACOS_PASSWORD`     | yes      |         |
//! | `MACOS_VNC_TIMEOUT`  | no       | `8.0`   |
//!
//! Variables are read on every call, so a changed environment takes effect
//! on the next tool invocation.

use remote_macos_core::{ConfigError, Target};

use crate::application::remote_control::TargetProvider;

/// Reads the target from `std::env` on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvTargetProvider;

impl TargetProvider for EnvTargetProvider {
    fn target(&self) -> Result<Target, ConfigError> {
        Target::from_lookup(|name| std::env::var(name).ok())
    }
}
