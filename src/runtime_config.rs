//! Coroutine runtime configuration.
//!
//! `JSONSTEAD_STACK_SIZE` sets the stack size for handler coroutines, in
//! decimal (`16384`) or hexadecimal (`0x4000`). Default: 64 KB.

use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for handler coroutines in bytes.
    pub stack_size: usize,
}

const DEFAULT_STACK_SIZE: usize = 0x10000;

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = match env::var("JSONSTEAD_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
                } else {
                    val.parse().unwrap_or(DEFAULT_STACK_SIZE)
                }
            }
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }
}
