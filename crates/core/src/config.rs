//! Engine configuration.

use crate::error::{Error, Result};
use crate::types::{DEFAULT_GRAVITY_DELAY_MS, DEFAULT_PREVIEW_AMOUNT};

/// Options recognised at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Initial gravity tick interval in milliseconds
    pub gravity_delay_ms: u32,
    /// Fixed length of the preview queue
    pub preview_amount: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity_delay_ms: DEFAULT_GRAVITY_DELAY_MS,
            preview_amount: DEFAULT_PREVIEW_AMOUNT,
        }
    }
}

impl EngineConfig {
    pub fn with_gravity_delay_ms(mut self, ms: u32) -> Self {
        self.gravity_delay_ms = ms;
        self
    }

    pub fn with_preview_amount(mut self, amount: usize) -> Self {
        self.preview_amount = amount;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.gravity_delay_ms == 0 {
            return Err(Error::InvalidGravityDelay);
        }
        Ok(())
    }
}
