// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the cardinality estimators.

use serde::{Deserialize, Serialize};

use crate::error::{PdsError, PdsResult};

/// Widest supported Flajolet–Martin register.
pub const MAX_REGISTER_BITS: u32 = 64;

/// Sizing for [`FlajoletMartinCounter`](super::FlajoletMartinCounter) and
/// [`LinearCounter`](super::LinearCounter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardinalityConfig {
    /// Number of Flajolet–Martin registers used for stochastic averaging
    pub fm_registers: usize,

    /// Bits per Flajolet–Martin register
    pub fm_register_bits: u32,

    /// Size of the linear counter's bit array
    pub linear_bits: usize,
}

impl Default for CardinalityConfig {
    fn default() -> Self {
        Self {
            fm_registers: 1024,
            fm_register_bits: 32,
            linear_bits: 1 << 20,
        }
    }
}

impl CardinalityConfig {
    /// Check the Flajolet–Martin shape.
    pub fn validate_fm(&self) -> PdsResult<()> {
        validate_fm_shape(self.fm_registers, self.fm_register_bits)
    }

    /// Check the linear counter shape.
    pub fn validate_linear(&self) -> PdsResult<()> {
        if self.linear_bits == 0 {
            return Err(PdsError::InvalidConfiguration(
                "linear counter needs at least one bit".to_string(),
            ));
        }
        Ok(())
    }
}

pub(super) fn validate_fm_shape(register_count: usize, register_bits: u32) -> PdsResult<()> {
    if register_count == 0 {
        return Err(PdsError::InvalidConfiguration(
            "flajolet-martin counter needs at least one register".to_string(),
        ));
    }
    if register_bits == 0 || register_bits > MAX_REGISTER_BITS {
        return Err(PdsError::InvalidConfiguration(format!(
            "register bits must be in 1..={MAX_REGISTER_BITS}; got {register_bits}"
        )));
    }
    Ok(())
}
