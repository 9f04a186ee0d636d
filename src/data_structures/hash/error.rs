// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for hash creation.

/// Errors raised while handing out seeded hashes.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum HashError {
    /// More distinct seeds were requested than the seed type can represent.
    #[error("requested {requested} distinct seeds but the seed space holds only {available}")]
    SeedSpaceExhausted {
        /// Number of seeds requested
        requested: usize,
        /// Size of the seed space
        available: u128,
    },

    /// Rejection sampling hit its draw limit before finding enough distinct seeds.
    #[error("drew {draws} seeds but found only {generated} of {requested} distinct values")]
    SeedGenerationStalled {
        /// Number of seeds requested
        requested: usize,
        /// Distinct seeds found before giving up
        generated: usize,
        /// Random draws performed
        draws: usize,
    },
}

/// Result type for hash creation
pub type Result<T> = std::result::Result<T, HashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HashError::SeedSpaceExhausted {
            requested: 300,
            available: 256,
        };
        assert_eq!(
            err.to_string(),
            "requested 300 distinct seeds but the seed space holds only 256"
        );
    }
}
