//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a batch size is invalid (must be greater than 0).
    #[error("batch size must be greater than 0")]
    InvalidBatchSize,

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The configuration document could not be parsed.
    #[error("malformed configuration document")]
    Malformed(#[from] serde_json::Error),
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates a batch size.
    fn validate_batch_size(&self, batch_size: usize) -> Result<(), ConfigError> {
        if batch_size == 0 {
            Err(ConfigError::InvalidBatchSize)
        } else {
            Ok(())
        }
    }

    /// Validates that a size-like value lies in `min..=max`.
    fn validate_size_range(
        &self,
        value: u32,
        min: u32,
        max: u32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if value < min || value > max {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must be between {} and {}, got {}",
                    field_name, min, max, value
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a float is finite and not negative.
    fn validate_non_negative(&self, value: f64, field_name: &str) -> Result<(), ConfigError> {
        if !value.is_finite() || value < 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be a non-negative number, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl ConfigValidator for Dummy {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Dummy
        }
    }

    #[test]
    fn test_default_validators() {
        let d = Dummy::get_defaults();
        assert!(d.validate().is_ok());
        assert!(matches!(
            d.validate_batch_size(0),
            Err(ConfigError::InvalidBatchSize)
        ));
        assert!(d.validate_size_range(28, 8, 256, "canonical_size").is_ok());
        assert!(d.validate_size_range(4, 8, 256, "canonical_size").is_err());
        assert!(d.validate_non_negative(-1.0, "min_area").is_err());
        assert!(d.validate_non_negative(f64::NAN, "min_area").is_err());
        assert!(d.validate_non_negative(0.0, "min_area").is_ok());
    }
}
