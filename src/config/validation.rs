//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: OperatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::OperatorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("watch.resync_secs must be greater than zero")]
    ZeroResync,

    #[error("annotations.config_key and annotations.managed_key must differ")]
    SameAnnotationKeys,

    #[error("{field} is not a socket address: {value}")]
    BadAddress { field: &'static str, value: String },
}

pub fn validate_config(config: &OperatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.watch.namespace.trim().is_empty() {
        errors.push(ValidationError::Empty("watch.namespace"));
    }
    if config.watch.resync_secs == 0 {
        errors.push(ValidationError::ZeroResync);
    }

    let annotations = &config.annotations;
    if annotations.config_key.trim().is_empty() {
        errors.push(ValidationError::Empty("annotations.config_key"));
    }
    if annotations.managed_key.trim().is_empty() {
        errors.push(ValidationError::Empty("annotations.managed_key"));
    }
    if !annotations.config_key.is_empty() && annotations.config_key == annotations.managed_key {
        errors.push(ValidationError::SameAnnotationKeys);
    }

    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }
    if config.admin.enabled {
        check_address("admin.bind_address", &config.admin.bind_address, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress { field, value: value.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&OperatorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = OperatorConfig::default();
        config.watch.resync_secs = 0;
        config.annotations.managed_key = config.annotations.config_key.clone();
        config.admin.bind_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroResync));
        assert!(errors.contains(&ValidationError::SameAnnotationKeys));
    }

    #[test]
    fn test_disabled_addresses_not_checked() {
        let mut config = OperatorConfig::default();
        config.admin.enabled = false;
        config.admin.bind_address = String::new();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = String::new();
        assert!(validate_config(&config).is_ok());
    }
}
