//! Configuration validation.
//!
//! Serde handles syntax; this module checks values: bind addresses parse,
//! dependency URLs are absolute http(s) URLs, and durations and thresholds
//! are non-zero. Every problem is reported, not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::HealthGuardConfig;
use crate::upstream::DependencyName;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{section}.bind_address `{value}` is not a socket address")]
    InvalidBindAddress { section: &'static str, value: String },

    #[error("dependencies.{dependency}_url `{value}` is not an http(s) URL")]
    InvalidDependencyUrl {
        dependency: DependencyName,
        value: String,
    },

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("health_check.path `{0}` must start with '/'")]
    InvalidHealthPath(String),
}

pub fn validate_config(config: &HealthGuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let binds = [
        ("gateway", &config.gateway.bind_address),
        ("rag", &config.rag.bind_address),
        ("hospital", &config.hospital.bind_address),
        ("insurance", &config.insurance.bind_address),
    ];
    for (section, value) in binds {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress {
                section,
                value: value.clone(),
            });
        }
    }

    for dep in DependencyName::ALL {
        let value = config.dependencies.url_for(dep);
        let valid = Url::parse(value)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidDependencyUrl {
                dependency: dep,
                value: value.to_string(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let non_zero = [
        ("gateway.request_timeout_secs", config.gateway.request_timeout_secs),
        ("gateway.upstream_timeout_secs", config.gateway.upstream_timeout_secs),
        ("rag.request_timeout_secs", config.rag.request_timeout_secs),
        ("rag.query_timeout_secs", config.rag.query_timeout_secs),
        ("hospital.request_timeout_secs", config.hospital.request_timeout_secs),
        ("insurance.request_timeout_secs", config.insurance.request_timeout_secs),
        ("health_check.interval_secs", config.health_check.interval_secs),
        ("health_check.timeout_secs", config.health_check.timeout_secs),
        ("circuit_breaker.failure_threshold", config.circuit_breaker.failure_threshold as u64),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::InvalidHealthPath(config.health_check.path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
