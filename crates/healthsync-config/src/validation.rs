//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("{field}: timeout must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field}: invalid URL '{value}': {message}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("sync.cache_key_prefix: {0}")]
    InvalidKeyPrefix(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let timeouts = [
        ("sync.read_timeout_ms", config.sync.read_timeout_ms),
        ("remote.request_timeout_ms", config.remote.request_timeout_ms),
        ("connectivity.check_timeout_ms", config.connectivity.check_timeout_ms),
    ];
    for (field, value) in timeouts {
        if value == Some(0) {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if let Some(prefix) = &config.sync.cache_key_prefix
        && let Err(message) = validate_key_prefix(prefix)
    {
        errors.push(ValidationError::InvalidKeyPrefix(message));
    }

    let urls = [
        ("remote.base_url", config.remote.base_url.as_deref()),
        ("connectivity.check_url", config.connectivity.check_url.as_deref()),
    ];
    for (field, value) in urls {
        if let Some(url) = value
            && let Err(message) = validate_http_url(url)
        {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: url.to_string(),
                message,
            });
        }
    }

    errors
}

fn validate_key_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("prefix cannot be empty".into());
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(format!("prefix '{}' contains whitespace", prefix));
    }
    Ok(())
}

/// Check that a URL is http(s) with a non-empty host part
pub fn validate_http_url(url: &str) -> Result<(), String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| "scheme must be http or https".to_string())?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err("missing host".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(toml_str: &str) -> RawConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn accepts_defaults() {
        assert!(validate_config(&raw("config_version = 1")).is_empty());
    }

    #[test]
    fn rejects_zero_timeouts() {
        let config = raw(
            r#"
            config_version = 1
            [remote]
            request_timeout_ms = 0
            [connectivity]
            check_timeout_ms = 0
            "#,
        );

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::ZeroTimeout { .. })));
    }

    #[test]
    fn rejects_bad_urls() {
        let config = raw(
            r#"
            config_version = 1
            [remote]
            base_url = "ftp://files.example.com"
            [connectivity]
            check_url = "https://"
            "#,
        );

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            ValidationError::InvalidUrl { field: "remote.base_url", .. }
        ));
    }

    #[test]
    fn rejects_whitespace_prefix() {
        let config = raw(
            r#"
            config_version = 1
            [sync]
            cache_key_prefix = "my symptoms_"
            "#,
        );
        assert!(matches!(
            validate_config(&config).as_slice(),
            [ValidationError::InvalidKeyPrefix(_)]
        ));
    }

    #[test]
    fn http_url_checks() {
        assert!(validate_http_url("http://localhost:8080/api").is_ok());
        assert!(validate_http_url("https://api.example.com").is_ok());
        assert!(validate_http_url("api.example.com").is_err());
        assert!(validate_http_url("http:///path").is_err());
    }
}
