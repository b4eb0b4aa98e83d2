//! Custom validation functions for configuration.

use std::net::SocketAddr;

use validator::ValidationError;

/// Validate that a bind address parses as `ip:port`.
pub fn validate_bind_addr(addr: &str) -> Result<(), ValidationError> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_bind_addr"))
}

/// Validate that a route is absolute and contains only path-safe characters.
pub fn validate_route(path: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^/[A-Za-z0-9_\\-/]*$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(path) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_route"))
    }
}

/// Validate log level.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
