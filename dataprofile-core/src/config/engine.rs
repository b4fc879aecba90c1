//! Caller-level engine settings and per-request requirements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Driver-level keyword options handed to the engine factory.
pub type ConnectArgs = BTreeMap<String, serde_json::Value>;

/// Defaults applied to every connection the engine layer opens.
///
/// # Example
/// ```rust
/// use dataprofile_core::EngineSettings;
/// use std::time::Duration;
///
/// let settings = EngineSettings::default();
/// assert_eq!(settings.connect_timeout, Duration::from_secs(3600));
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Connect timeout passed to the driver as `connect_timeout`
    pub connect_timeout: Duration,
    /// Trust the server certificate without verification (SQL Server)
    pub skip_certificate_verification: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3600),
            skip_certificate_verification: false,
        }
    }
}

impl EngineSettings {
    /// Validates settings.
    ///
    /// # Errors
    /// Returns error if the connect timeout is zero
    pub fn validate(&self) -> crate::Result<()> {
        if self.connect_timeout.as_secs() == 0 {
            return Err(crate::error::DataProfileError::configuration(
                "connect_timeout must be at least one second",
            ));
        }
        Ok(())
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to toggle certificate verification.
    pub fn with_skip_certificate_verification(mut self, skip: bool) -> Self {
        self.skip_certificate_verification = skip;
        self
    }

    /// Connect args every flavor starts from before its own are merged in.
    pub fn default_connect_args(&self) -> ConnectArgs {
        let mut args = ConnectArgs::new();
        args.insert(
            "connect_timeout".to_string(),
            serde_json::Value::from(self.connect_timeout.as_secs()),
        );
        args
    }
}

/// What the caller's workflow needs from the session being configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    /// The password was supplied for this call instead of the stored one
    pub password_overwritten: bool,
    /// The workflow scopes queries to `parameters.schema`
    pub require_schema_scope: bool,
    /// The workflow must go through the flavor's HTTP tunnel
    pub require_http_tunnel: bool,
}

impl ConnectionRequest {
    /// Builder method to mark the password as overwritten.
    pub fn with_password_overwritten(mut self, overwritten: bool) -> Self {
        self.password_overwritten = overwritten;
        self
    }

    /// Builder method to require schema scoping.
    pub fn with_schema_scope(mut self, required: bool) -> Self {
        self.require_schema_scope = required;
        self
    }

    /// Builder method to require the HTTP tunnel.
    pub fn with_http_tunnel(mut self, required: bool) -> Self {
        self.require_http_tunnel = required;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings_default() {
        let settings = EngineSettings::default();
        assert_eq!(settings.connect_timeout, Duration::from_secs(3600));
        assert!(!settings.skip_certificate_verification);
    }

    #[test]
    fn test_engine_settings_validation() {
        let settings = EngineSettings::default().with_connect_timeout(Duration::ZERO);
        assert!(settings.validate().is_err());

        let settings = EngineSettings::default().with_connect_timeout(Duration::from_secs(5));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_connect_args() {
        let args = EngineSettings::default().default_connect_args();
        assert_eq!(args.len(), 1);
        assert_eq!(args["connect_timeout"], serde_json::json!(3600));
    }

    #[test]
    fn test_connection_request_builder() {
        let request = ConnectionRequest::default()
            .with_schema_scope(true)
            .with_http_tunnel(true)
            .with_password_overwritten(true);

        assert!(request.require_schema_scope);
        assert!(request.require_http_tunnel);
        assert!(request.password_overwritten);
    }
}
