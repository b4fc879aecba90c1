//! Connection parameter record.
//!
//! A `ConnectionParameters` value is built once per connection test or
//! profiling invocation from a persisted connection record. The core reads it
//! but never mutates or stores it.

use crate::{
    Result,
    error::DataProfileError,
    models::Flavor,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Port value as it arrives from upstream records.
///
/// Request schemas carry ports as integers while persisted records keep them
/// as fixed-width strings (`"05432"`). Both normalize to a `u16`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// Integer port
    Number(i64),
    /// String-encoded port, surrounding whitespace and leading zeros allowed
    Text(String),
}

impl PortValue {
    /// Normalizes the value to a TCP port.
    ///
    /// # Errors
    /// Returns a configuration error unless the value is an integer in
    /// `1..=65535`.
    pub fn normalize(&self) -> Result<u16> {
        let number = match self {
            Self::Number(n) => *n,
            Self::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                DataProfileError::configuration(format!("port '{}' is not an integer", text))
            })?,
        };

        u16::try_from(number)
            .ok()
            .filter(|port| *port > 0)
            .ok_or_else(|| {
                DataProfileError::configuration(format!(
                    "port {} is out of range (1-65535)",
                    number
                ))
            })
    }
}

impl From<u16> for PortValue {
    fn from(port: u16) -> Self {
        Self::Number(i64::from(port))
    }
}

impl From<&str> for PortValue {
    fn from(port: &str) -> Self {
        Self::Text(port.to_string())
    }
}

/// Connection record describing how to reach a target database.
///
/// # Security
/// The password and private key material are held in `Zeroizing` containers,
/// skipped on serialization, and omitted from `Debug` and `Display`.
///
/// # Example
/// ```rust
/// use dataprofile_core::{ConnectionParameters, Flavor};
///
/// let params = ConnectionParameters::new(Flavor::PostgreSQL)
///     .with_host("db.internal")
///     .with_port(5432)
///     .with_username("profiler")
///     .with_password("s3cret")
///     .with_database("warehouse");
///
/// assert!(params.validate().is_ok());
/// assert!(!format!("{:?}", params).contains("s3cret"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionParameters {
    /// Flavor tag recorded with the connection
    pub flavor: Flavor,
    /// Database host; not needed in URL mode or for SQLite
    #[serde(default)]
    pub host: Option<String>,
    /// Port as stored upstream; the flavor default applies when absent
    #[serde(default)]
    pub port: Option<PortValue>,
    /// Login name
    #[serde(default)]
    pub username: Option<String>,
    /// Plaintext password (decrypted before it reaches the core)
    #[serde(default, skip_serializing)]
    pub password: Zeroizing<String>,
    /// Catalog or database name
    #[serde(default)]
    pub database: Option<String>,
    /// Schema used by flavors that scope the session after connecting
    #[serde(default)]
    pub schema: Option<String>,
    /// Build the connection string from `url` instead of the discrete fields
    #[serde(default)]
    pub connect_by_url: bool,
    /// URL tail appended to the flavor's head in URL mode
    #[serde(default)]
    pub url: Option<String>,
    /// Authenticate with a private key instead of a password
    #[serde(default)]
    pub connect_by_key: bool,
    /// Private key material
    #[serde(default, skip_serializing)]
    pub private_key: Option<Zeroizing<String>>,
    /// Passphrase protecting `private_key`
    #[serde(default, skip_serializing)]
    pub private_key_passphrase: Option<Zeroizing<String>>,
    /// HTTP path for tunneled flavors such as Databricks
    #[serde(default)]
    pub http_path: Option<String>,
    /// Login name that replaces `username` for this invocation only
    #[serde(default)]
    pub user_override: Option<String>,
}

impl std::fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("flavor", &self.flavor)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"****")
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("connect_by_url", &self.connect_by_url)
            .field("url", &self.url.as_ref().map(|_| "<url>"))
            .field("connect_by_key", &self.connect_by_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "****"))
            .field("http_path", &self.http_path)
            .field("user_override", &self.user_override)
            .finish()
    }
}

impl std::fmt::Display for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.connect_by_url {
            return write!(f, "ConnectionParameters({} via url)", self.flavor);
        }
        write!(
            f,
            "ConnectionParameters({} {}{}{})",
            self.flavor,
            self.host.as_deref().unwrap_or("<no host>"),
            self.port
                .as_ref()
                .and_then(|p| p.normalize().ok())
                .map_or_else(String::new, |p| format!(":{}", p)),
            self.database
                .as_ref()
                .map_or_else(String::new, |db| format!("/{}", db))
        )
        // Username and credentials are never included
    }
}

impl ConnectionParameters {
    /// Creates an empty record for the given flavor.
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            host: None,
            port: None,
            username: None,
            password: Zeroizing::new(String::new()),
            database: None,
            schema: None,
            connect_by_url: false,
            url: None,
            connect_by_key: false,
            private_key: None,
            private_key_passphrase: None,
            http_path: None,
            user_override: None,
        }
    }

    /// Validates the parts of the record that do not depend on the flavor.
    ///
    /// # Errors
    /// Returns a configuration error when URL mode is requested without a
    /// URL or when the port is not a valid TCP port.
    pub fn validate(&self) -> Result<()> {
        if self.connect_by_url && self.url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            return Err(DataProfileError::configuration(
                "connect_by_url is set but no url was provided",
            ));
        }

        if let Some(port) = &self.port {
            port.normalize()?;
        }

        if self.connect_by_key && self.private_key.is_none() {
            return Err(DataProfileError::configuration(
                "connect_by_key is set but no private key was provided",
            ));
        }

        Ok(())
    }

    /// Resolves the effective port, falling back to the flavor default.
    ///
    /// # Errors
    /// Returns a configuration error when a port is present but invalid.
    pub fn effective_port(&self, flavor: Flavor) -> Result<Option<u16>> {
        match &self.port {
            Some(port) => port.normalize().map(Some),
            None => Ok(flavor.default_port()),
        }
    }

    /// Login name after applying `user_override`.
    pub fn effective_username(&self) -> Option<&str> {
        self.user_override
            .as_deref()
            .or(self.username.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Builder method to set host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Builder method to set port.
    pub fn with_port(mut self, port: impl Into<PortValue>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Builder method to set username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Builder method to set the plaintext password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(password.into());
        self
    }

    /// Builder method to set database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Builder method to set schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Builder method to set the HTTP path.
    pub fn with_http_path(mut self, http_path: impl Into<String>) -> Self {
        self.http_path = Some(http_path.into());
        self
    }

    /// Switches the record to URL mode with the given URL tail.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.connect_by_url = true;
        self
    }

    /// Switches the record to key authentication.
    pub fn with_private_key(
        mut self,
        private_key: impl Into<String>,
        passphrase: Option<String>,
    ) -> Self {
        self.private_key = Some(Zeroizing::new(private_key.into()));
        self.private_key_passphrase = passphrase.map(Zeroizing::new);
        self.connect_by_key = true;
        self
    }

    /// Builder method to override the login name.
    pub fn with_user_override(mut self, username: impl Into<String>) -> Self {
        self.user_override = Some(username.into());
        self
    }
}
