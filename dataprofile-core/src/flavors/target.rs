//! Fields a flavor binds from a connection record.

use crate::{
    Result,
    config::ConnectionParameters,
    error::DataProfileError,
    models::Flavor,
    security::encode_username,
};

/// Immutable, normalized view of a `ConnectionParameters` record.
///
/// Empty strings are treated as absent and the port is resolved to a `u16`
/// (falling back to the flavor default). The password is not part of the
/// binding; it is handed to each string-building call instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTarget {
    /// Flavor this target was bound for
    pub flavor: Flavor,
    /// Effective login name (after `user_override`)
    pub username: Option<String>,
    /// Database host
    pub host: Option<String>,
    /// Normalized port
    pub port: Option<u16>,
    /// Catalog or database name
    pub database: Option<String>,
    /// Session schema
    pub schema: Option<String>,
    /// HTTP path for tunneled flavors
    pub http_path: Option<String>,
    /// URL tail; `Some` only in URL mode
    pub url: Option<String>,
    /// Key authentication was requested
    pub connect_by_key: bool,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl BoundTarget {
    /// Binds and normalizes the record for `flavor`.
    ///
    /// # Errors
    /// Returns a configuration error when the record fails
    /// [`ConnectionParameters::validate`].
    pub fn bind(flavor: Flavor, params: &ConnectionParameters) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            flavor,
            username: params.effective_username().map(str::to_string),
            host: non_empty(params.host.as_ref()),
            port: params.effective_port(flavor)?,
            database: non_empty(params.database.as_ref()),
            schema: non_empty(params.schema.as_ref()),
            http_path: non_empty(params.http_path.as_ref()),
            url: if params.connect_by_url {
                non_empty(params.url.as_ref())
            } else {
                None
            },
            connect_by_key: params.connect_by_key,
        })
    }

    /// Whether the connection string is built from `url`.
    pub const fn connects_by_url(&self) -> bool {
        self.url.is_some()
    }

    /// Host, or a configuration error naming the flavor.
    pub fn require_host(&self) -> Result<&str> {
        self.host
            .as_deref()
            .ok_or_else(|| DataProfileError::missing_field("host", self.flavor))
    }

    /// Port, or a configuration error naming the flavor.
    pub fn require_port(&self) -> Result<u16> {
        self.port
            .ok_or_else(|| DataProfileError::missing_field("port", self.flavor))
    }

    /// Login name, or a configuration error naming the flavor.
    pub fn require_username(&self) -> Result<&str> {
        self.username
            .as_deref()
            .ok_or_else(|| DataProfileError::missing_field("username", self.flavor))
    }

    /// Database name, or a configuration error naming the flavor.
    pub fn require_database(&self) -> Result<&str> {
        self.database
            .as_deref()
            .ok_or_else(|| DataProfileError::missing_field("database", self.flavor))
    }

    /// Login name for URL heads, empty when absent.
    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    /// Percent-encoded login name for the userinfo segment.
    ///
    /// # Errors
    /// Returns a configuration error when no username is bound.
    pub fn require_encoded_username(&self) -> Result<String> {
        self.require_username().map(encode_username)
    }

    /// Percent-encoded login name for URL heads, empty when absent.
    pub fn encoded_username_or_empty(&self) -> String {
        encode_username(self.username_or_empty())
    }
}
