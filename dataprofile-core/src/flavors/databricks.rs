//! Databricks flavor.
//!
//! SQL warehouses are reached over HTTPS; the warehouse is addressed by an
//! `http_path` query parameter appended when the record carries one.

use super::{BoundTarget, FlavorService};
use crate::{Result, models::FlavorFeature, security::encode_password};

/// Strategy for Databricks SQL warehouses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabricksFlavor {
    target: BoundTarget,
}

impl DatabricksFlavor {
    /// Wraps a target bound for Databricks.
    pub const fn new(target: BoundTarget) -> Self {
        Self { target }
    }

    fn scheme(&self) -> &'static str {
        self.target.flavor.slug()
    }
}

impl FlavorService for DatabricksFlavor {
    fn target(&self) -> &BoundTarget {
        &self.target
    }

    fn supports_feature(&self, feature: FlavorFeature) -> bool {
        matches!(
            feature,
            FlavorFeature::UrlConnection | FlavorFeature::HttpTunnel | FlavorFeature::SqlDialect
        )
    }

    fn connection_string_head(&self, password: &str) -> String {
        format!(
            "{}://{}:{}@",
            self.scheme(),
            self.target.encoded_username_or_empty(),
            encode_password(password)
        )
    }

    fn connection_string_from_fields(
        &self,
        password: &str,
        _password_overwritten: bool,
    ) -> Result<String> {
        let mut connection = format!(
            "{}://{}:{}@{}:{}/{}",
            self.scheme(),
            self.target.require_encoded_username()?,
            encode_password(password),
            self.target.require_host()?,
            self.target.require_port()?,
            self.target.require_database()?
        );

        if let Some(http_path) = &self.target.http_path {
            connection.push_str("?http_path=");
            connection.push_str(http_path);
        }

        Ok(connection)
    }
}
