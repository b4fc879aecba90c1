//! SQL Server flavor.
//!
//! Connections go through the ODBC Driver 18. Azure Synapse pools do not
//! support multi-statement transactions, so hosts containing `synapse` get
//! `autocommit=True` appended to the connection string.

use super::{BoundTarget, FlavorService};
use crate::{
    Result,
    config::ConnectArgs,
    models::FlavorFeature,
    security::encode_password,
};

const SCHEME: &str = "mssql+driver";
const ODBC_DRIVER_QUERY: &str = "?driver=ODBC+Driver+18+for+SQL+Server";
const AUTOCOMMIT_QUERY: &str = "&autocommit=True";

/// Strategy for SQL Server and Azure Synapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlServerFlavor {
    target: BoundTarget,
    trust_server_certificate: bool,
}

impl SqlServerFlavor {
    /// Wraps a target bound for SQL Server.
    ///
    /// `trust_server_certificate` adds `TrustServerCertificate=yes` to the
    /// connect args.
    pub const fn new(target: BoundTarget, trust_server_certificate: bool) -> Self {
        Self {
            target,
            trust_server_certificate,
        }
    }

    /// Whether the host is an Azure Synapse endpoint.
    pub fn is_synapse(&self) -> bool {
        self.target
            .host
            .as_deref()
            .is_some_and(|host| host.to_ascii_lowercase().contains("synapse"))
    }
}

impl FlavorService for SqlServerFlavor {
    fn target(&self) -> &BoundTarget {
        &self.target
    }

    fn supports_feature(&self, feature: FlavorFeature) -> bool {
        matches!(
            feature,
            FlavorFeature::UrlConnection | FlavorFeature::SqlDialect
        )
    }

    fn connection_string_head(&self, password: &str) -> String {
        format!(
            "{}://{}:{}@",
            SCHEME,
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
            "{}://{}:{}@{}:{}/{}{}",
            SCHEME,
            self.target.require_encoded_username()?,
            encode_password(password),
            self.target.require_host()?,
            self.target.require_port()?,
            self.target.require_database()?,
            ODBC_DRIVER_QUERY
        );

        if self.is_synapse() {
            connection.push_str(AUTOCOMMIT_QUERY);
        }

        Ok(connection)
    }

    fn pre_connection_statements(&self) -> Vec<String> {
        vec![
            "SET ANSI_DEFAULTS ON;".to_string(),
            "SET TRANSACTION ISOLATION LEVEL READ UNCOMMITTED;".to_string(),
        ]
    }

    fn connect_args(&self, _password_overwritten: bool) -> ConnectArgs {
        let mut args = ConnectArgs::new();
        if self.trust_server_certificate {
            args.insert(
                "TrustServerCertificate".to_string(),
                serde_json::Value::from("yes"),
            );
        }
        args
    }

    fn concat_operator(&self) -> &'static str {
        "+"
    }
}
