//! Core data models shared by the flavor layer.
//!
//! `Flavor` is the enumerated tag stored on every connection record and the
//! key the resolver maps to a connection strategy.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Supported database flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    PostgreSQL,
    MySQL,
    SQLite,
    Oracle,
    SqlServer,
    Databricks,
    Redshift,
    MongoDB,
    Snowflake,
}

impl Flavor {
    /// Every flavor tag, in display order.
    pub const fn all() -> [Self; 9] {
        [
            Self::PostgreSQL,
            Self::MySQL,
            Self::SQLite,
            Self::Oracle,
            Self::SqlServer,
            Self::Databricks,
            Self::Redshift,
            Self::MongoDB,
            Self::Snowflake,
        ]
    }

    /// Port used when a connection record leaves the port blank.
    ///
    /// SQLite is file based and has no port.
    pub const fn default_port(self) -> Option<u16> {
        match self {
            Self::PostgreSQL => Some(5432),
            Self::Redshift => Some(5439),
            Self::MySQL => Some(3306),
            Self::SqlServer => Some(1433),
            Self::Oracle => Some(1521),
            Self::Databricks | Self::Snowflake => Some(443),
            Self::MongoDB => Some(27017),
            Self::SQLite => None,
        }
    }

    /// Lowercase identifier used in CLI output and logs.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::PostgreSQL => "postgresql",
            Self::MySQL => "mysql",
            Self::SQLite => "sqlite",
            Self::Oracle => "oracle",
            Self::SqlServer => "mssql",
            Self::Databricks => "databricks",
            Self::Redshift => "redshift",
            Self::MongoDB => "mongodb",
            Self::Snowflake => "snowflake",
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PostgreSQL => write!(f, "PostgreSQL"),
            Self::MySQL => write!(f, "MySQL"),
            Self::SQLite => write!(f, "SQLite"),
            Self::Oracle => write!(f, "Oracle"),
            Self::SqlServer => write!(f, "SQL Server"),
            Self::Databricks => write!(f, "Databricks"),
            Self::Redshift => write!(f, "Redshift"),
            Self::MongoDB => write!(f, "MongoDB"),
            Self::Snowflake => write!(f, "Snowflake"),
        }
    }
}

impl FromStr for Flavor {
    type Err = crate::error::DataProfileError;

    /// Parses a flavor name case-insensitively, accepting common aliases.
    ///
    /// # Errors
    /// Returns a configuration error naming the value when it is not a known
    /// flavor.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();
        let flavor = match normalized.as_str() {
            "postgresql" | "postgres" => Self::PostgreSQL,
            "mysql" => Self::MySQL,
            "sqlite" | "sqlite3" => Self::SQLite,
            "oracle" => Self::Oracle,
            "sql server" | "sqlserver" | "sql_server" | "mssql" => Self::SqlServer,
            "databricks" => Self::Databricks,
            "redshift" => Self::Redshift,
            "mongodb" | "mongo" => Self::MongoDB,
            "snowflake" => Self::Snowflake,
            _ => {
                return Err(crate::error::DataProfileError::configuration(format!(
                    "Unsupported database flavor: '{}'",
                    name
                )));
            }
        };
        Ok(flavor)
    }
}

impl Serialize for Flavor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Flavor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Capabilities a connection flavor may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlavorFeature {
    /// Connection by a pre-built URL tail appended to the flavor's URL head
    UrlConnection,
    /// Post-connect statement scoping the session to a schema
    SchemaScoping,
    /// HTTP-tunneled sessions addressed by an `http_path`
    HttpTunnel,
    /// Private-key authentication
    KeyAuthentication,
    /// DNS SRV topology discovery instead of an explicit port
    SrvDiscovery,
    /// Speaks SQL, so dialect settings such as the concat operator apply
    SqlDialect,
}

impl FlavorFeature {
    /// Every capability, in display order.
    pub const fn all() -> [Self; 6] {
        [
            Self::UrlConnection,
            Self::SchemaScoping,
            Self::HttpTunnel,
            Self::KeyAuthentication,
            Self::SrvDiscovery,
            Self::SqlDialect,
        ]
    }
}

impl std::fmt::Display for FlavorFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UrlConnection => "URL connection",
            Self::SchemaScoping => "schema scoping",
            Self::HttpTunnel => "HTTP tunnel",
            Self::KeyAuthentication => "key authentication",
            Self::SrvDiscovery => "SRV discovery",
            Self::SqlDialect => "SQL dialect",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_parse_is_case_insensitive() {
        for name in ["PostgreSQL", "postgresql", "POSTGRESQL", "  postgres "] {
            assert_eq!(name.parse::<Flavor>().unwrap(), Flavor::PostgreSQL);
        }
        for name in ["SQL Server", "sqlserver", "MSSQL", "sql_server"] {
            assert_eq!(name.parse::<Flavor>().unwrap(), Flavor::SqlServer);
        }
    }

    #[test]
    fn test_flavor_parse_unknown_names_value() {
        let err = "Foo".parse::<Flavor>().unwrap_err();
        assert!(err.to_string().contains("'Foo'"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for flavor in Flavor::all() {
            assert_eq!(flavor.to_string().parse::<Flavor>().unwrap(), flavor);
            assert_eq!(flavor.slug().parse::<Flavor>().unwrap(), flavor);
        }
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(Flavor::PostgreSQL.default_port(), Some(5432));
        assert_eq!(Flavor::Redshift.default_port(), Some(5439));
        assert_eq!(Flavor::SqlServer.default_port(), Some(1433));
        assert_eq!(Flavor::SQLite.default_port(), None);
    }

    #[test]
    fn test_flavor_serde() {
        let json = serde_json::to_string(&Flavor::SqlServer).unwrap();
        assert_eq!(json, "\"SQL Server\"");

        let flavor: Flavor = serde_json::from_str("\"redshift\"").unwrap();
        assert_eq!(flavor, Flavor::Redshift);

        assert!(serde_json::from_str::<Flavor>("\"db2\"").is_err());
    }
}
