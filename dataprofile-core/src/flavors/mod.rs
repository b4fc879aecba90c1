//! Connection flavors: one strategy per supported database engine.
//!
//! Every flavor turns a bound connection record into the four things the
//! engine layer needs: a driver connection string, ordered pre-connection
//! statements, driver connect args, and the SQL concatenation operator.
//!
//! # Module Structure
//! - `target`: the normalized fields a flavor binds from `ConnectionParameters`
//! - `postgres`: PostgreSQL and Redshift
//! - `mssql`: SQL Server and Azure Synapse
//! - `databricks`: Databricks SQL warehouses
//! - `mongodb`: MongoDB and Atlas (SRV)
//! - `generic`: MySQL, Oracle and SQLite
//! - `resolver`: flavor-name resolution and binding
//!
//! Adding a flavor means one new module, one `FlavorStrategy` variant and one
//! arm in the resolver; existing flavors stay untouched.

use crate::{
    Result,
    config::ConnectArgs,
    models::{Flavor, FlavorFeature},
};

mod databricks;
mod generic;
mod mongodb;
mod mssql;
mod postgres;
mod resolver;
mod target;

pub use databricks::DatabricksFlavor;
pub use generic::GenericSqlFlavor;
pub use mongodb::MongoFlavor;
pub use mssql::SqlServerFlavor;
pub use postgres::PostgresFlavor;
pub use resolver::resolve_flavor;
pub use target::BoundTarget;

/// Capability contract every connection flavor implements.
///
/// Only the string builders and the capability table are required; the
/// remaining methods carry the behavior most flavors share and are
/// overridden where an engine differs.
pub trait FlavorService: std::fmt::Debug + Send + Sync {
    /// Fields bound from the connection record.
    fn target(&self) -> &BoundTarget;

    /// Checks if the flavor provides a capability.
    fn supports_feature(&self, feature: FlavorFeature) -> bool;

    /// URL prefix (`scheme://user:encodedPassword@`) used in URL mode.
    fn connection_string_head(&self, password: &str) -> String;

    /// Full driver connection string built from the discrete fields.
    ///
    /// # Errors
    /// Returns a configuration error when a field the flavor needs is absent.
    fn connection_string_from_fields(
        &self,
        password: &str,
        password_overwritten: bool,
    ) -> Result<String>;

    /// Statements to run right after connecting, in order.
    fn pre_connection_statements(&self) -> Vec<String> {
        Vec::new()
    }

    /// Driver-level keyword options.
    fn connect_args(&self, _password_overwritten: bool) -> ConnectArgs {
        ConnectArgs::new()
    }

    /// SQL string concatenation operator.
    fn concat_operator(&self) -> &'static str {
        "||"
    }

    /// Flavor this strategy was bound for.
    fn flavor(&self) -> Flavor {
        self.target().flavor
    }

    /// Database name as bound, before any flavor default.
    fn database_name(&self) -> Option<&str> {
        self.target().database.as_deref()
    }

    /// Whether key authentication was requested.
    fn connects_by_key(&self) -> bool {
        self.target().connect_by_key
    }

    /// Connection string for the bound mode: URL head plus the stored URL
    /// tail in URL mode, otherwise the field-built string.
    ///
    /// # Errors
    /// Propagates errors from [`FlavorService::connection_string_from_fields`].
    fn connection_string(&self, password: &str, password_overwritten: bool) -> Result<String> {
        match self.target().url.as_deref() {
            Some(url) => Ok(format!("{}{}", self.connection_string_head(password), url)),
            None => self.connection_string_from_fields(password, password_overwritten),
        }
    }
}

/// A bound connection strategy, one variant per engine family.
#[derive(Debug, Clone)]
pub enum FlavorStrategy {
    /// PostgreSQL and Redshift
    Postgres(PostgresFlavor),
    /// SQL Server and Synapse
    SqlServer(SqlServerFlavor),
    /// Databricks
    Databricks(DatabricksFlavor),
    /// MongoDB
    MongoDB(MongoFlavor),
    /// MySQL, Oracle and SQLite
    GenericSql(GenericSqlFlavor),
}

macro_rules! dispatch {
    ($strategy:expr, $inner:ident => $call:expr) => {
        match $strategy {
            FlavorStrategy::Postgres($inner) => $call,
            FlavorStrategy::SqlServer($inner) => $call,
            FlavorStrategy::Databricks($inner) => $call,
            FlavorStrategy::MongoDB($inner) => $call,
            FlavorStrategy::GenericSql($inner) => $call,
        }
    };
}

impl FlavorService for FlavorStrategy {
    fn target(&self) -> &BoundTarget {
        dispatch!(self, f => f.target())
    }

    fn supports_feature(&self, feature: FlavorFeature) -> bool {
        dispatch!(self, f => f.supports_feature(feature))
    }

    fn connection_string_head(&self, password: &str) -> String {
        dispatch!(self, f => f.connection_string_head(password))
    }

    fn connection_string_from_fields(
        &self,
        password: &str,
        password_overwritten: bool,
    ) -> Result<String> {
        dispatch!(self, f => f.connection_string_from_fields(password, password_overwritten))
    }

    fn pre_connection_statements(&self) -> Vec<String> {
        dispatch!(self, f => f.pre_connection_statements())
    }

    fn connect_args(&self, password_overwritten: bool) -> ConnectArgs {
        dispatch!(self, f => f.connect_args(password_overwritten))
    }

    fn concat_operator(&self) -> &'static str {
        dispatch!(self, f => f.concat_operator())
    }

    fn connection_string(&self, password: &str, password_overwritten: bool) -> Result<String> {
        dispatch!(self, f => f.connection_string(password, password_overwritten))
    }
}
