//! MongoDB flavor.
//!
//! Produces a document-database URI rather than a SQL connection string.
//! Atlas clusters (`*.mongodb.net`) are addressed through DNS SRV records, so
//! they use the `mongodb+srv` scheme and carry no port.

use super::{BoundTarget, FlavorService};
use crate::{Result, models::FlavorFeature, security::encode_password};

const ATLAS_DOMAIN_SUFFIX: &str = ".mongodb.net";
const DEFAULT_DATABASE: &str = "admin";

/// Strategy for MongoDB deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoFlavor {
    target: BoundTarget,
}

impl MongoFlavor {
    /// Wraps a target bound for MongoDB.
    pub const fn new(target: BoundTarget) -> Self {
        Self { target }
    }

    /// Host the scheme is chosen from. In URL mode this is the URL tail up
    /// to the first `/`, `:` or `?`.
    fn addressed_host(&self) -> Option<&str> {
        match self.target.url.as_deref() {
            Some(url) => url.split(['/', ':', '?']).next(),
            None => self.target.host.as_deref(),
        }
    }

    /// Whether the host resolves its topology through SRV records.
    pub fn uses_srv(&self) -> bool {
        self.addressed_host()
            .is_some_and(|host| host.to_ascii_lowercase().ends_with(ATLAS_DOMAIN_SUFFIX))
    }

    fn scheme(&self) -> &'static str {
        if self.uses_srv() { "mongodb+srv" } else { "mongodb" }
    }
}

impl FlavorService for MongoFlavor {
    fn target(&self) -> &BoundTarget {
        &self.target
    }

    fn supports_feature(&self, feature: FlavorFeature) -> bool {
        matches!(
            feature,
            FlavorFeature::UrlConnection | FlavorFeature::SrvDiscovery
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
        let port_segment = if self.uses_srv() {
            String::new()
        } else {
            format!(":{}", self.target.require_port()?)
        };

        Ok(format!(
            "{}://{}:{}@{}{}/{}",
            self.scheme(),
            self.target.require_encoded_username()?,
            encode_password(password),
            self.target.require_host()?,
            port_segment,
            self.target.database.as_deref().unwrap_or(DEFAULT_DATABASE)
        ))
    }
}
