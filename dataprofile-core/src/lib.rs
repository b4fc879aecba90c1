//! Connection-flavor core for the dataprofile backend.
//!
//! Every profiling and connection-testing workflow needs the same handful of
//! engine-specific facts before it can open a session: the driver connection
//! string, statements to run right after connecting, driver connect args,
//! and the SQL concatenation operator. This crate maps a flavor name plus a
//! stored connection record onto those facts.
//!
//! # Security Guarantees
//! - Passwords are percent-encoded into connection strings and never logged
//! - Passwords, private keys and built connection strings live in zeroizing
//!   buffers
//! - `Debug` output and error messages never contain a password
//! - Optional AES-GCM sealing of at-rest passwords (`encryption` feature)
//!
//! # Architecture
//! - Strategy pattern: one [`FlavorService`] implementation per engine family,
//!   unified by the [`FlavorStrategy`] sum type
//! - Factory: [`flavors::resolve_flavor`] maps a name to a bound strategy
//! - Orchestrator: [`ConnectionStringBuilder`] validates workflow requirements
//!   and merges connect args into an [`EngineConfig`]
//!
//! The core performs no I/O; opening the session belongs to the caller.

pub mod builder;
pub mod config;
pub mod error;
pub mod flavors;
pub mod logging;
pub mod models;
pub mod security;

// Re-export commonly used types
pub use builder::{ConnectionStringBuilder, EngineConfig, EngineSummary};
pub use config::{ConnectArgs, ConnectionParameters, ConnectionRequest, EngineSettings, PortValue};
pub use error::{DataProfileError, Result, redact_database_url};
pub use flavors::{BoundTarget, FlavorService, FlavorStrategy};
pub use logging::init_logging;
pub use models::{Flavor, FlavorFeature};

#[cfg(feature = "encryption")]
pub use security::encryption;
