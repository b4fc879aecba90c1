//! Library module for the dataprofile CLI
//!
//! Argument parsing and command execution live here so they can be tested
//! without spawning the binary. The binary entry point is in main.rs.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use dataprofile_core::{
    ConnectionParameters, ConnectionRequest, ConnectionStringBuilder, EngineConfig,
    EngineSettings, Flavor, FlavorFeature, FlavorService, FlavorStrategy, PortValue,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use zeroize::Zeroizing;

/// CLI argument structure
#[derive(Parser)]
#[command(name = "dataprofile")]
#[command(about = "Build driver connection settings for profiled databases")]
#[command(version)]
#[command(long_about = "
dataprofile - connection configuration for data profiling

Turns a stored connection record into the connection string, pre-connection
statements, connect args and concat operator the profiling engine needs.

SECURITY FEATURES:
- Passwords are percent-encoded, never logged, and masked in output
- Sealed (dp1$) passwords are opened with DATAPROFILE_MASTER_KEY
- Passwords can be read from DATAPROFILE_PASSWORD or prompted for

EXAMPLES:
  dataprofile flavors
  dataprofile build --flavor postgres --host localhost --username app --database sales --prompt-password
  dataprofile build --params-file connection.json --require-schema
  dataprofile seal
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// List supported database flavors and their capabilities
    Flavors(FlavorsArgs),
    /// Build the engine configuration for a connection record
    Build(Box<BuildArgs>),
    /// Seal a password for storage in a connection record
    Seal(SealArgs),
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,
}

#[derive(Args)]
pub struct FlavorsArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Flavor name (case-insensitive); defaults to the record's flavor
    #[arg(short, long, value_name = "NAME")]
    pub flavor: Option<String>,

    /// JSON connection record; flags below override its fields
    #[arg(long, value_name = "FILE")]
    pub params_file: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Port, as a number or a zero-padded string
    #[arg(long)]
    pub port: Option<String>,

    /// Login name
    #[arg(long)]
    pub username: Option<String>,

    /// Database, catalog or SQLite file
    #[arg(long)]
    pub database: Option<String>,

    /// Session schema (Redshift search path)
    #[arg(long)]
    pub schema: Option<String>,

    /// Databricks warehouse HTTP path
    #[arg(long, value_name = "PATH")]
    pub http_path: Option<String>,

    /// URL tail appended to the flavor's URL head (switches to URL mode)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Login name replacing the record's username
    #[arg(long, value_name = "USER")]
    pub user_override: Option<String>,

    /// Password (plaintext or sealed); overrides the record's password
    #[arg(long, env = "DATAPROFILE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Prompt for the password on the terminal
    #[arg(long, conflicts_with = "password")]
    pub prompt_password: bool,

    /// Master key used to open sealed passwords
    #[arg(long, env = "DATAPROFILE_MASTER_KEY", hide_env_values = true)]
    pub master_key: Option<String>,

    /// Fail unless the flavor can scope the session to the record's schema
    #[arg(long)]
    pub require_schema: bool,

    /// Fail unless the flavor tunnels over HTTP and the record has an http path
    #[arg(long)]
    pub require_http_path: bool,

    /// Connect timeout passed to the driver
    #[arg(
        long,
        env = "DATAPROFILE_CONNECT_TIMEOUT",
        default_value_t = 3600,
        value_name = "SECONDS"
    )]
    pub connect_timeout: u64,

    /// Trust the server certificate without verification (SQL Server)
    #[arg(long)]
    pub skip_cert_verification: bool,

    /// Print the connection string with the password
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Args)]
pub struct SealArgs {
    /// Password to seal; prompted for when absent
    #[arg(long, env = "DATAPROFILE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Master key used to seal the password
    #[arg(long, env = "DATAPROFILE_MASTER_KEY", hide_env_values = true)]
    pub master_key: String,
}

/// One row of the `flavors` listing.
#[derive(Debug, Serialize)]
pub struct FlavorInfo {
    pub name: String,
    pub slug: &'static str,
    pub default_port: Option<u16>,
    pub connectable: bool,
    pub features: Vec<FlavorFeature>,
}

/// Describes every flavor by binding it to an empty record.
pub fn describe_flavors() -> Vec<FlavorInfo> {
    Flavor::all()
        .into_iter()
        .map(|flavor| {
            let strategy = FlavorStrategy::bind(flavor, &ConnectionParameters::new(flavor)).ok();
            let features = strategy.as_ref().map_or_else(Vec::new, |s| {
                FlavorFeature::all()
                    .into_iter()
                    .filter(|feature| s.supports_feature(*feature))
                    .collect()
            });
            FlavorInfo {
                name: flavor.to_string(),
                slug: flavor.slug(),
                default_port: flavor.default_port(),
                connectable: strategy.is_some(),
                features,
            }
        })
        .collect()
}

fn render_flavors(args: &FlavorsArgs) -> anyhow::Result<String> {
    let flavors = describe_flavors();
    if args.json {
        return serde_json::to_string_pretty(&flavors).context("Failed to serialize flavors");
    }

    let mut lines = vec![format!("{:<12} {:<11} {:>5}  {}", "FLAVOR", "SLUG", "PORT", "FEATURES")];
    for info in flavors {
        let port = info.default_port.map_or_else(|| "-".to_string(), |p| p.to_string());
        let features = if info.connectable {
            info.features
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "(no connection strategy)".to_string()
        };
        lines.push(format!("{:<12} {:<11} {:>5}  {}", info.name, info.slug, port, features));
    }
    Ok(lines.join("\n"))
}

/// Loads the connection record from the params file and applies flag
/// overrides.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if neither a
/// params file nor a flavor name is given.
pub fn load_parameters(args: &BuildArgs) -> anyhow::Result<ConnectionParameters> {
    let mut params = match (&args.params_file, &args.flavor) {
        (Some(path), _) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read params file {}", path.display()))?;
            serde_json::from_str::<ConnectionParameters>(&raw)
                .with_context(|| format!("Invalid connection record in {}", path.display()))?
        }
        (None, Some(name)) => ConnectionParameters::new(name.parse::<Flavor>()?),
        (None, None) => bail!("Either --flavor or --params-file is required"),
    };

    if let Some(host) = &args.host {
        params.host = Some(host.clone());
    }
    if let Some(port) = &args.port {
        params.port = Some(PortValue::from(port.as_str()));
    }
    if let Some(username) = &args.username {
        params.username = Some(username.clone());
    }
    if let Some(database) = &args.database {
        params.database = Some(database.clone());
    }
    if let Some(schema) = &args.schema {
        params.schema = Some(schema.clone());
    }
    if let Some(http_path) = &args.http_path {
        params.http_path = Some(http_path.clone());
    }
    if let Some(url) = &args.url {
        params = params.with_url(url.clone());
    }
    if let Some(user) = &args.user_override {
        params.user_override = Some(user.clone());
    }

    tracing::info!("Loaded {}", params);
    Ok(params)
}

/// Picks the password for this invocation.
///
/// Returns the password and whether it replaced the record's stored one.
fn supplied_password(
    args: &BuildArgs,
    stored: &Zeroizing<String>,
) -> anyhow::Result<(Zeroizing<String>, bool)> {
    if let Some(password) = &args.password {
        return Ok((Zeroizing::new(password.clone()), true));
    }
    if args.prompt_password {
        let password = rpassword::prompt_password("Password: ")
            .context("Failed to read password from terminal")?;
        return Ok((Zeroizing::new(password), true));
    }
    Ok((stored.clone(), false))
}

/// Opens a sealed password; plaintext passes through unchanged.
fn open_password(
    password: Zeroizing<String>,
    master_key: Option<&str>,
) -> anyhow::Result<Zeroizing<String>> {
    #[cfg(feature = "encryption")]
    {
        use dataprofile_core::encryption::{is_sealed, unseal_password};

        if is_sealed(&password) {
            let key = master_key
                .context("Password is sealed; set DATAPROFILE_MASTER_KEY or pass --master-key")?;
            tracing::debug!("Unsealing stored password");
            return Ok(unseal_password(&password, key)?);
        }
    }
    #[cfg(not(feature = "encryption"))]
    let _ = master_key;

    Ok(password)
}

/// Builds the engine configuration described by `args`.
///
/// # Errors
/// Returns an error if the record cannot be loaded, the password cannot be
/// opened, or the core rejects the record.
pub fn build_engine_config(args: &BuildArgs) -> anyhow::Result<EngineConfig> {
    let mut params = load_parameters(args)?;

    let (password, overwritten) = supplied_password(args, &params.password)?;
    params.password = open_password(password, args.master_key.as_deref())?;

    let settings = EngineSettings::default()
        .with_connect_timeout(Duration::from_secs(args.connect_timeout))
        .with_skip_certificate_verification(args.skip_cert_verification);
    let builder = ConnectionStringBuilder::new(settings)?;

    let request = ConnectionRequest::default()
        .with_password_overwritten(overwritten)
        .with_schema_scope(args.require_schema)
        .with_http_tunnel(args.require_http_path);

    let flavor_name = args
        .flavor
        .clone()
        .unwrap_or_else(|| params.flavor.to_string());

    Ok(builder.build(&flavor_name, &params, &request)?)
}

fn render_config(config: &EngineConfig, reveal: bool) -> anyhow::Result<String> {
    let mut summary = config.summary();
    if reveal {
        tracing::warn!("Printing the connection string with its password");
        summary.connection_string = config.connection_string().to_string();
    }
    serde_json::to_string_pretty(&summary).context("Failed to serialize engine configuration")
}

#[cfg(feature = "encryption")]
fn seal(args: &SealArgs) -> anyhow::Result<String> {
    let password = match &args.password {
        Some(password) => Zeroizing::new(password.clone()),
        None => Zeroizing::new(
            rpassword::prompt_password("Password to seal: ")
                .context("Failed to read password from terminal")?,
        ),
    };
    Ok(dataprofile_core::encryption::seal_password(
        &password,
        &args.master_key,
    )?)
}

#[cfg(not(feature = "encryption"))]
fn seal(_args: &SealArgs) -> anyhow::Result<String> {
    bail!("dataprofile was built without the encryption feature")
}

/// Execute the CLI command with the given arguments
///
/// # Errors
/// Returns errors for invalid inputs, unreadable files, or records the core
/// rejects. Error messages never contain the password.
pub fn execute(cli: &Cli) -> anyhow::Result<String> {
    match &cli.command {
        Command::Flavors(args) => render_flavors(args),
        Command::Build(args) => {
            let config = build_engine_config(args)?;
            render_config(&config, args.reveal)
        }
        Command::Seal(args) => seal(args),
    }
}
