//! edugate operator CLI.
//!
//! Inspects the role hierarchy, dry-runs the route gate and applies tenant
//! scoping to exported records.
//!
//! # Quick Start
//!
//! ```bash
//! # List roles and who manages whom
//! edugate roles
//!
//! # Where does an anonymous request to the zone dashboard go?
//! edugate check-route /dashboard/zone
//!
//! # Which schools may a woreda admin in W1 see?
//! edugate scope --kind school --tenant-type woreda --tenant-id W1 schools.json
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use edugate_config::ConfigLoader;
use edugate_rbac::Role;
use edugate_types::{EntityKind, TenantType};
use tracing_subscriber::EnvFilter;

use commands::config::OutputFormat;
use commands::scope::ScopeSource;

/// edugate - role-based access control for the education-management dashboard.
#[derive(Parser)]
#[command(name = "edugate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding edugate.toml and edugate.local.toml.
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// List the role hierarchy.
    Roles,

    /// Check whether one role may administer another.
    CanManage {
        /// Acting role, e.g. ZONE_ADMIN.
        actor: Role,

        /// Target role, e.g. KEBELE_ADMIN.
        target: Role,
    },

    /// Evaluate the route gate for a request path.
    CheckRoute {
        /// Request path, e.g. /dashboard/zone.
        path: String,

        /// Raw session token.
        #[arg(short, long)]
        token: Option<String>,

        /// Evaluate at this RFC 3339 instant instead of now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Filter a JSON array of records to a tenant scope.
    Scope {
        /// Entity kind of the records.
        #[arg(short, long)]
        kind: EntityKind,

        /// Caller tenant type.
        #[arg(long, required_unless_present = "token", conflicts_with = "token")]
        tenant_type: Option<TenantType>,

        /// Caller tenant id.
        #[arg(long, requires = "tenant_type")]
        tenant_id: Option<String>,

        /// Take the caller scope from a session token instead.
        #[arg(short, long)]
        token: Option<String>,

        /// JSON file with the records, or - for stdin.
        file: PathBuf,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (secrets redacted).
    Show {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Toml)]
        format: OutputFormat,
    },

    /// Validate a configuration file.
    Validate {
        /// Path to a TOML file.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = || ConfigLoader::new().with_project_dir(&cli.project_dir);

    // Initialize logging; stdout is reserved for command output
    let level = loader().load_or_default().logging.level;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Roles => {
            commands::roles::run();
            Ok(())
        }
        Commands::CanManage { actor, target } => {
            commands::can_manage::run(actor, target);
            Ok(())
        }
        Commands::CheckRoute { path, token, at } => {
            let config = loader().load()?;
            commands::check_route::run(&config, &path, token.as_deref(), at.as_deref())
        }
        Commands::Scope {
            kind,
            tenant_type,
            tenant_id,
            token,
            file,
        } => {
            let config = loader().load()?;
            let source = match (tenant_type, token.as_deref()) {
                (Some(tenant_type), _) => ScopeSource::Explicit {
                    tenant_type,
                    tenant_id: tenant_id.as_deref(),
                },
                (None, Some(token)) => ScopeSource::Token(token),
                (None, None) => anyhow::bail!("either --tenant-type or --token is required"),
            };
            commands::scope::run(&config, kind, &source, &file)
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { format } => commands::config::show(&cli.project_dir, format),
            ConfigCommands::Validate { file } => commands::config::validate(&file),
        },
    }
}
