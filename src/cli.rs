//! CLI definition using clap

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fastly")]
#[command(version)]
#[command(about = "Manage Fastly services from the command line")]
#[command(long_about = r#"
Fastly CLI - manage Fastly services from the command line

Commands:
  service-version  list, clone, update, activate, deactivate and lock versions
  domain           manage the domains of a service version

Service selection (highest priority first):
  --service-id, --service-name, service_id in fastly.toml, FASTLY_SERVICE_ID
"#)]
#[command(after_help = r#"
Examples:

  List versions of a service:
    fastly service-version list --service-id SU1Z0isxPaozGVKXdv0eY

  Add a domain, cloning the active version first:
    fastly domain create --version active --name www.example.com --autoclone

  Activate the latest version:
    fastly service-version activate --version latest
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Fastly API token
    #[arg(short, long, global = true, env = "FASTLY_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Fastly API endpoint
    #[arg(long, global = true, env = "FASTLY_API_ENDPOINT", default_value = crate::api::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Service ID (falls back to fastly.toml, then FASTLY_SERVICE_ID)
    #[arg(short, long, global = true)]
    pub service_id: Option<String>,

    /// Service name, looked up to find the service ID
    #[arg(long, global = true)]
    pub service_name: Option<String>,

    /// Machine output mode (JSON Lines)
    #[arg(long, global = true)]
    pub agent: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage service versions
    ServiceVersion(ServiceVersionCommand),

    /// Manage the domains of a service version
    Domain(DomainCommand),
}

/// `--version` and `--autoclone` for commands that change a version
#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// 'latest', 'active', or the number of a specific version
    #[arg(long)]
    pub version: String,

    /// If the selected service version is not editable, clone it and use the clone
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub autoclone: Option<bool>,
}

// ============ Service Version Commands ============

#[derive(Args)]
pub struct ServiceVersionCommand {
    #[command(subcommand)]
    pub action: ServiceVersionAction,
}

#[derive(Subcommand)]
pub enum ServiceVersionAction {
    /// List the versions of a service
    #[command(after_help = "Examples:
  fastly service-version list --service-id 123")]
    List,

    /// Clone a service version
    #[command(after_help = "Examples:
  fastly service-version clone --version active")]
    Clone {
        /// 'latest', 'active', or the number of a specific version
        #[arg(long)]
        version: String,
    },

    /// Update the comment of a service version
    #[command(after_help = "Examples:
  fastly service-version update --version latest --comment 'new origin' --autoclone")]
    Update {
        #[command(flatten)]
        target: VersionArgs,

        /// Version comment
        #[arg(long)]
        comment: String,
    },

    /// Activate a service version
    #[command(after_help = "Examples:
  fastly service-version activate --version 3")]
    Activate {
        #[command(flatten)]
        target: VersionArgs,
    },

    /// Deactivate a service version
    Deactivate {
        /// 'latest', 'active', or the number of a specific version
        #[arg(long)]
        version: String,
    },

    /// Lock a service version
    Lock {
        /// 'latest', 'active', or the number of a specific version
        #[arg(long)]
        version: String,
    },
}

// ============ Domain Commands ============

#[derive(Args)]
pub struct DomainCommand {
    #[command(subcommand)]
    pub action: DomainAction,
}

#[derive(Subcommand)]
pub enum DomainAction {
    /// List the domains of a service version
    #[command(after_help = "Examples:
  fastly domain list --version active")]
    List {
        /// 'latest', 'active', or the number of a specific version
        #[arg(long)]
        version: String,
    },

    /// Add a domain to a service version
    #[command(after_help = "Examples:
  fastly domain create --version latest --name www.example.com --autoclone")]
    Create {
        #[command(flatten)]
        target: VersionArgs,

        /// Domain name
        #[arg(short, long)]
        name: String,

        /// Description
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Remove a domain from a service version
    #[command(after_help = "Examples:
  fastly domain delete --version 4 --name www.example.com")]
    Delete {
        #[command(flatten)]
        target: VersionArgs,

        /// Domain name
        #[arg(short, long)]
        name: String,
    },
}
