use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "doiman",
    version,
    about = "DOI lifecycle manager: register, transition and audit persistent identifiers"
)]
pub struct Cli {
    /// Path to the local store database.
    #[arg(long, global = true, default_value = "doiman.sqlite", env = "DOIMAN_DB")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the remote state and local record for a resource
    Status(StatusArgs),
    /// Drive a DOI state transition for a resource
    Transition(TransitionArgs),
    /// Print the audit trail for a resource
    History(HistoryArgs),
    /// Manage authority configurations
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Resource id to inspect.
    #[arg(long)]
    pub resource: String,

    /// JSON file holding the catalog resources.
    #[arg(long, env = "DOIMAN_RESOURCES")]
    pub resources: PathBuf,

    /// Site domain used for landing page URLs.
    #[arg(long, env = "DOIMAN_DOMAIN")]
    pub domain: String,
}

#[derive(Parser, Debug)]
pub struct TransitionArgs {
    /// Resource id to transition.
    #[arg(long)]
    pub resource: String,

    /// Target state: draft, registered or findable.
    #[arg(long)]
    pub to: String,

    /// JSON file holding the catalog resources.
    #[arg(long, env = "DOIMAN_RESOURCES")]
    pub resources: PathBuf,

    /// Site domain used for landing page URLs.
    #[arg(long, env = "DOIMAN_DOMAIN")]
    pub domain: String,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Resource id whose audit trail to print.
    #[arg(long)]
    pub resource: String,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub cmd: ConfigCmd,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// List stored configurations, marking the active one
    Show,
    /// Add a configuration (the first one added becomes active)
    Add(ConfigAddArgs),
    /// Activate a configuration, deactivating the others
    SetActive(ConfigSetActiveArgs),
}

#[derive(Parser, Debug)]
pub struct ConfigAddArgs {
    /// Authority instance: test or production.
    #[arg(long, default_value = "test")]
    pub instance: String,

    /// DOI prefix assigned to the repository.
    #[arg(long)]
    pub prefix: String,

    /// Repository id (Basic auth username).
    #[arg(long)]
    pub repo_id: String,

    /// Basic auth password.
    #[arg(long, env = "DOIMAN_PASSWORD")]
    pub password: String,

    /// Free-text note.
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(Parser, Debug)]
pub struct ConfigSetActiveArgs {
    /// Configuration id to activate.
    pub id: i64,
}
