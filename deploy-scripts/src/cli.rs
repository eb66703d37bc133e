//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, plan},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_RPC_URL},
    errors::ScriptError,
};

/// Deploy the Smartys token, transport, and order contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer.
    ///
    /// If omitted, the node's unlocked accounts are used, the first one
    /// deploying.
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deploy script commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the contracts to a network
    Deploy(DeployArgs),
    /// Print what a deployment to a network would do, without connecting to it
    Plan(PlanArgs),
}

impl Command {
    /// Runs the command against the node at `rpc_url`
    pub async fn run(self, rpc_url: &str, priv_key: Option<&str>) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, rpc_url, priv_key).await,
            Command::Plan(args) => plan(args),
        }
    }
}

/// Deploy the contracts.
///
/// On networks that reuse a known token only the transport and order
/// contracts are deployed, against that token.
#[derive(Args)]
pub struct DeployArgs {
    /// The name of the network being deployed to, e.g. `development`
    #[arg(short, long)]
    pub network: String,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// JSON file extending the network policy table and known token addresses
    #[arg(long)]
    pub network_config: Option<PathBuf>,

    /// File holding the presigned ERC1820 registry deployment transaction in
    /// hex, defaults to `ERC1820Registry.tx` in the artifacts directory
    #[arg(long)]
    pub registry_tx: Option<PathBuf>,

    /// Path of the JSON file the deployed addresses are recorded in
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// Exit successfully even if the deployment fails, the failure is
    /// only logged
    #[arg(long)]
    pub legacy_exit_code: bool,
}

/// Print the deployment plan for a network
#[derive(Args)]
pub struct PlanArgs {
    /// The name of the network
    #[arg(short, long)]
    pub network: String,

    /// JSON file extending the network policy table and known token addresses
    #[arg(long)]
    pub network_config: Option<PathBuf>,
}
