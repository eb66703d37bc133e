//! Implementations of the various deploy scripts

use std::path::Path;

use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    artifacts::ArtifactStore,
    cli::{DeployArgs, PlanArgs},
    client::setup_client,
    constants::ERC1820_TX_FILE,
    errors::{RunFailure, ScriptError},
    network::NetworkConfig,
    orchestrator::{DeploymentReport, Orchestrator},
    registry::RegistryBootstrapper,
    utils::write_deployed_addresses,
};

/// Deploys the contracts and records their addresses
pub async fn deploy(
    args: DeployArgs,
    rpc_url: &str,
    priv_key: Option<&str>,
) -> Result<(), ScriptError> {
    let config = NetworkConfig::load_or_default(args.network_config.as_deref())?;
    let artifacts = ArtifactStore::load_dir(&args.artifacts_dir)?;
    let registry_tx_path = args
        .registry_tx
        .unwrap_or_else(|| args.artifacts_dir.join(ERC1820_TX_FILE));
    let registry = RegistryBootstrapper::from_file(&registry_tx_path);

    let client = setup_client(rpc_url, priv_key).await?;
    let accounts = client.accounts().to_vec();

    let orchestrator = Orchestrator::new(client, artifacts)
        .with_config(config)
        .with_registry(registry);

    let result = orchestrator.run(&args.network, &accounts).await;

    if let Some(path) = &args.deployments_path {
        record_deployments(path, &args.network, &result)?;
    }

    match result {
        Ok(report) => {
            info!(
                "deployed [{}] to {}",
                report.contracts.iter().map(|c| c.name).join(", "),
                report.network
            );
            Ok(())
        }
        Err(_) if args.legacy_exit_code => {
            warn!("exiting successfully despite the failed deployment");
            Ok(())
        }
        Err(failure) => Err(failure.into()),
    }
}

/// Records whatever the run deployed, even if it stopped early.
///
/// After a failed run a write error is only logged.
fn record_deployments(
    path: &Path,
    network: &str,
    result: &Result<DeploymentReport, RunFailure>,
) -> Result<(), ScriptError> {
    let deployed = match result {
        Ok(report) => &report.contracts,
        Err(failure) => &failure.deployed,
    };

    match write_deployed_addresses(path, network, deployed) {
        Ok(()) => {
            info!("recorded {} deployment(s) in {}", deployed.len(), path.display());
            Ok(())
        }
        Err(e) if result.is_err() => {
            warn!("could not record partial deployment in {}: {}", path.display(), e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Prints the deployment plan for a network
pub fn plan(args: PlanArgs) -> Result<(), ScriptError> {
    let config = NetworkConfig::load_or_default(args.network_config.as_deref())?;
    let plan = config
        .plan(&args.network)
        .map_err(|e| ScriptError::ReadConfig(e.to_string()))?;
    println!("{}", plan);

    Ok(())
}
