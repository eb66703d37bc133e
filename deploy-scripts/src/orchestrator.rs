//! Orchestration of a full deployment run.
//!
//! A run is linear: classify the network, bootstrap the registry where
//! needed, resolve the token (deploying it or reusing a known one), then
//! deploy the transport and order contracts against the token. Each deploy
//! waits for the previous to be confirmed.

use alloy::primitives::Address;
use tracing::{error, info, warn};

use crate::{
    artifacts::ArtifactStore,
    client::ChainClient,
    deployer::ContractDeployer,
    errors::{DeployError, RunFailure},
    network::{DeploymentPlan, NetworkConfig, NetworkPolicy, TokenSource},
    registry::RegistryBootstrapper,
    types::{ContractDescriptor, ContractName, DeployedContract},
};

/// The result of a successful deployment run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentReport {
    /// The network deployed to
    pub network: String,
    /// The policy the network was classified under
    pub policy: NetworkPolicy,
    /// The token the dependent contracts were deployed against
    pub token_address: Address,
    /// The contracts deployed during the run, in deployment order
    pub contracts: Vec<DeployedContract>,
}

impl DeploymentReport {
    /// The address of the given contract, if it was deployed during the run
    pub fn address_of(&self, name: ContractName) -> Option<Address> {
        self.contracts
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.address)
    }
}

/// Runs deployments against a chain
pub struct Orchestrator<C> {
    /// The client deployments are submitted through
    client: C,
    /// The compiled contracts
    artifacts: ArtifactStore,
    /// The network policy table
    config: NetworkConfig,
    /// The ERC1820 registry bootstrapper
    registry: RegistryBootstrapper,
}

impl<C: ChainClient> Orchestrator<C> {
    /// Creates an orchestrator with the default network table and no
    /// presigned registry transaction
    pub fn new(client: C, artifacts: ArtifactStore) -> Self {
        Self {
            client,
            artifacts,
            config: NetworkConfig::default(),
            registry: RegistryBootstrapper::default(),
        }
    }

    /// Replaces the network table
    pub fn with_config(mut self, config: NetworkConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the registry bootstrapper
    pub fn with_registry(mut self, registry: RegistryBootstrapper) -> Self {
        self.registry = registry;
        self
    }

    /// The client deployments are submitted through
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Computes what a run against the given network would do, without
    /// touching the chain
    pub fn plan(&self, network: &str) -> Result<DeploymentPlan, DeployError> {
        self.config.plan(network)
    }

    /// Deploys the contracts to the given network from the first of the
    /// given accounts.
    ///
    /// A registry bootstrap failure is logged and the run continues. Any
    /// other failure stops the run; contracts deployed up to that point are
    /// returned in the [`RunFailure`], they are not rolled back.
    pub async fn run(
        &self,
        network: &str,
        accounts: &[Address],
    ) -> Result<DeploymentReport, RunFailure> {
        let mut deployed = Vec::new();
        match self.run_inner(network, accounts, &mut deployed).await {
            Ok((policy, token_address)) => Ok(DeploymentReport {
                network: network.to_string(),
                policy,
                token_address,
                contracts: deployed,
            }),
            Err(e) => {
                let failure = RunFailure {
                    network: network.to_string(),
                    deployed,
                    error: e,
                };
                error!("{}", failure);
                Err(failure)
            }
        }
    }

    /// Executes the run, pushing each contract to `deployed` as soon as it
    /// is confirmed
    async fn run_inner(
        &self,
        network: &str,
        accounts: &[Address],
        deployed: &mut Vec<DeployedContract>,
    ) -> Result<(NetworkPolicy, Address), DeployError> {
        let plan = self.plan(network)?;
        let deployer_account = *accounts
            .first()
            .ok_or(DeployError::MissingDeployerAccount)?;
        let mut deployer = ContractDeployer::new(&self.client, &self.artifacts, deployer_account);

        match plan.token {
            TokenSource::Reuse(_) => info!("doing {} update deploy", network),
            TokenSource::Deploy => info!("doing fresh deploy to {}", network),
        }

        if plan.bootstrap_registry {
            if let Err(e) = self.registry.ensure_registry(&self.client, deployer_account).await {
                warn!("could not bootstrap ERC1820 registry, continuing: {}", e);
            }
        }

        let token_address = match plan.token {
            TokenSource::Reuse(address) => {
                info!("reusing {} at {:#x}", ContractName::SmartysToken, address);
                address
            }
            TokenSource::Deploy => {
                let token = deployer
                    .deploy(&ContractDescriptor::new(ContractName::SmartysToken))
                    .await?;
                Self::record(deployed, token)
            }
        };

        for name in [ContractName::TransportContract, ContractName::OrderContract] {
            let contract = deployer
                .deploy(&ContractDescriptor::with_token(name, token_address))
                .await?;
            Self::record(deployed, contract);
        }

        Ok((plan.policy, token_address))
    }

    /// Logs a freshly deployed contract and adds it to the run's results,
    /// returning its address
    fn record(deployed: &mut Vec<DeployedContract>, contract: DeployedContract) -> Address {
        info!("deployed {} contract to {:#x}", contract.name, contract.address);
        let address = contract.address;
        deployed.push(contract);
        address
    }
}
