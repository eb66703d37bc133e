//! Deployment of a single contract

use std::collections::HashMap;

use alloy::{
    primitives::{Address, Bytes, TxKind},
    rpc::types::{TransactionInput, TransactionRequest},
};
use tracing::debug;

use crate::{
    artifacts::ArtifactStore,
    client::ChainClient,
    errors::DeployError,
    types::{ContractDescriptor, ContractName, DeployedContract},
};

/// Deploys contracts from a single account.
///
/// Each distinct descriptor is deployed at most once per deployer; deploying
/// it again returns the contract from the first deployment.
pub struct ContractDeployer<'a, C> {
    /// The client to submit creation transactions through
    client: &'a C,
    /// The artifacts to deploy from
    artifacts: &'a ArtifactStore,
    /// The account creation transactions are sent from
    from: Address,
    /// The contracts deployed so far, keyed by contract and encoded arguments
    deployed: HashMap<(ContractName, Bytes), DeployedContract>,
}

impl<'a, C: ChainClient> ContractDeployer<'a, C> {
    /// Creates a deployer sending from the given account
    pub fn new(client: &'a C, artifacts: &'a ArtifactStore, from: Address) -> Self {
        Self {
            client,
            artifacts,
            from,
            deployed: HashMap::new(),
        }
    }

    /// Deploys the described contract, waiting for the creation transaction
    /// to be included.
    ///
    /// The creation transaction is submitted exactly once; failures are not
    /// retried.
    pub async fn deploy(
        &mut self,
        descriptor: &ContractDescriptor,
    ) -> Result<DeployedContract, DeployError> {
        let name = descriptor.name;
        let key = (name, descriptor.encoded_args());
        if let Some(deployed) = self.deployed.get(&key) {
            debug!("{} already deployed at {:#x}", name, deployed.address);
            return Ok(deployed.clone());
        }

        let code = self.artifacts.get(name)?.creation_code(descriptor);
        let tx = TransactionRequest {
            from: Some(self.from),
            to: Some(TxKind::Create),
            input: TransactionInput::new(code),
            ..Default::default()
        };

        let tx_hash = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::Submission(name, e.to_string()))?;
        debug!("submitted {} creation in tx {:#x}", name, tx_hash);

        let confirmation = self
            .client
            .wait_for_confirmation(tx_hash)
            .await
            .map_err(|e| DeployError::Confirmation(name, e.to_string()))?;
        if !confirmation.success {
            return Err(DeployError::Reverted(name, tx_hash));
        }

        let address = confirmation
            .contract_address
            .ok_or(DeployError::MissingContractAddress(name))?;
        let code = self
            .client
            .get_code_at(address)
            .await
            .map_err(|e| DeployError::Confirmation(name, e.to_string()))?;
        if code.is_empty() {
            return Err(DeployError::MissingCode(name));
        }

        let deployed = DeployedContract {
            name,
            address,
            tx_hash,
        };
        self.deployed.insert(key, deployed.clone());

        Ok(deployed)
    }
}
