//! Bootstrapping of the ERC1820 registry singleton, which the ERC777 token
//! queries on construction.
//!
//! The registry is deployed by a presigned transaction from a one-time
//! account (see EIP1820), so it lands at the same address on every chain.
//! Bootstrapping funds that account and broadcasts the presigned transaction.

use std::{fs, path::Path};

use alloy::{
    primitives::{hex, Address, Bytes, TxKind, U256},
    rpc::types::TransactionRequest,
};
use tracing::{debug, info, warn};

use crate::{
    client::{send_and_confirm, send_raw_and_confirm, ChainClient},
    constants::{ERC1820_DEPLOYER_ADDRESS, ERC1820_DEPLOYER_FUNDING_WEI, ERC1820_REGISTRY_ADDRESS},
    errors::ProviderError,
};

/// Ensures the ERC1820 registry is deployed
#[derive(Clone, Debug, Default)]
pub struct RegistryBootstrapper {
    /// The presigned registry deployment transaction, if available
    deployment_tx: Option<Bytes>,
}

impl RegistryBootstrapper {
    /// A bootstrapper broadcasting the given presigned deployment transaction
    pub fn new(deployment_tx: Bytes) -> Self {
        Self {
            deployment_tx: Some(deployment_tx),
        }
    }

    /// A bootstrapper reading the presigned deployment transaction, in hex,
    /// from the given file.
    ///
    /// A missing or malformed file is not an error here: the registry may
    /// already be deployed, in which case the transaction is never needed.
    pub fn from_file(path: &Path) -> Self {
        let deployment_tx = match fs::read_to_string(path) {
            Ok(contents) => match hex::decode(contents.trim()) {
                Ok(raw) => Some(Bytes::from(raw)),
                Err(e) => {
                    warn!("malformed registry transaction in {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("no registry transaction at {}: {}", path.display(), e);
                None
            }
        };

        Self { deployment_tx }
    }

    /// Deploys the registry unless it is already deployed, funding the
    /// registry deployer account from `funder`
    pub async fn ensure_registry<C: ChainClient>(
        &self,
        client: &C,
        funder: Address,
    ) -> Result<(), ProviderError> {
        let code = client.get_code_at(ERC1820_REGISTRY_ADDRESS).await?;
        if !code.is_empty() {
            info!("ERC1820 registry already deployed at {:#x}", ERC1820_REGISTRY_ADDRESS);
            return Ok(());
        }

        let deployment_tx = self
            .deployment_tx
            .as_ref()
            .ok_or(ProviderError::RegistryTransactionUnavailable)?;

        let funding_tx = TransactionRequest {
            from: Some(funder),
            to: Some(TxKind::Call(ERC1820_DEPLOYER_ADDRESS)),
            value: Some(U256::from(ERC1820_DEPLOYER_FUNDING_WEI)),
            ..Default::default()
        };
        send_and_confirm(client, funding_tx).await?;
        debug!("funded registry deployer {:#x}", ERC1820_DEPLOYER_ADDRESS);

        send_raw_and_confirm(client, deployment_tx).await?;
        info!("deployed ERC1820 registry to {:#x}", ERC1820_REGISTRY_ADDRESS);

        Ok(())
    }
}
