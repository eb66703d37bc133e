//! The chain client through which transactions are submitted.
//!
//! Deployment logic only depends on the [`ChainClient`] trait; [`RpcClient`]
//! implements it against a JSON-RPC node.

use std::{str::FromStr, time::Duration};

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::{debug, info};

use crate::{
    constants::{RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL_MS},
    errors::ProviderError,
};

/// The outcome of an included transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    /// The hash of the included transaction
    pub tx_hash: TxHash,
    /// Whether the transaction executed successfully
    pub success: bool,
    /// The address of the contract created by the transaction, if any
    pub contract_address: Option<Address>,
}

/// The capabilities the deploy scripts need from a chain
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Signs (if necessary) and submits a transaction, returning its hash
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ProviderError>;

    /// Submits an already-signed, RLP-encoded transaction
    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<TxHash, ProviderError>;

    /// Waits for the given transaction to be included
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation, ProviderError>;

    /// Reads the code deployed at the given address
    async fn get_code_at(&self, address: Address) -> Result<Bytes, ProviderError>;
}

/// Submits a transaction and waits for it to be included successfully
pub async fn send_and_confirm<C: ChainClient>(
    client: &C,
    tx: TransactionRequest,
) -> Result<Confirmation, ProviderError> {
    let tx_hash = client.send_transaction(tx).await?;
    ensure_success(client.wait_for_confirmation(tx_hash).await?)
}

/// Submits a signed transaction and waits for it to be included successfully
pub async fn send_raw_and_confirm<C: ChainClient>(
    client: &C,
    raw_tx: &[u8],
) -> Result<Confirmation, ProviderError> {
    let tx_hash = client.send_raw_transaction(raw_tx).await?;
    ensure_success(client.wait_for_confirmation(tx_hash).await?)
}

/// Converts a reverted confirmation into an error
fn ensure_success(confirmation: Confirmation) -> Result<Confirmation, ProviderError> {
    if confirmation.success {
        Ok(confirmation)
    } else {
        Err(ProviderError::Reverted(confirmation.tx_hash))
    }
}

/// A [`ChainClient`] backed by a JSON-RPC node
#[derive(Clone)]
pub struct RpcClient {
    /// The underlying provider, with a signer attached if a key was given
    provider: DynProvider<Ethereum>,
    /// The accounts transactions may be sent from
    accounts: Vec<Address>,
    /// The interval between receipt polls
    poll_interval: Duration,
    /// The number of receipt polls before giving up on a transaction
    poll_attempts: usize,
}

impl RpcClient {
    /// The accounts this client can send transactions from, the first being
    /// the default deployer
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }
}

impl ChainClient for RpcClient {
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ProviderError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ProviderError::Submission(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<TxHash, ProviderError> {
        let pending = self
            .provider
            .send_raw_transaction(raw_tx)
            .await
            .map_err(|e| ProviderError::Submission(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation, ProviderError> {
        // Poll for the receipt rather than watching the pending transaction,
        // some dev nodes never emit the block notifications watchers rely on
        for _ in 0..self.poll_attempts {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ProviderError::Confirmation(e.to_string()))?;

            if let Some(receipt) = receipt {
                debug!("tx {:#x} included in block {:?}", tx_hash, receipt.block_number);
                return Ok(Confirmation {
                    tx_hash,
                    success: receipt.status(),
                    contract_address: receipt.contract_address,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        Err(ProviderError::Confirmation(format!(
            "no receipt for {:#x} after {} attempts",
            tx_hash, self.poll_attempts
        )))
    }

    async fn get_code_at(&self, address: Address) -> Result<Bytes, ProviderError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| ProviderError::Query(e.to_string()))
    }
}

/// Sets up the client with which to deploy the contracts.
///
/// If a private key is given, transactions are signed locally and sent from
/// its address. Otherwise they are sent from the node's unlocked accounts, as
/// on a local development node.
pub async fn setup_client(
    rpc_url: &str,
    priv_key: Option<&str>,
) -> Result<RpcClient, ProviderError> {
    let url = Url::parse(rpc_url).map_err(|e| ProviderError::ClientInitialization(e.to_string()))?;

    let (provider, accounts) = match priv_key {
        Some(priv_key) => {
            let signer = PrivateKeySigner::from_str(priv_key)
                .map_err(|e| ProviderError::ClientInitialization(e.to_string()))?;
            let address = signer.address();
            let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
            (DynProvider::new(provider), vec![address])
        }
        None => {
            let provider = DynProvider::new(ProviderBuilder::new().connect_http(url));
            let accounts = provider
                .get_accounts()
                .await
                .map_err(|e| ProviderError::ClientInitialization(e.to_string()))?;
            (provider, accounts)
        }
    };

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ProviderError::ClientInitialization(e.to_string()))?;
    info!(
        "connected to chain {} at {} with {} account(s)",
        chain_id,
        rpc_url,
        accounts.len()
    );

    Ok(RpcClient {
        provider,
        accounts,
        poll_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL_MS),
        poll_attempts: RECEIPT_POLL_ATTEMPTS,
    })
}
