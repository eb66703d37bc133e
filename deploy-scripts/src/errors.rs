//! Definitions of errors that can occur during deployment of the contracts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy::primitives::TxHash;

use crate::types::{ContractName, DeployedContract};

/// Errors surfaced by the chain client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The node rejected a transaction
    Submission(String),
    /// Error waiting for a transaction to be included
    Confirmation(String),
    /// Error reading chain state
    Query(String),
    /// A transaction was included but reverted
    Reverted(TxHash),
    /// The presigned registry deployment transaction was not provided
    RegistryTransactionUnavailable,
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ProviderError::Submission(s) => write!(f, "error submitting transaction: {}", s),
            ProviderError::Confirmation(s) => {
                write!(f, "error confirming transaction: {}", s)
            }
            ProviderError::Query(s) => write!(f, "error querying chain state: {}", s),
            ProviderError::Reverted(hash) => write!(f, "transaction {:#x} reverted", hash),
            ProviderError::RegistryTransactionUnavailable => {
                write!(f, "presigned registry deployment transaction not available")
            }
        }
    }
}

impl Error for ProviderError {}

/// Errors that can occur while deploying a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// No compiled artifact is available for the contract
    MissingArtifact(ContractName),
    /// The contract creation transaction was rejected
    Submission(ContractName, String),
    /// The contract creation transaction could not be confirmed
    Confirmation(ContractName, String),
    /// The contract creation transaction reverted
    Reverted(ContractName, TxHash),
    /// The receipt of the creation transaction holds no contract address
    MissingContractAddress(ContractName),
    /// No code was found at the address the contract was created at
    MissingCode(ContractName),
    /// The caller supplied no account to deploy from
    MissingDeployerAccount,
    /// The network reuses a known token, but none is configured for it
    MissingKnownToken(String),
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::MissingArtifact(c) => write!(f, "no compiled artifact for {}", c),
            DeployError::Submission(c, s) => write!(f, "error submitting {}: {}", c, s),
            DeployError::Confirmation(c, s) => {
                write!(f, "error confirming deployment of {}: {}", c, s)
            }
            DeployError::Reverted(c, hash) => {
                write!(f, "deployment of {} reverted in tx {:#x}", c, hash)
            }
            DeployError::MissingContractAddress(c) => {
                write!(f, "receipt for {} has no contract address", c)
            }
            DeployError::MissingCode(c) => write!(f, "no code found for deployed {}", c),
            DeployError::MissingDeployerAccount => write!(f, "no deployer account provided"),
            DeployError::MissingKnownToken(network) => {
                write!(f, "no known token address configured for network `{}`", network)
            }
        }
    }
}

impl Error for DeployError {}

/// A deployment run that stopped early, along with whatever it had deployed
/// before stopping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    /// The network the run targeted
    pub network: String,
    /// The contracts deployed before the failure, in order
    pub deployed: Vec<DeployedContract>,
    /// The error that stopped the run
    pub error: DeployError,
}

impl Display for RunFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deployment to `{}` failed after {} contract(s): {}",
            self.network,
            self.deployed.len(),
            self.error
        )
    }
}

impl Error for RunFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading or parsing a compilation artifact
    ArtifactParsing(String),
    /// Error reading or parsing the network configuration file
    ReadConfig(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// A deployment run failed
    Deployment(RunFailure),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ReadConfig(s) => write!(f, "error reading network config: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::Deployment(failure) => write!(f, "{}", failure),
        }
    }
}

impl Error for ScriptError {}

impl From<ProviderError> for ScriptError {
    fn from(e: ProviderError) -> Self {
        ScriptError::ClientInitialization(e.to_string())
    }
}

impl From<RunFailure> for ScriptError {
    fn from(failure: RunFailure) -> Self {
        ScriptError::Deployment(failure)
    }
}
