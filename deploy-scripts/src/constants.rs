//! Constants used in the deploy scripts

use alloy::primitives::{address, Address};

/// The name of the local development network, on which the ERC1820 registry
/// must be bootstrapped before the token can be deployed
pub const DEVELOPMENT_NETWORK: &str = "development";

/// The name of the network on which only the token's dependents are
/// redeployed, reusing the already-deployed token
pub const RINKEBY_UPDATE_NETWORK: &str = "rinkeby-update";

/// The token previously deployed to Rinkeby
pub const RINKEBY_TOKEN_ADDRESS: Address = address!("e0D15a857B78E4472876476Bef9DA392EC5Bce23");

/// The address of the ERC1820 registry singleton.
///
/// This is the same on every chain, see EIP1820: https://eips.ethereum.org/EIPS/eip-1820
pub const ERC1820_REGISTRY_ADDRESS: Address =
    address!("1820a4B7618BdE71Dce8cdc73aAB6C95905faD24");

/// The one-time account which signed the presigned ERC1820 registry deployment
pub const ERC1820_DEPLOYER_ADDRESS: Address =
    address!("a990077c3205cbDf861e17Fa532eeB069cE9fF96");

/// The amount of wei the registry deployer account must hold to pay for the
/// presigned deployment transaction (0.08 ether)
pub const ERC1820_DEPLOYER_FUNDING_WEI: u128 = 80_000_000_000_000_000;

/// The file name of the presigned ERC1820 registry deployment transaction,
/// looked up in the artifacts directory when no explicit path is given
pub const ERC1820_TX_FILE: &str = "ERC1820Registry.tx";

/// The extension of compiled contract artifacts
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default directory containing compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

/// The default RPC URL, a local development node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The interval between polls for a transaction receipt
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// The number of times to poll for a transaction receipt before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 240;
