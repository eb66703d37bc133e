//! Classification of deployment networks.
//!
//! Which contracts get deployed on a network is decided by a policy table
//! keyed on the exact network name, rather than by branching on names. The
//! table ships with rows for the local development network and the Rinkeby
//! update network, and may be extended from a JSON config file.

use std::{collections::BTreeMap, fmt, fs, path::Path, sync::LazyLock};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEVELOPMENT_NETWORK, RINKEBY_TOKEN_ADDRESS, RINKEBY_UPDATE_NETWORK},
    errors::{DeployError, ScriptError},
};

/// The network table used when no config file is given
static DEFAULT_CONFIG: LazyLock<NetworkConfig> = LazyLock::new(NetworkConfig::default);

/// How the token contract is obtained on a network
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkPolicy {
    /// Deploy a fresh token, then its dependents
    #[default]
    DeployFreshToken,
    /// Reuse the token already deployed to the network, deploying only its
    /// dependents
    ReuseKnownToken,
}

impl fmt::Display for NetworkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkPolicy::DeployFreshToken => write!(f, "deploy-fresh-token"),
            NetworkPolicy::ReuseKnownToken => write!(f, "reuse-known-token"),
        }
    }
}

/// A row of the network policy table
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// How the token is obtained
    #[serde(default)]
    pub policy: NetworkPolicy,
    /// Whether the ERC1820 registry must be bootstrapped first
    #[serde(default)]
    pub bootstrap_registry: bool,
}

/// Where the token address of a deployment comes from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenSource {
    /// The token is deployed as part of the run
    Deploy,
    /// The token at the given address is reused
    Reuse(Address),
}

/// The side-effect free decisions of a deployment run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentPlan {
    /// The network being deployed to
    pub network: String,
    /// The policy the network was classified under
    pub policy: NetworkPolicy,
    /// Whether the ERC1820 registry is bootstrapped before deploying
    pub bootstrap_registry: bool,
    /// Where the token address comes from
    pub token: TokenSource,
}

impl fmt::Display for DeploymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "network: {}", self.network)?;
        writeln!(f, "policy: {}", self.policy)?;
        writeln!(f, "bootstrap registry: {}", self.bootstrap_registry)?;
        match self.token {
            TokenSource::Deploy => write!(f, "token: deploy fresh"),
            TokenSource::Reuse(address) => write!(f, "token: reuse {:#x}", address),
        }
    }
}

/// The network policy table, along with the token addresses known for the
/// networks that reuse one
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Policy rows, keyed by exact network name
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkProfile>,
    /// Previously deployed token addresses, keyed by exact network name
    #[serde(default)]
    pub known_tokens: BTreeMap<String, Address>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let networks = BTreeMap::from([
            (
                DEVELOPMENT_NETWORK.to_string(),
                NetworkProfile {
                    policy: NetworkPolicy::DeployFreshToken,
                    bootstrap_registry: true,
                },
            ),
            (
                RINKEBY_UPDATE_NETWORK.to_string(),
                NetworkProfile {
                    policy: NetworkPolicy::ReuseKnownToken,
                    bootstrap_registry: false,
                },
            ),
        ]);
        let known_tokens =
            BTreeMap::from([(RINKEBY_UPDATE_NETWORK.to_string(), RINKEBY_TOKEN_ADDRESS)]);

        Self {
            networks,
            known_tokens,
        }
    }
}

impl NetworkConfig {
    /// Loads the default table, extended with the rows of the given JSON file.
    ///
    /// Rows in the file override default rows of the same network name.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ScriptError::ReadConfig(e.to_string()))?;
        let overrides: NetworkConfig =
            serde_json::from_str(&contents).map_err(|e| ScriptError::ReadConfig(e.to_string()))?;

        let mut config = Self::default();
        config.merge(overrides);
        Ok(config)
    }

    /// Loads the config at `path` if one is given, the defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ScriptError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Adds the rows of `other` to this table, overriding existing rows
    pub fn merge(&mut self, other: NetworkConfig) {
        self.networks.extend(other.networks);
        self.known_tokens.extend(other.known_tokens);
    }

    /// The profile of the given network; unknown networks get the default
    /// profile, a fresh deploy without registry bootstrapping
    pub fn profile(&self, network: &str) -> NetworkProfile {
        self.networks.get(network).copied().unwrap_or_default()
    }

    /// Classifies the given network
    pub fn classify(&self, network: &str) -> NetworkPolicy {
        self.profile(network).policy
    }

    /// Whether the ERC1820 registry must be bootstrapped on the given network
    pub fn needs_registry_bootstrap(&self, network: &str) -> bool {
        self.profile(network).bootstrap_registry
    }

    /// The previously deployed token on the given network, if any
    pub fn known_token(&self, network: &str) -> Option<Address> {
        self.known_tokens
            .get(network)
            .copied()
            .filter(|address| !address.is_zero())
    }

    /// Computes the deployment plan for the given network
    pub fn plan(&self, network: &str) -> Result<DeploymentPlan, DeployError> {
        let NetworkProfile {
            policy,
            bootstrap_registry,
        } = self.profile(network);

        let token = match policy {
            NetworkPolicy::DeployFreshToken => TokenSource::Deploy,
            NetworkPolicy::ReuseKnownToken => TokenSource::Reuse(
                self.known_token(network)
                    .ok_or_else(|| DeployError::MissingKnownToken(network.to_string()))?,
            ),
        };

        Ok(DeploymentPlan {
            network: network.to_string(),
            policy,
            bootstrap_registry,
            token,
        })
    }
}

/// Classifies the given network against the default table
pub fn classify(network: &str) -> NetworkPolicy {
    DEFAULT_CONFIG.classify(network)
}

/// Whether the given network needs the ERC1820 registry bootstrapped, according
/// to the default table
pub fn needs_registry_bootstrap(network: &str) -> bool {
    DEFAULT_CONFIG.needs_registry_bootstrap(network)
}
