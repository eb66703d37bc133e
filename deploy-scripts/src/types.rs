//! Type definitions used throughout the deploy scripts

use std::fmt::{self, Display};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, TxHash},
};

/// The contracts managed by the deploy scripts
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractName {
    /// The ERC777 token contract
    SmartysToken,
    /// The transport contract, parameterized by the token address
    TransportContract,
    /// The order contract, parameterized by the token address
    OrderContract,
}

impl ContractName {
    /// All of the contracts, in deployment order
    pub const ALL: [ContractName; 3] = [
        ContractName::SmartysToken,
        ContractName::TransportContract,
        ContractName::OrderContract,
    ];

    /// The name of the compiled artifact for this contract, which is also the
    /// key it is recorded under in the deployments file
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ContractName::SmartysToken => "SmartysToken",
            ContractName::TransportContract => "TransportContract",
            ContractName::OrderContract => "OrderContract",
        }
    }
}

impl Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_name())
    }
}

/// A request to deploy a contract with the given constructor arguments
#[derive(Clone, Debug, PartialEq)]
pub struct ContractDescriptor {
    /// The contract to deploy
    pub name: ContractName,
    /// The constructor arguments, in declaration order
    pub constructor_args: Vec<DynSolValue>,
}

impl ContractDescriptor {
    /// A descriptor for a contract whose constructor takes no arguments
    pub fn new(name: ContractName) -> Self {
        Self {
            name,
            constructor_args: Vec::new(),
        }
    }

    /// A descriptor for a contract whose constructor takes only the token address
    pub fn with_token(name: ContractName, token_address: Address) -> Self {
        Self {
            name,
            constructor_args: vec![DynSolValue::Address(token_address)],
        }
    }

    /// ABI-encodes the constructor arguments, ready to be appended to the
    /// contract's creation bytecode
    pub fn encoded_args(&self) -> Bytes {
        if self.constructor_args.is_empty() {
            return Bytes::new();
        }

        DynSolValue::Tuple(self.constructor_args.clone())
            .abi_encode_params()
            .into()
    }
}

/// A contract that was successfully deployed during this run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    /// The deployed contract
    pub name: ContractName,
    /// The address at which the contract was created
    pub address: Address,
    /// The hash of the contract creation transaction
    pub tx_hash: TxHash,
}

impl Display for DeployedContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:#x}", self.name, self.address)
    }
}
