//! Compiled contract artifacts.
//!
//! Artifacts are the JSON files emitted by the Solidity toolchain, one per
//! contract. Both the Truffle layout (`"bytecode": "0x..."`) and the Foundry
//! layout (`"bytecode": { "object": "0x..." }`) are accepted.

use std::{collections::HashMap, fs, path::Path};

use alloy::primitives::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::ARTIFACT_EXTENSION,
    errors::{DeployError, ScriptError},
    types::{ContractDescriptor, ContractName},
};

/// The bytecode field of an artifact, in either supported layout
#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    /// Truffle: the bytecode as a hex string
    Hex(Bytes),
    /// Foundry: the bytecode nested under `object`
    Object {
        /// The bytecode as a hex string
        object: Bytes,
    },
}

/// The subset of an artifact file needed to deploy the contract
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    /// The contract name, absent in Foundry artifacts
    #[serde(default)]
    contract_name: Option<String>,
    /// The creation bytecode
    bytecode: BytecodeField,
}

/// A compiled contract, ready to be deployed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractArtifact {
    /// The contract this artifact was compiled from
    pub name: ContractName,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parses an artifact from its JSON representation
    pub fn from_json(name: ContractName, json: &str) -> Result<Self, ScriptError> {
        let file: ArtifactFile =
            serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        if let Some(contract_name) = file.contract_name {
            if contract_name != name.artifact_name() {
                return Err(ScriptError::ArtifactParsing(format!(
                    "expected artifact for {}, found {}",
                    name, contract_name
                )));
            }
        }

        let bytecode = match file.bytecode {
            BytecodeField::Hex(bytes) | BytecodeField::Object { object: bytes } => bytes,
        };
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "artifact for {} has no bytecode",
                name
            )));
        }

        Ok(Self { name, bytecode })
    }

    /// The creation code deploying this contract with the descriptor's
    /// constructor arguments
    pub fn creation_code(&self, descriptor: &ContractDescriptor) -> Bytes {
        let args = descriptor.encoded_args();
        let mut code = Vec::with_capacity(self.bytecode.len() + args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&args);
        code.into()
    }
}

/// The set of artifacts available to deploy from
#[derive(Clone, Debug, Default)]
pub struct ArtifactStore {
    /// The artifacts, keyed by contract
    artifacts: HashMap<ContractName, ContractArtifact>,
}

impl ArtifactStore {
    /// Loads the artifacts of all known contracts present in the given directory.
    ///
    /// Contracts without an artifact file are skipped; deploying them fails
    /// later with [`DeployError::MissingArtifact`].
    pub fn load_dir(dir: &Path) -> Result<Self, ScriptError> {
        let mut store = Self::default();
        for name in ContractName::ALL {
            let path = dir
                .join(name.artifact_name())
                .with_extension(ARTIFACT_EXTENSION);
            if !path.exists() {
                debug!("no artifact for {} at {}", name, path.display());
                continue;
            }

            let json = fs::read_to_string(&path)
                .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
            store.insert(ContractArtifact::from_json(name, &json)?);
        }

        Ok(store)
    }

    /// Adds an artifact to the store, replacing any for the same contract
    pub fn insert(&mut self, artifact: ContractArtifact) {
        self.artifacts.insert(artifact.name, artifact);
    }

    /// The artifact of the given contract
    pub fn get(&self, name: ContractName) -> Result<&ContractArtifact, DeployError> {
        self.artifacts
            .get(&name)
            .ok_or(DeployError::MissingArtifact(name))
    }

    /// Whether an artifact is available for the given contract
    pub fn contains(&self, name: ContractName) -> bool {
        self.artifacts.contains_key(&name)
    }
}

impl FromIterator<ContractArtifact> for ArtifactStore {
    fn from_iter<I: IntoIterator<Item = ContractArtifact>>(iter: I) -> Self {
        let mut store = Self::default();
        iter.into_iter().for_each(|artifact| store.insert(artifact));
        store
    }
}
