//! Utilities for the deploy scripts.

use std::{fs, path::Path};

use serde_json::{Map, Value};

use crate::{errors::ScriptError, types::DeployedContract};

/// Reads the deployments file, an empty object if the file does not exist yet
pub fn read_deployments(file_path: &Path) -> Result<Map<String, Value>, ScriptError> {
    if !file_path.exists() {
        return Ok(Map::new());
    }

    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
    match serde_json::from_str(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ScriptError::ReadDeployments(
            "deployments file is not a JSON object".to_string(),
        )),
        Err(e) => Err(ScriptError::ReadDeployments(e.to_string())),
    }
}

/// Records the addresses of the given contracts under the network's entry in
/// the deployments file, creating the file if it does not exist.
///
/// Entries for other networks and other contracts are left untouched.
pub fn write_deployed_addresses(
    file_path: &Path,
    network: &str,
    contracts: &[DeployedContract],
) -> Result<(), ScriptError> {
    let mut deployments = read_deployments(file_path)?;

    let entry = deployments
        .entry(network.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(entry) = entry else {
        return Err(ScriptError::WriteDeployments(format!(
            "entry for {} is not a JSON object",
            network
        )));
    };
    for contract in contracts {
        entry.insert(
            contract.name.artifact_name().to_string(),
            Value::String(format!("{:#x}", contract.address)),
        );
    }

    let json = serde_json::to_string_pretty(&Value::Object(deployments))
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, json).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}
