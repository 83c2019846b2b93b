//! Extraction of a World deployment from its deployment logs.
//!
//! A World emits `HelloWorld(bytes32 indexed worldVersion)` and its store emits
//! `HelloStore(bytes32 indexed storeVersion)` in the deployment transaction. The logs are folded
//! in order; when a kind of event occurs more than once the last one wins.

use alloy_primitives::{Address, BlockNumber, B256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};
use tracing::trace;
use world_contracts::IWorldEvents::{HelloStore, HelloWorld};

/// A deployed World.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDeploy {
    /// The World address.
    pub address: Address,
    /// The block the World was deployed in.
    pub deploy_block: BlockNumber,
    /// The World version.
    pub world_version: String,
    /// The store version.
    pub store_version: String,
}

/// Error types for deployment extraction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    /// A deployment event does not have the expected topics
    #[error("malformed {0} log")]
    MalformedEvent(&'static str),
    /// No deployment log was found
    #[error("could not find world address")]
    MissingAddress,
    /// The deployment logs carry no block number
    #[error("could not find world deploy block number")]
    MissingDeployBlock,
    /// No `HelloWorld` log was found
    #[error("could not find world version")]
    MissingWorldVersion,
    /// No `HelloStore` log was found
    #[error("could not find store version")]
    MissingStoreVersion,
}

#[derive(Debug, Default)]
struct PartialDeploy {
    address: Option<Address>,
    deploy_block: Option<BlockNumber>,
    world_version: Option<String>,
    store_version: Option<String>,
}

/// Builds a [`WorldDeploy`] from the deployment logs of a World. Logs of other events are
/// ignored.
pub fn logs_to_world_deploy(logs: &[Log]) -> Result<WorldDeploy, DeployError> {
    let mut deploy = PartialDeploy::default();

    for log in logs {
        let topics = log.topics();
        let (name, version) = match topics.first() {
            Some(topic) if *topic == HelloWorld::SIGNATURE_HASH => {
                ("HelloWorld", &mut deploy.world_version)
            }
            Some(topic) if *topic == HelloStore::SIGNATURE_HASH => {
                ("HelloStore", &mut deploy.store_version)
            }
            _ => continue,
        };
        let [_, version_topic] = topics else {
            return Err(DeployError::MalformedEvent(name));
        };
        trace!(
            event = name,
            address = %log.address(),
            block = ?log.block_number,
            "Found deploy log"
        );

        *version = Some(version_string(version_topic));
        deploy.address = Some(log.address());
        deploy.deploy_block = log.block_number;
    }

    Ok(WorldDeploy {
        address: deploy.address.ok_or(DeployError::MissingAddress)?,
        deploy_block: deploy.deploy_block.ok_or(DeployError::MissingDeployBlock)?,
        world_version: deploy.world_version.ok_or(DeployError::MissingWorldVersion)?,
        store_version: deploy.store_version.ok_or(DeployError::MissingStoreVersion)?,
    })
}

/// Decodes a right-padded `bytes32` version string.
fn version_string(word: &B256) -> String {
    String::from_utf8_lossy(word.as_slice()).trim_end_matches('\0').to_string()
}
