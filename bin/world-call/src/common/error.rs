use alloy_primitives::hex::FromHexError;
use alloy_transport::TransportError;
use world_delegation::{DelegationError, DeployError};

/// Error types for the world-call commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// RPC transport error
    #[error("RPC transport error: {0}")]
    RpcTransport(#[from] TransportError),

    /// Delegation failed
    #[error("Delegation error: {0}")]
    Delegation(#[from] DelegationError),

    /// The World deployment could not be determined
    #[error("Deploy error: {0}")]
    Deploy(#[from] DeployError),

    /// An argument does not match its ABI type
    #[error("ABI error: {0}")]
    Abi(#[from] alloy_dyn_abi::Error),

    /// Failed to read file
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// Output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for the world-call commands
pub type Result<T> = std::result::Result<T, CliError>;
