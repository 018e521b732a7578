use thiserror::Error;

use crate::core::types::NodeId;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    #[error("Missing node: {0}")]
    MissingNode(NodeId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
