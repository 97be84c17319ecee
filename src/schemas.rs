use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::HealthError;

/// Document served at `/pools`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BootstrapDoc {
    pub pools: Vec<PoolEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PoolEntry {
    pub name: String,
    pub uri: String,
}

/// Document served at the pool uri advertised by the bootstrap document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PoolDoc {
    pub nodes: Vec<NodeEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NodeEntry {
    pub status: String,
}

/// Decode a response body that must be a JSON object of shape `T`.
pub fn decode<T: DeserializeOwned>(what: &str, body: &str) -> Result<T, HealthError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| HealthError::InvalidResponse(format!("{what}: {e}")))?;
    if !root.is_object() {
        return Err(HealthError::InvalidResponse(format!(
            "{what}: expected a JSON object"
        )));
    }
    serde_json::from_value(root).map_err(|e| HealthError::InvalidResponse(format!("{what}: {e}")))
}
