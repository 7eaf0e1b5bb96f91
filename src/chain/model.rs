use serde::{Deserialize, Serialize};

/// A mined block as seen by the draw pipeline: its height, hex hash and
/// (when the source provides one) its timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHash {
    pub height: u64,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl BlockHash {
    pub fn new(height: u64, hash: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            height,
            hash: hash.into(),
            timestamp,
        }
    }
}
