//! Wiki node types.

use serde::Deserialize;

/// Payload of wiki node creation and lookup responses.
#[derive(Debug, Deserialize)]
pub struct WikiNodeData {
    pub node: WikiNode,
}

/// A wiki node. `obj_token` addresses the backing document for content
/// writes; `node_token` addresses the node in the wiki tree.
#[derive(Debug, Deserialize)]
pub struct WikiNode {
    #[serde(default)]
    pub obj_token: String,
    #[serde(default)]
    pub node_token: String,
    #[serde(default)]
    pub space_id: String,
}
