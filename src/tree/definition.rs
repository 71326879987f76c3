//! Serialized tree definition.
//!
//! This is the on-disk JSON shape. It is only used while loading; the
//! resolved tree lives in [`Node`](crate::tree::Node).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tree::node::Parameter;

/// A node as written in the definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeDefinition {
    /// Literal text or regular expression. Absent on the root.
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Children, one level down.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeDefinition>,

    /// Ordered parameters of this node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Own modification time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,

    /// File holding the body of this node, relative to the including file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    /// Level names. Only valid on the root.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
}

impl NodeDefinition {
    pub fn has_inline_body(&self) -> bool {
        !self.nodes.is_empty() || !self.parameters.is_empty() || self.modified.is_some()
    }
}
