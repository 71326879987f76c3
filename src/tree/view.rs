//! Serializable view of a subtree, as returned by path lookups.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tree::node::{Node, Parameter};

/// A node and everything below it.
///
/// `levels` is only filled in for the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView<'a> {
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<&'a str>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeView<'a>>,

    #[serde(skip_serializing_if = "slice_is_empty")]
    pub parameters: &'a [Parameter],

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "slice_is_empty")]
    pub levels: &'a [String],
}

fn slice_is_empty<T>(slice: &&[T]) -> bool {
    slice.is_empty()
}

impl<'a> NodeView<'a> {
    /// View of `node`; pass the level list only when `node` is the root.
    pub fn new(node: &'a Node, levels: &'a [String]) -> Self {
        Self {
            pattern: node.pattern().map(|p| p.as_str()),
            nodes: node.children().iter().map(|c| NodeView::new(c, &[])).collect(),
            parameters: node.parameters(),
            modified: node.modified(),
            levels,
        }
    }
}
