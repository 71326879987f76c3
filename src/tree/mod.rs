//! Configuration tree subsystem.
//!
//! # Data Flow
//! ```text
//! tree definition (JSON, with includes)
//!     → loader.rs (read, resolve includes, validate, compile patterns)
//!     → Configuration (immutable root Node + level list)
//!     → shared via Arc<ArcSwap<Configuration>> with all request handlers
//!
//! On reload:
//!     config watcher sees the definition change
//!     → loader.rs builds a complete new Configuration
//!     → atomic swap; in-flight requests keep their snapshot
//! ```
//!
//! # Design Decisions
//! - Nodes own their children; no back-pointers
//! - Patterns are compiled once at load time
//! - Ancestry modification time is stored on every node

pub mod definition;
pub mod loader;
pub mod node;
pub mod view;

use std::path::{Path, PathBuf};

pub use loader::{TreeError, ValidationError};
pub use node::{Node, Parameter, Pattern};
pub use view::NodeView;

/// The root node plus the ordered level names searches are expressed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    root: Node,
    levels: Vec<String>,
    sources: Vec<PathBuf>,
}

impl Configuration {
    pub(crate) fn new(root: Node, levels: Vec<String>) -> Self {
        Self {
            root,
            levels,
            sources: Vec::new(),
        }
    }

    pub(crate) fn with_sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.sources = sources;
        self
    }

    /// A tree with a bare root and no levels.
    pub fn empty() -> Self {
        Self::new(
            Node::new(None, Vec::new(), Vec::new(), None, None),
            Vec::new(),
        )
    }

    /// Load from a definition file.
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        loader::load_tree(path)
    }

    /// Parse from JSON text; includes resolve against the working directory.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        loader::parse_tree(json, Path::new("."))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Canonical paths of every definition file read, root file first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_len()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::empty()
    }
}
