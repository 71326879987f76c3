//! Tree definition loading.
//!
//! # Responsibilities
//! - Read the JSON definition file and every file it includes
//! - Compile `match` texts into patterns
//! - Validate the whole tree, collecting every problem found
//! - Precompute per-node ancestry modification times
//!
//! # Design Decisions
//! - Includes are resolved before validation, so errors point at the merged tree
//! - Validation reports all errors, not just the first
//! - Loading never touches a tree that is already being served

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::tree::definition::NodeDefinition;
use crate::tree::node::{latest, Node, Pattern};
use crate::tree::Configuration;

/// Errors raised while loading a tree definition.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("cannot read tree definition {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse tree definition {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("include cycle detected at {0}")]
    IncludeCycle(PathBuf),

    #[error("invalid include {path}: {reason}")]
    InvalidInclude { path: PathBuf, reason: &'static str },

    #[error("tree validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single semantic problem in a tree definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("level name must not be empty")]
    EmptyLevelName,

    #[error("level '{0}' is declared more than once")]
    DuplicateLevel(String),

    #[error("root node must not have a match")]
    RootMatch,

    #[error("node under '{parent}' has no match")]
    MissingMatch { parent: String },

    #[error("levels may only be declared on the root, found at '{0}'")]
    MisplacedLevels(String),

    #[error("node '{path}' has children but there are only {levels} levels")]
    TooDeep { path: String, levels: usize },

    #[error("match '{pattern}' appears more than once under '{parent}'")]
    DuplicateMatch { parent: String, pattern: String },

    #[error("parameter '{key}' appears more than once at '{path}'")]
    DuplicateParameter { path: String, key: String },

    #[error("node '{path}' has an invalid pattern: {reason}")]
    InvalidPattern { path: String, reason: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a tree from a definition file, following includes.
pub fn load_tree(path: &Path) -> Result<Configuration, TreeError> {
    let canonical = canonicalize(path)?;
    let mut root = read_definition(&canonical)?;
    let base = parent_dir(&canonical);
    let mut sources = vec![canonical.clone()];
    let mut stack = vec![canonical];
    resolve_includes(&mut root, &base, &mut stack, &mut sources)?;

    let configuration = build_configuration(root)?.with_sources(sources);
    tracing::debug!(
        path = %path.display(),
        nodes = configuration.node_count(),
        files = configuration.sources().len(),
        levels = ?configuration.levels(),
        "Tree definition loaded"
    );
    Ok(configuration)
}

/// Parse a tree from a JSON string. Includes resolve against `base_dir`.
pub fn parse_tree(json: &str, base_dir: &Path) -> Result<Configuration, TreeError> {
    let mut root: NodeDefinition =
        serde_json::from_str(json).map_err(|source| TreeError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
    let mut stack = Vec::new();
    let mut sources = Vec::new();
    resolve_includes(&mut root, base_dir, &mut stack, &mut sources)?;
    Ok(build_configuration(root)?.with_sources(sources))
}

/// Validate a fully resolved definition and build the immutable tree.
pub fn build_configuration(mut root: NodeDefinition) -> Result<Configuration, TreeError> {
    let levels = std::mem::take(&mut root.levels);
    let mut builder = TreeBuilder {
        levels: &levels,
        errors: Vec::new(),
    };
    builder.check_levels();
    if root.pattern.is_some() {
        builder.errors.push(ValidationError::RootMatch);
    }
    let root = builder.build(root, None, 0, "", None);

    if builder.errors.is_empty() {
        Ok(Configuration::new(root, levels))
    } else {
        Err(TreeError::Validation(builder.errors))
    }
}

fn read_definition(path: &Path) -> Result<NodeDefinition, TreeError> {
    let content = fs::read_to_string(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| TreeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn canonicalize(path: &Path) -> Result<PathBuf, TreeError> {
    path.canonicalize().map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Replace every `include` with the body of the file it names.
///
/// `stack` holds the files currently being expanded; `sources` collects
/// every file read.
fn resolve_includes(
    def: &mut NodeDefinition,
    base: &Path,
    stack: &mut Vec<PathBuf>,
    sources: &mut Vec<PathBuf>,
) -> Result<(), TreeError> {
    if let Some(include) = def.include.take() {
        let path = canonicalize(&base.join(&include))?;
        if def.has_inline_body() {
            return Err(TreeError::InvalidInclude {
                path,
                reason: "include cannot be combined with inline nodes, parameters or modified",
            });
        }
        if stack.contains(&path) {
            return Err(TreeError::IncludeCycle(path));
        }

        let mut included = read_definition(&path)?;
        if included.pattern.is_some() || !included.levels.is_empty() {
            return Err(TreeError::InvalidInclude {
                path,
                reason: "included definitions cannot declare a match or levels",
            });
        }

        let dir = parent_dir(&path);
        if !sources.contains(&path) {
            sources.push(path.clone());
        }
        stack.push(path);
        resolve_includes(&mut included, &dir, stack, sources)?;
        stack.pop();

        def.nodes = included.nodes;
        def.parameters = included.parameters;
        def.modified = included.modified;
        return Ok(());
    }

    for child in &mut def.nodes {
        resolve_includes(child, base, stack, sources)?;
    }
    Ok(())
}

struct TreeBuilder<'a> {
    levels: &'a [String],
    errors: Vec<ValidationError>,
}

impl TreeBuilder<'_> {
    fn check_levels(&mut self) {
        let mut seen = HashSet::new();
        for level in self.levels {
            if level.is_empty() {
                self.errors.push(ValidationError::EmptyLevelName);
            } else if !seen.insert(level.as_str()) {
                self.errors.push(ValidationError::DuplicateLevel(level.clone()));
            }
        }
    }

    fn build(
        &mut self,
        def: NodeDefinition,
        pattern: Option<Pattern>,
        depth: usize,
        location: &str,
        inherited: Option<DateTime<Utc>>,
    ) -> Node {
        let display = if location.is_empty() { "/" } else { location };

        if depth > 0 && !def.levels.is_empty() {
            self.errors
                .push(ValidationError::MisplacedLevels(display.to_string()));
        }
        if !def.nodes.is_empty() && depth >= self.levels.len() {
            self.errors.push(ValidationError::TooDeep {
                path: display.to_string(),
                levels: self.levels.len(),
            });
        }

        let mut keys = HashSet::new();
        for parameter in &def.parameters {
            if !keys.insert(parameter.key.as_str()) {
                self.errors.push(ValidationError::DuplicateParameter {
                    path: display.to_string(),
                    key: parameter.key.clone(),
                });
            }
        }

        let ancestry = latest(inherited, def.modified);
        let mut seen = HashSet::new();
        let mut children = Vec::with_capacity(def.nodes.len());
        for child in def.nodes {
            let Some(text) = child.pattern.clone() else {
                self.errors.push(ValidationError::MissingMatch {
                    parent: display.to_string(),
                });
                continue;
            };
            if !seen.insert(text.clone()) {
                self.errors.push(ValidationError::DuplicateMatch {
                    parent: display.to_string(),
                    pattern: text.clone(),
                });
            }

            let child_location = format!("{location}/{text}");
            match Pattern::parse(&text) {
                Ok(child_pattern) => {
                    let node =
                        self.build(child, Some(child_pattern), depth + 1, &child_location, ancestry);
                    children.push(node);
                }
                Err(e) => self.errors.push(ValidationError::InvalidPattern {
                    path: child_location,
                    reason: e.to_string(),
                }),
            }
        }

        Node::new(pattern, def.parameters, children, def.modified, inherited)
    }
}
