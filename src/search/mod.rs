//! Search subsystem.
//!
//! # Data Flow
//! ```text
//! Search request (?level=value[,value...])
//!     → expander.rs (parse, validate separators, positional expansion)
//!     → resolver.rs (one walk per search-term set)
//!         → matcher.rs (literal first, then first matching regex)
//!     → Vec<SearchResult> in combination order
//!
//! Path request (/tree/a/b/c)
//!     → path.rs (literal-only walk)
//!     → &Node or NotFound
//! ```
//!
//! # Design Decisions
//! - Pure functions over an immutable tree (no locks)
//! - Deterministic: same query and tree always give the same results
//! - Reaching only the root is a result, not an error

pub mod expander;
pub mod matcher;
pub mod path;
pub mod resolver;

pub use expander::{expand, LevelQuery, SearchTerms};
pub use matcher::{match_level, LevelMatch, MatchKind};
pub use path::find_node;
pub use resolver::{resolve, resolve_all, SearchResult};
