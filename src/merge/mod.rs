//! Partial-payload merging.
//!
//! A partial response names the branches of the state tree it changed in the
//! `X-Laika-Only` header. The merger copies exactly those branches from the
//! response body onto a copy of the current tree.
//!
//! # Path kinds
//!
//! | Path | Effect |
//! |------|--------|
//! | `shared` | top-level key copied verbatim when present in the response |
//! | `shared.user.name` | single leaf written, siblings kept |
//! | `components.posts.props.items` | one lazily loaded component prop |
//!
//! # Examples
//!
//! ```
//! use laika_http::merge::merge_paths;
//! use serde_json::json;
//!
//! let current = json!({ "shared": { "user": { "name": "A", "age": 9 } } });
//! let next = json!({ "shared": { "user": { "name": "B" } } });
//!
//! let merged = merge_paths(&current, &next, &["shared.user.name"]);
//! assert_eq!(merged, json!({ "shared": { "user": { "name": "B", "age": 9 } } }));
//! ```
//!
//! # Ordering
//!
//! Paths are applied in the order supplied. Disjoint paths commute. Paths
//! where one prefixes another are caller error; they are applied in order and
//! reported through `tracing`. [`find_prefix_conflicts`] detects them up front.

mod patch;
mod path;

pub use patch::{extract, find_prefix_conflicts, merge, merge_paths, parse_paths};
pub use path::DotPath;

use crate::error::Result;
use crate::types::StateTree;
use serde_json::Value;

impl StateTree {
    /// Merge the branches of `next` named by `paths` into a new tree.
    pub fn merged(&self, next: &Value, paths: &[DotPath]) -> Result<StateTree> {
        StateTree::from_value(merge(&self.to_value()?, next, paths))
    }
}
