//! Partial-payload merging.

use super::path::DotPath;
use serde_json::{Map, Value};

/// Parse raw path strings, skipping empty entries and malformed paths.
pub fn parse_paths<S: AsRef<str>>(paths: &[S]) -> Vec<DotPath> {
    paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|raw| !raw.trim().is_empty())
        .filter_map(|raw| match raw.parse::<DotPath>() {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!("Skipping patch path: {}", err);
                None
            }
        })
        .collect()
}

/// Pairs `(shorter, longer)` where the first path is a strict prefix of the second.
///
/// Overlapping paths are caller error. [`merge`] still applies them in the
/// order given and logs a warning.
pub fn find_prefix_conflicts(paths: &[DotPath]) -> Vec<(DotPath, DotPath)> {
    let mut conflicts = Vec::new();
    for a in paths {
        for b in paths {
            if a.is_prefix_of(b) {
                conflicts.push((a.clone(), b.clone()));
            }
        }
    }
    conflicts
}

/// Apply the branches of `next` named by `paths` onto a copy of `current`.
///
/// Paths are applied in the order given. A path that cannot be resolved in
/// `next` contributes nothing. Neither input is modified.
pub fn merge(current: &Value, next: &Value, paths: &[DotPath]) -> Value {
    for (shorter, longer) in find_prefix_conflicts(paths) {
        tracing::warn!(
            "Patch paths '{}' and '{}' overlap, applying in the order given",
            shorter,
            longer
        );
    }

    let mut out = current.clone();
    if !out.is_object() && !paths.is_empty() {
        out = Value::Object(Map::new());
    }

    for path in paths {
        if let Some(value) = path.lookup(next) {
            path.insert(&mut out, value.clone());
        }
    }

    out
}

/// Like [`merge`], with unparsed path strings.
pub fn merge_paths<S: AsRef<str>>(current: &Value, next: &Value, paths: &[S]) -> Value {
    merge(current, next, &parse_paths(paths))
}

/// Build a tree holding only the branches of `source` named by `paths`.
///
/// This is the sending side of a partial response.
pub fn extract(source: &Value, paths: &[DotPath]) -> Value {
    let mut out = Value::Object(Map::new());
    for path in paths {
        if let Some(value) = path.lookup(source) {
            path.insert(&mut out, value.clone());
        }
    }
    out
}
