//! Shared header parsing and formatting for the Laika protocol.
//!
//! # Header Formats
//!
//! | Header | Format | Example |
//! |--------|--------|---------|
//! | X-Laika-Only | comma-separated dot-paths | `shared.user, page` |
//! | X-Laika-Require | comma-separated keys | `shared,theme` |
//! | X-Laika-Force | flag | `1` |
//!
//! # Examples
//!
//! ```
//! use laika_http::protocol::{parse_list_header, format_list_header, is_flag_set};
//!
//! let paths = parse_list_header(Some(" shared.user, ,page "));
//! assert_eq!(paths, vec!["shared.user", "page"]);
//!
//! let header = format_list_header(&paths);
//! assert_eq!(header, "shared.user,page");
//!
//! assert!(is_flag_set(Some("1")));
//! ```

use super::constants::LIST_SEPARATOR;

/// Parse a comma-separated list header.
///
/// Entries are trimmed and empty entries dropped. A missing or empty header
/// yields an empty list.
///
/// # Examples
///
/// ```
/// use laika_http::protocol::parse_list_header;
///
/// assert!(parse_list_header(None).is_empty());
/// assert!(parse_list_header(Some("")).is_empty());
/// assert_eq!(parse_list_header(Some("a,b")), vec!["a", "b"]);
/// ```
pub fn parse_list_header(value: Option<&str>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };

    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a list header value (comma-joined, no spaces).
pub fn format_list_header<S: AsRef<str>>(entries: &[S]) -> String {
    entries
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Interpret a flag header (`1`, `true`, `yes`, case-insensitive).
pub fn is_flag_set(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some(v) => v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"),
        None => false,
    }
}
