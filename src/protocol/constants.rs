//! Protocol constants.

/// Header names used by the Laika protocol.
pub mod headers {
    use http::HeaderName;

    /// Marks a protocol-aware request
    pub const LAIKA: HeaderName = HeaderName::from_static("x-laika");

    /// Echo of the state tree's opaque token
    pub const TOKEN: HeaderName = HeaderName::from_static("x-laika-token");

    /// Bypass server-side staleness checks
    pub const FORCE: HeaderName = HeaderName::from_static("x-laika-force");

    /// Top-level keys the server must include
    pub const REQUIRE: HeaderName = HeaderName::from_static("x-laika-require");

    /// Request: paths wanted. Response: paths changed.
    pub const ONLY: HeaderName = HeaderName::from_static("x-laika-only");

    /// Hard-redirect target sent with status 409
    pub const LOCATION: HeaderName = HeaderName::from_static("x-laika-location");

    /// Classic AJAX marker
    pub const REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
}

/// Header values used by the Laika protocol.
pub mod values {
    /// Value of `X-Laika` and `X-Laika-Force`
    pub const ENABLED: &str = "1";

    /// Value of `X-Requested-With`
    pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

    /// Accepted and sent content type
    pub const JSON: &str = "application/json";
}

/// Status code signalling a hard redirect.
pub const STATUS_REDIRECT: u16 = 409;

/// Separator between segments of a dot-path.
pub const PATH_SEPARATOR: char = '.';

/// Separator between entries of a list header.
pub const LIST_SEPARATOR: char = ',';
