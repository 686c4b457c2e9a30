//! Request encoding and response decoding.
//!
//! # Request
//!
//! Every request carries `Accept: application/json`,
//! `X-Requested-With: XMLHttpRequest` and `X-Laika: 1`. Caller headers are
//! applied next and may override those defaults; the option-driven protocol
//! headers are applied last.
//!
//! # Response
//!
//! | Status | Headers | Outcome |
//! |--------|---------|---------|
//! | 409 | `X-Laika-Location` | [`Outcome::Redirect`] |
//! | other non-2xx | | [`Outcome::Rejected`] |
//! | 2xx | `X-Laika-Only` (optional) | [`Outcome::Success`] |

use super::constants::{headers, values, STATUS_REDIRECT};
use super::headers::{format_list_header, parse_list_header};
use crate::error::{LaikaError, Result};
use crate::types::{Outcome, PageResponse, RawResponse, VisitOptions};
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

/// A request ready to be handed to a transport.
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: Url,
    /// Complete header set
    pub headers: HeaderMap,
    /// JSON body, `None` for GET
    pub body: Option<Bytes>,
}

/// Build the wire request for a visit.
///
/// `token` is the current state tree's token, if it has one.
pub fn encode_request(url: Url, options: &VisitOptions, token: Option<&str>) -> Result<EncodedRequest> {
    let mut map = HeaderMap::new();
    map.insert(ACCEPT, HeaderValue::from_static(values::JSON));
    map.insert(
        headers::REQUESTED_WITH,
        HeaderValue::from_static(values::XML_HTTP_REQUEST),
    );
    map.insert(headers::LAIKA, HeaderValue::from_static(values::ENABLED));

    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| LaikaError::InvalidHeader(format!("bad header name '{}'", name)))?;
        map.insert(name, header_value(value)?);
    }

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        map.insert(headers::TOKEN, header_value(token)?);
    }
    if options.force {
        map.insert(headers::FORCE, HeaderValue::from_static(values::ENABLED));
    }
    if !options.require.is_empty() {
        map.insert(headers::REQUIRE, header_value(&format_list_header(&options.require))?);
    }
    if !options.only.is_empty() {
        map.insert(headers::ONLY, header_value(&format_list_header(&options.only))?);
    }

    let body = if options.method == Method::GET {
        None
    } else {
        map.insert(CONTENT_TYPE, HeaderValue::from_static(values::JSON));
        let data = options
            .data
            .clone()
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
        Some(Bytes::from(serde_json::to_vec(&data)?))
    };

    Ok(EncodedRequest {
        method: options.method.clone(),
        url,
        headers: map,
        body,
    })
}

/// Classify a response.
///
/// Only a 2xx body is decoded; a body that is not JSON is a
/// [`LaikaError::Decode`] error.
pub fn decode_response(response: &RawResponse) -> Result<Outcome> {
    if response.status == STATUS_REDIRECT {
        if let Some(location) = response.header(headers::LOCATION.as_str()) {
            return Ok(Outcome::Redirect(location.to_string()));
        }
    }

    if !response.is_success() {
        return Ok(Outcome::Rejected(response.status));
    }

    let only = parse_list_header(response.header(headers::ONLY.as_str()));
    let body = response.json()?;

    Ok(Outcome::Success(PageResponse { body, only }))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| LaikaError::InvalidHeader(format!("bad header value '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("http://localhost/blog").unwrap()
    }

    #[test]
    fn test_default_headers() {
        let request = encode_request(url(), &VisitOptions::new(), None).unwrap();

        assert_eq!(request.headers[ACCEPT], "application/json");
        assert_eq!(request.headers[headers::REQUESTED_WITH], "XMLHttpRequest");
        assert_eq!(request.headers[headers::LAIKA], "1");
        assert!(request.headers.get(headers::TOKEN).is_none());
        assert!(request.headers.get(headers::FORCE).is_none());
        assert!(request.headers.get(CONTENT_TYPE).is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_option_headers() {
        let options = VisitOptions::new()
            .force()
            .with_require(["shared", "theme"])
            .with_only(["components.posts.props.items"]);
        let request = encode_request(url(), &options, Some("tok")).unwrap();

        assert_eq!(request.headers[headers::TOKEN], "tok");
        assert_eq!(request.headers[headers::FORCE], "1");
        assert_eq!(request.headers[headers::REQUIRE], "shared,theme");
        assert_eq!(request.headers[headers::ONLY], "components.posts.props.items");
    }

    #[test]
    fn test_empty_token_is_not_sent() {
        let request = encode_request(url(), &VisitOptions::new(), Some("")).unwrap();
        assert!(request.headers.get(headers::TOKEN).is_none());
    }

    #[test]
    fn test_user_headers_override_defaults() {
        let options = VisitOptions::new().with_header("Accept", "text/html");
        let request = encode_request(url(), &options, None).unwrap();
        assert_eq!(request.headers[ACCEPT], "text/html");
    }

    #[test]
    fn test_invalid_user_header() {
        let options = VisitOptions::new().with_header("bad header", "x");
        let err = encode_request(url(), &options, None).unwrap_err();
        assert!(matches!(err, LaikaError::InvalidHeader(_)));
    }

    #[test]
    fn test_post_body() {
        let options = VisitOptions::new()
            .with_method(Method::POST)
            .with_data(json!({ "title": "Hello" }));
        let request = encode_request(url(), &options, None).unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({ "title": "Hello" }));
    }

    #[test]
    fn test_delete_without_data_sends_empty_object() {
        let options = VisitOptions::new().with_method(Method::DELETE);
        let request = encode_request(url(), &options, None).unwrap();
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_decode_redirect() {
        let response = RawResponse::new(409, "").with_header("X-Laika-Location", "/foo");
        assert_eq!(
            decode_response(&response).unwrap(),
            Outcome::Redirect("/foo".into())
        );
    }

    #[test]
    fn test_decode_conflict_without_location_is_rejected() {
        let response = RawResponse::new(409, "");
        assert_eq!(decode_response(&response).unwrap(), Outcome::Rejected(409));
    }

    #[test]
    fn test_decode_rejected() {
        let response = RawResponse::new(500, "<html>oops</html>");
        assert_eq!(decode_response(&response).unwrap(), Outcome::Rejected(500));
    }

    #[test]
    fn test_decode_success_full() {
        let response = RawResponse::new(200, r#"{"page":{"component":"Home"}}"#);
        match decode_response(&response).unwrap() {
            Outcome::Success(page) => {
                assert!(!page.is_partial());
                assert_eq!(page.body["page"]["component"], "Home");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_decode_success_partial() {
        let response = RawResponse::new(200, r#"{"shared":{"user":{"name":"B"}}}"#)
            .with_header("X-Laika-Only", "shared.user.name, ");
        match decode_response(&response).unwrap() {
            Outcome::Success(page) => assert_eq!(page.only, vec!["shared.user.name"]),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_decode_invalid_body() {
        let response = RawResponse::new(200, "not json");
        let err = decode_response(&response).unwrap_err();
        assert!(err.is_transport_failure());
    }
}
