//! Laika wire protocol: header constants, list headers and the request/response codec.
//!
//! # Request headers
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `Accept: application/json` | always set |
//! | `X-Requested-With: XMLHttpRequest` | always set |
//! | `X-Laika: 1` | marks a protocol-aware request |
//! | `X-Laika-Token` | echoes the state tree's token |
//! | `X-Laika-Force: 1` | bypass server-side staleness checks |
//! | `X-Laika-Require` | keys the server must include |
//! | `X-Laika-Only` | paths the server may restrict the response to |
//!
//! # Response signals
//!
//! | Signal | Meaning |
//! |--------|---------|
//! | `409` + `X-Laika-Location` | hard-redirect target |
//! | status not 2xx | hard fallback to the requested URL |
//! | `X-Laika-Only` | changed paths; empty or absent means full replace |

pub mod codec;
pub mod constants;
mod headers;

pub use codec::{decode_response, encode_request, EncodedRequest};
pub use headers::{format_list_header, is_flag_set, parse_list_header};
