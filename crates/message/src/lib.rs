//! HTTP messages for CGI programs
//!
//! This crate provides the message model a CGI program needs to handle its
//! one request and produce its one response: an ordered, case-insensitive
//! header store, a URI parser, and a request body decoder for url-encoded and
//! multipart forms, all working under configurable resource caps.
//!
//! # Features
//!
//! - Ordered, multi-valued headers with case-insensitive lookup
//! - URI decomposition and recomposition with scheme/host normalization
//! - `application/x-www-form-urlencoded` and `multipart/form-data` decoding
//! - Uploaded files that can be moved to their final location
//! - Cookies, query parameters, CGI variables and request attributes
//! - Typed extraction of query strings and form bodies through `serde`
//! - Bounded memory: header, body, file and line caps
//!
//! # Example
//!
//! ```
//! use micro_cgi_message::codec::Limits;
//! use micro_cgi_message::protocol::{ServerRequest, Stream};
//! use micro_cgi_message::uri::Uri;
//!
//! let env = [("CONTENT_TYPE", "application/x-www-form-urlencoded"), ("HTTP_USER_AGENT", "curl/8.0")];
//! let mut request = ServerRequest::new("POST", Uri::parse("/submit"), env, Limits::default()).unwrap();
//! request.set_body(Stream::from("name=Jane+Doe&lang=rust"));
//!
//! assert_eq!(request.header_line("user-agent"), "curl/8.0");
//! assert_eq!(request.body_param("name"), Some("Jane Doe"));
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`header`]: Header storage shared by every message
//! - [`uri`]: URI parsing and recomposition
//! - [`codec`]: Body decoding, percent decoding and CGI variable helpers
//! - [`protocol`]: Messages, requests, responses, streams and errors
//!
//! # Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request side errors
//! - [`protocol::SendError`]: Response side errors
//!
//! Malformed input is never an error. Unparsable URIs degrade to empty
//! components, broken escapes are kept verbatim and malformed body parts are
//! left out of the decoded tables. Only invalid arguments (an unknown method,
//! an out of range port or status) and I/O failures are reported.
//!
//! # Limitations
//!
//! - One request per process; no sockets, no keep-alive
//! - The request line and transfer framing are left to the web server
//! - Bodies are buffered in memory up to [`codec::Limits::max_body_bytes`]

pub mod codec;
pub mod header;
pub mod protocol;
pub mod uri;

mod utils;
