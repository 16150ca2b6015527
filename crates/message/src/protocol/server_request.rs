//! Incoming request as seen by a CGI program.
//!
//! A [`ServerRequest`] is built from the request method, the request URI and
//! the CGI variables. On construction it ingests:
//!
//! - `HTTP_*` variables as headers, folded to their usual casing and capped by
//!   [`Limits::max_header_count`] and [`Limits::max_header_length`]
//! - the protocol version from `SERVER_PROTOCOL`
//! - cookies from the `Cookie` header
//! - query parameters from `QUERY_STRING`
//!
//! The body is decoded on first demand and only for `POST` requests with an
//! url-encoded or multipart content type. The decoded tables are kept for the
//! lifetime of the request.
//!
//! ```
//! use micro_cgi_message::codec::Limits;
//! use micro_cgi_message::protocol::ServerRequest;
//! use micro_cgi_message::uri::Uri;
//!
//! let env = [
//!     ("QUERY_STRING", "page=2"),
//!     ("HTTP_ACCEPT_LANGUAGE", "en"),
//!     ("SERVER_PROTOCOL", "HTTP/1.1"),
//! ];
//! let request = ServerRequest::new("GET", Uri::parse("/list?page=2"), env, Limits::default()).unwrap();
//!
//! assert_eq!(request.query_param("page"), Some("2"));
//! assert_eq!(request.header_line("accept-language"), "en");
//! assert_eq!(request.protocol_version(), "1.1");
//! ```

use std::ops::{Deref, DerefMut};

use http::Method;
use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::{FieldTable, FileTable, ParamTable, ParseError, Request, UploadedFile};
use crate::codec::body::{BodyDecoder, DecodedBody};
use crate::codec::{Limits, form_decode, form_pairs, header_name_from_env, truncate_on_char_boundary};
use crate::uri::Uri;

const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
const QUERY_STRING: &str = "QUERY_STRING";
const CONTENT_TYPE: &str = "CONTENT_TYPE";
const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
const COOKIE: &str = "Cookie";

#[derive(Debug)]
pub struct ServerRequest {
    request: Request,
    limits: Limits,
    server_params: ParamTable,
    cookie_params: ParamTable,
    query_params: ParamTable,
    attributes: ParamTable,
    decoded_body: OnceCell<DecodedBody>,
}

impl ServerRequest {
    /// Builds a request from CGI variables.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidMethod`] when `method` is not a standard
    /// HTTP method.
    pub fn new<I, N, V>(method: &str, uri: Uri, server_params: I, limits: Limits) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let request = Request::new(method, uri)?;
        let server_params: ParamTable =
            server_params.into_iter().map(|(name, value)| (name.into(), value.into())).collect();

        let mut server_request = Self {
            request,
            limits,
            server_params,
            cookie_params: ParamTable::new(),
            query_params: ParamTable::new(),
            attributes: ParamTable::new(),
            decoded_body: OnceCell::new(),
        };

        server_request.ingest_headers();
        server_request.ingest_protocol_version();
        server_request.cookie_params = parse_cookies(&server_request.header_line(COOKIE));
        server_request.query_params = form_pairs(server_request.query_string().as_bytes(), b'&').collect();

        Ok(server_request)
    }

    fn ingest_headers(&mut self) {
        let max_count = self.limits.max_header_count();
        let max_length = self.limits.max_header_length();

        let mut count = 0;
        for (variable, value) in &self.server_params {
            let Some(name) = header_name_from_env(variable) else {
                continue;
            };

            if count == max_count {
                debug!(limit = max_count, "too many request headers, ignore the rest");
                break;
            }
            count += 1;

            let mut value = value.clone();
            if value.len() > max_length {
                debug!(header = %name, len = value.len(), limit = max_length, "truncate long header value");
                truncate_on_char_boundary(&mut value, max_length);
            }
            self.request.set_header(name, value);
        }

        // the server passes the entity headers outside of HTTP_*
        for (variable, header) in [(CONTENT_TYPE, "Content-Type"), (CONTENT_LENGTH, "Content-Length")] {
            if let Some(value) = self.server_params.get(variable)
                && !value.is_empty()
                && !self.request.has_header(header)
            {
                self.request.set_header(header, value.clone());
            }
        }

        trace!(headers = self.request.header_store().len(), "ingested request headers");
    }

    fn ingest_protocol_version(&mut self) {
        let version = self
            .server_params
            .get(SERVER_PROTOCOL)
            .and_then(|protocol| protocol.split_once('/'))
            .map(|(_, version)| version)
            .filter(|version| !version.is_empty());

        if let Some(version) = version {
            self.request.set_protocol_version(version);
        }
    }

    fn query_string(&self) -> &str {
        match self.server_params.get(QUERY_STRING) {
            Some(query) => query,
            None => self.request.uri().query(),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// A CGI variable, e.g. `REMOTE_ADDR`.
    pub fn server_param(&self, name: &str) -> Option<&str> {
        self.server_params.get(name).map(String::as_str)
    }

    pub fn server_params(&self) -> &ParamTable {
        &self.server_params
    }

    pub fn cookie_param(&self, name: &str) -> Option<&str> {
        self.cookie_params.get(name).map(String::as_str)
    }

    pub fn cookie_params(&self) -> &ParamTable {
        &self.cookie_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    pub fn query_params(&self) -> &ParamTable {
        &self.query_params
    }

    /// Deserializes the query string.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidQuery`] when the query does not fit `T`.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, ParseError> {
        serde_qs::from_str::<T>(self.query_string()).map_err(ParseError::invalid_query)
    }

    /// Decodes the body once and returns the decoded tables.
    fn decoded(&mut self) -> &DecodedBody {
        let Self { request, limits, server_params, decoded_body, .. } = self;
        decoded_body.get_or_init(|| {
            if *request.method() != Method::POST {
                trace!(method = %request.method(), "skip decoding body of non POST request");
                return DecodedBody::default();
            }

            let content_type = match server_params.get(CONTENT_TYPE) {
                Some(content_type) => content_type.clone(),
                None => request.header_line("Content-Type"),
            };
            let decoder = BodyDecoder::new(&content_type, *limits);

            let mut body = match request.body_mut().contents() {
                Ok(body) => body,
                Err(e) => {
                    warn!(cause = %e, "failed to read request body, treat it as empty");
                    Vec::new()
                }
            };
            if body.len() > limits.max_body_bytes() {
                warn!(len = body.len(), limit = limits.max_body_bytes(), "request body too large, truncated");
                body.truncate(limits.max_body_bytes());
            }

            decoder.decode(&body)
        })
    }

    fn decoded_mut(&mut self) -> Option<&mut DecodedBody> {
        self.decoded();
        self.decoded_body.get_mut()
    }

    /// A decoded body field; the first one wins when the name repeats.
    pub fn body_param(&mut self, name: &str) -> Option<&str> {
        self.decoded().field(name)
    }

    pub fn body_params(&mut self) -> &FieldTable {
        self.decoded().fields()
    }

    /// Deserializes an url-encoded body.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidBody`] when the body does not fit `T`, or
    /// [`ParseError::Io`] when the body cannot be read.
    pub fn body_as<T: DeserializeOwned>(&mut self) -> Result<T, ParseError> {
        let body = self.request.body_mut().contents()?;
        serde_urlencoded::from_bytes::<T>(&body).map_err(ParseError::invalid_body)
    }

    pub fn uploaded_file(&mut self, name: &str) -> Option<&mut UploadedFile> {
        self.decoded_mut()?.files_mut().get_mut(name)
    }

    pub fn uploaded_files(&mut self) -> &FileTable {
        self.decoded().files()
    }

    /// Removes an uploaded file from the request, handing over ownership.
    pub fn take_uploaded_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.decoded_mut()?.files_mut().take(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The attribute `name`, or `default` when it was never set.
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute(name).unwrap_or(default)
    }

    pub fn attributes(&self) -> &ParamTable {
        &self.attributes
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.set(name, value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }
}

/// `name=value` pairs separated by `;`, with the spaces that usually follow
/// the separator skipped.
fn parse_cookies(line: &str) -> ParamTable {
    line.split(';')
        .map(|token| token.trim_start_matches(' '))
        .filter_map(|token| token.split_once('='))
        .map(|(name, value)| (form_decode(name.as_bytes()), form_decode(value.as_bytes())))
        .collect()
}

impl Deref for ServerRequest {
    type Target = Request;

    fn deref(&self) -> &Self::Target {
        &self.request
    }
}

impl DerefMut for ServerRequest {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.request
    }
}
