//! Client request value object.
//!
//! A [`Request`] couples a [`Message`] with a method, a [`Uri`] and a request
//! target. It dereferences to its message so header and body operations are
//! available directly.

use std::ops::{Deref, DerefMut};

use http::Method;
use tracing::trace;

use super::{Message, ParseError};
use crate::uri::Uri;

const HOST: &str = "Host";

const STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
    Method::PATCH,
];

/// How [`Request::set_uri`] treats the `Host` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostHeader {
    /// Keep an existing `Host` header; only fill it in when absent.
    Preserve,
    /// Overwrite `Host` with the new URI host.
    #[default]
    Replace,
}

#[derive(Debug)]
pub struct Request {
    message: Message,
    method: Method,
    uri: Uri,
    request_target: Option<String>,
}

impl Request {
    /// Creates a request for one of the standard methods. Method names are
    /// case-sensitive.
    ///
    /// The `Host` header is set from the URI host when it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidMethod`] for anything but `GET`, `HEAD`,
    /// `POST`, `PUT`, `DELETE`, `CONNECT`, `OPTIONS`, `TRACE` and `PATCH`.
    pub fn new(method: &str, uri: Uri) -> Result<Self, ParseError> {
        let method = STANDARD_METHODS
            .iter()
            .find(|standard| standard.as_str() == method)
            .cloned()
            .ok_or_else(|| ParseError::invalid_method(method))?;

        let mut request = Self { message: Message::new(), method, uri, request_target: None };
        request.sync_host(HostHeader::Replace);
        Ok(request)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Sets any syntactically valid method token, standard or not.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidMethod`] when `method` is not a valid token.
    pub fn set_method(&mut self, method: &str) -> Result<(), ParseError> {
        self.method = Method::from_bytes(method.as_bytes()).map_err(|_| ParseError::invalid_method(method))?;
        Ok(())
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: Uri, host: HostHeader) {
        self.uri = uri;
        self.sync_host(host);
    }

    fn sync_host(&mut self, mode: HostHeader) {
        let host = self.uri.host();
        if host.is_empty() {
            return;
        }

        if mode == HostHeader::Preserve && self.message.has_header(HOST) {
            trace!(host, "keep existing host header");
            return;
        }

        self.message.set_header(HOST, host);
    }

    /// The explicit request target if one was set, otherwise the origin form
    /// `path[?query]` of the URI, or `/` when both are empty.
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.request_target {
            return target.clone();
        }

        let path = self.uri.path();
        let query = self.uri.query();
        match (path.is_empty(), query.is_empty()) {
            (true, true) => "/".to_owned(),
            (_, true) => path.to_owned(),
            (_, false) => format!("{path}?{query}"),
        }
    }

    pub fn set_request_target(&mut self, target: impl Into<String>) {
        self.request_target = Some(target.into());
    }

    pub fn into_message(self) -> Message {
        self.message
    }
}

impl Deref for Request {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}

impl DerefMut for Request {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.message
    }
}

impl AsRef<Message> for Request {
    fn as_ref(&self) -> &Message {
        &self.message
    }
}

impl AsMut<Message> for Request {
    fn as_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}
