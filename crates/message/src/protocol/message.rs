use crate::header::{HeaderStore, HeaderValues, Headers};

use super::Stream;

/// State shared by requests and responses: protocol version, headers and a
/// body stream.
#[derive(Debug, Default)]
pub struct Message {
    protocol_version: String,
    headers: HeaderStore,
    body: Stream,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// The HTTP version number, e.g. `1.1`; empty until set.
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn set_protocol_version(&mut self, version: impl Into<String>) {
        self.protocol_version = version.into();
    }

    pub fn header_store(&self) -> &HeaderStore {
        &self.headers
    }

    pub fn header_store_mut(&mut self) -> &mut HeaderStore {
        &mut self.headers
    }

    pub fn headers(&self) -> Headers<'_> {
        self.headers.headers()
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.has_header(name)
    }

    pub fn header(&self, name: &str) -> HeaderValues<'_> {
        self.headers.header(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.headers.header_line(name)
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set_header(name, value);
    }

    pub fn set_added_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set_added_header(name, value);
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove_header(name);
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Stream {
        &mut self.body
    }

    /// Replaces the body, returning the previous one.
    pub fn set_body(&mut self, body: Stream) -> Stream {
        std::mem::replace(&mut self.body, body)
    }
}
