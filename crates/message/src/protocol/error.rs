use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("missing required environment variable '{name}'")]
    MissingVariable { name: &'static str },

    #[error("invalid http method '{method}'")]
    InvalidMethod { method: String },

    #[error("invalid port {port}, expect a value in [0, 65535]")]
    InvalidPort { port: u32 },

    #[error("invalid status code {code}")]
    InvalidStatus { code: u16 },

    #[error("uploaded file stream has already been moved")]
    StreamMoved,

    #[error("invalid query string: {reason}")]
    InvalidQuery { reason: String },

    #[error("invalid form body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn missing_variable(name: &'static str) -> Self {
        Self::MissingVariable { name }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_port(port: u32) -> Self {
        Self::InvalidPort { port }
    }

    pub fn invalid_status(code: u16) -> Self {
        Self::InvalidStatus { code }
    }

    pub fn invalid_query<S: ToString>(reason: S) -> Self {
        Self::InvalidQuery { reason: reason.to_string() }
    }

    pub fn invalid_body<S: ToString>(reason: S) -> Self {
        Self::InvalidBody { reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Whether this error rejects a caller-supplied argument, as opposed to a
    /// failure of the underlying stream.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::MissingVariable { .. } | Self::InvalidMethod { .. } | Self::InvalidPort { .. } | Self::InvalidStatus { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
