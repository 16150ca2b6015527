//! HTTP message value objects for CGI programs.
//!
//! This module provides the request and response types a CGI program works
//! with, together with the byte streams and tables they carry.
//!
//! # Architecture
//!
//! - **Messages** ([`message`]): protocol version, headers and body shared by
//!   both directions
//!   - [`Message`]: the shared part
//!   - [`Request`]: method, URI and request target on top of a message
//!   - [`Response`]: status code and reason phrase on top of a message
//!
//! - **Server side** ([`server_request`]): the incoming request of a CGI
//!   program
//!   - [`ServerRequest`]: CGI variables, cookies, query and body parameters,
//!     uploaded files and attributes
//!   - [`UploadedFile`] / [`UploadError`]: files received in multipart bodies
//!   - [`ParamTable`]: ordered name/value tables backing all parameters
//!
//! - **Streams** ([`stream`]): [`Stream`], the in-memory or file-backed body
//!
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request side errors
//!   - [`SendError`]: Response side errors

pub mod message;
pub use message::Message;

pub mod request;
pub use request::HostHeader;
pub use request::Request;

pub mod response;
pub use response::Response;

pub mod server_request;
pub use server_request::ServerRequest;

pub mod params;
pub use params::FieldTable;
pub use params::FileTable;
pub use params::ParamTable;
pub use params::Params;

pub mod stream;
pub use stream::Stream;

pub mod uploaded_file;
pub use uploaded_file::UploadError;
pub use uploaded_file::UploadedFile;

pub mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
