//! Decoding of CGI request input and encoding of the response head.
//!
//! This module turns the raw pieces a CGI server hands a program into
//! message data:
//!
//! - [`body`]: url-encoded and multipart request bodies
//! - [`form_decode`] / [`form_pairs`]: form-style percent decoding shared by
//!   bodies, query strings and cookies
//! - [`header_name_from_env`] / [`split_env_entry`]: `HTTP_*` variables to
//!   header names
//! - [`Limits`]: resource caps applied throughout
//! - [`HeadEncoder`]: the header and `Status` lines of a CGI response
//!
//! # Example
//!
//! ```
//! use micro_cgi_message::codec::Limits;
//! use micro_cgi_message::codec::body::BodyDecoder;
//!
//! let decoder = BodyDecoder::new("application/x-www-form-urlencoded", Limits::default());
//! let decoded = decoder.decode(b"name=Jane+Doe&lang=rust");
//!
//! assert_eq!(decoded.field("name"), Some("Jane Doe"));
//! assert_eq!(decoded.field("lang"), Some("rust"));
//! ```

pub mod body;
mod env;
mod head_encoder;
mod limits;
mod percent;

pub use env::header_name_from_env;
pub use env::split_env_entry;
pub(crate) use env::truncate_on_char_boundary;
pub use head_encoder::HeadEncoder;
pub use limits::Limits;
pub use limits::{
    DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_HEADER_COUNT, DEFAULT_MAX_HEADER_LENGTH,
    DEFAULT_MAX_LINE_BYTES,
};
pub use percent::FormPairs;
pub use percent::form_decode;
pub use percent::form_pairs;
