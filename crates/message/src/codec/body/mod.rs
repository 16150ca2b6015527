//! Request body decoding.
//!
//! Turns a raw request body into decoded form fields and uploaded files.
//!
//! # Components
//!
//! - [`BodyKind`]: picks the decoding strategy from the content type
//! - [`BodyDecoder`]: runs the strategy over a complete body
//! - [`MultipartDecoder`]: streaming `multipart/form-data` decoder
//! - [`DecodedBody`]: the resulting field and file tables
//!
//! Malformed input never fails decoding: the affected field or file is just
//! absent from the result.

mod content_buffer;
mod form_decoder;
mod multipart_decoder;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

pub use multipart_decoder::MultipartDecoder;
pub use multipart_decoder::Part;

use super::Limits;
use crate::protocol::{FieldTable, FileTable, UploadedFile};

const BOUNDARY_PARAM: &str = "boundary=";

/// Body encodings the decoder understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyKind {
    /// `application/x-www-form-urlencoded`
    UrlEncoded,
    /// `multipart/form-data` with its boundary token
    Multipart { boundary: String },
    /// Anything else; the body is left alone
    Unsupported,
}

impl BodyKind {
    /// Inspects a `Content-Type` value. The media type is matched
    /// case-sensitively.
    ///
    /// ```
    /// use micro_cgi_message::codec::body::BodyKind;
    ///
    /// assert_eq!(BodyKind::detect("application/x-www-form-urlencoded"), BodyKind::UrlEncoded);
    /// assert_eq!(
    ///     BodyKind::detect(r#"multipart/form-data; boundary="abc""#),
    ///     BodyKind::Multipart { boundary: "abc".into() }
    /// );
    /// assert_eq!(BodyKind::detect("text/plain"), BodyKind::Unsupported);
    /// ```
    pub fn detect(content_type: &str) -> Self {
        if content_type.contains(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()) {
            return BodyKind::UrlEncoded;
        }

        if content_type.contains(mime::MULTIPART_FORM_DATA.essence_str()) {
            return match boundary_param(content_type) {
                Some(boundary) => BodyKind::Multipart { boundary: boundary.to_owned() },
                None => {
                    debug!(content_type, "multipart content type without boundary");
                    BodyKind::Unsupported
                }
            };
        }

        BodyKind::Unsupported
    }
}

/// The value of `boundary=`, up to `;` or the end, trimmed and unquoted.
fn boundary_param(content_type: &str) -> Option<&str> {
    let start = content_type.find(BOUNDARY_PARAM)? + BOUNDARY_PARAM.len();
    let value = &content_type[start..];
    let value = value.split(';').next().unwrap_or(value).trim();
    let boundary = multipart_decoder::unquote(value);
    (!boundary.is_empty()).then_some(boundary)
}

/// Field and file tables produced by decoding a body.
#[derive(Debug, Default)]
pub struct DecodedBody {
    fields: FieldTable,
    files: FileTable,
}

impl DecodedBody {
    /// Looks up the first decoded field named `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Looks up the first uploaded file named `name`.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub fn files(&self) -> &FileTable {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut FileTable {
        &mut self.files
    }

    pub fn into_parts(self) -> (FieldTable, FileTable) {
        (self.fields, self.files)
    }
}

/// Decodes complete request bodies.
#[derive(Debug, Clone)]
pub struct BodyDecoder {
    kind: BodyKind,
    limits: Limits,
}

impl BodyDecoder {
    pub fn new(content_type: &str, limits: Limits) -> Self {
        Self { kind: BodyKind::detect(content_type), limits }
    }

    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    pub fn decode(&self, body: &[u8]) -> DecodedBody {
        match &self.kind {
            BodyKind::UrlEncoded => DecodedBody { fields: form_decoder::decode_form(body), files: FileTable::new() },
            BodyKind::Multipart { boundary } => self.decode_multipart(boundary, body),
            BodyKind::Unsupported => {
                trace!(len = body.len(), "body is neither url-encoded nor multipart, skip decoding");
                DecodedBody::default()
            }
        }
    }

    fn decode_multipart(&self, boundary: &str, body: &[u8]) -> DecodedBody {
        let mut decoder = MultipartDecoder::new(boundary, &self.limits);
        let mut src = BytesMut::from(body);
        let mut decoded = DecodedBody::default();

        loop {
            match decoder.decode_eof(&mut src) {
                Ok(Some(Part::Field { name, value })) => decoded.fields.insert(name, value),
                Ok(Some(Part::File { name, file })) => decoded.files.insert(name, file),
                Ok(None) => break,
                Err(e) => {
                    warn!(cause = %e, "stop decoding multipart body");
                    break;
                }
            }
        }

        trace!(fields = decoded.fields.len(), files = decoded.files.len(), "decoded multipart body");
        decoded
    }
}
