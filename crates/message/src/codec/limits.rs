//! Resource caps applied while ingesting a request.
//!
//! Hitting a cap never fails the request: the affected header, body or part
//! is truncated or skipped and a `tracing` event is emitted instead.

pub const DEFAULT_MAX_HEADER_COUNT: usize = 32;
pub const DEFAULT_MAX_HEADER_LENGTH: usize = 1024;
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;
pub const DEFAULT_MAX_FILE_BYTES: usize = 4 * 1024 * 1024;
pub const DEFAULT_MAX_LINE_BYTES: usize = 4 * 1024;

/// Caps for header ingestion and body decoding.
///
/// ```
/// use micro_cgi_message::codec::Limits;
///
/// let limits = Limits::default().with_max_file_bytes(1024).with_max_header_count(8);
/// assert_eq!(limits.max_file_bytes(), 1024);
/// assert_eq!(limits.max_header_count(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_header_count: usize,
    max_header_length: usize,
    max_body_bytes: usize,
    max_file_bytes: usize,
    max_line_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_count: DEFAULT_MAX_HEADER_COUNT,
            max_header_length: DEFAULT_MAX_HEADER_LENGTH,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl Limits {
    /// Number of `HTTP_*` variables turned into headers; the rest are ignored.
    pub fn max_header_count(&self) -> usize {
        self.max_header_count
    }

    /// Header values longer than this many bytes are truncated.
    pub fn max_header_length(&self) -> usize {
        self.max_header_length
    }

    /// Body bytes read from the input; the excess is never read.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Content bytes kept per multipart part.
    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Longest multipart header or boundary line.
    pub fn max_line_bytes(&self) -> usize {
        self.max_line_bytes
    }

    #[must_use]
    pub fn with_max_header_count(mut self, max_header_count: usize) -> Self {
        self.max_header_count = max_header_count;
        self
    }

    #[must_use]
    pub fn with_max_header_length(mut self, max_header_length: usize) -> Self {
        self.max_header_length = max_header_length;
        self
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    #[must_use]
    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    #[must_use]
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }
}
