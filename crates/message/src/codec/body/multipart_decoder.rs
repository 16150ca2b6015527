//! Decoder for `multipart/form-data` bodies.
//!
//! The body is consumed line by line (`\n` or `\r\n` terminated). A line that
//! starts with `--` and contains the boundary token separates parts; a
//! boundary followed by `--` closes the body and everything after it is
//! ignored.
//!
//! The terminator of every content line is held back until more content
//! follows, so the line break in front of a boundary never ends up in a part.

use bytes::{Bytes, BytesMut};
use memchr::{memchr, memmem};
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};
use MultipartState::*;

use super::content_buffer::ContentBuffer;
use crate::codec::Limits;
use crate::codec::percent::form_decode;
use crate::protocol::{ParseError, Stream, UploadError, UploadedFile};

const CONTENT_DISPOSITION: &str = "Content-Disposition";
const CONTENT_TYPE: &str = "Content-Type";

const CRLF: &[u8] = b"\r\n";
const LF: &[u8] = b"\n";
const NONE: &[u8] = b"";

/// A completed part of a multipart body.
#[derive(Debug)]
pub enum Part {
    Field { name: String, value: String },
    File { name: String, file: UploadedFile },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultipartState {
    /// Skip everything before the first boundary
    Preamble,
    /// Read part header lines up to the blank line
    Headers,
    /// Collect content up to the next boundary
    Content,
    /// Closing boundary seen
    End,
}

#[derive(Debug, Default)]
struct PartHead {
    name: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
    unparsable: bool,
}

/// Streaming decoder turning a multipart body into [`Part`]s.
///
/// Content beyond `max_file_bytes` is dropped and marks a file part with
/// [`UploadError::IniSize`]. A header line longer than `max_line_bytes` makes
/// its part unparsable and the part is skipped.
#[derive(Debug)]
pub struct MultipartDecoder {
    boundary: Bytes,
    max_file_bytes: usize,
    max_line_bytes: usize,
    state: MultipartState,
    head: PartHead,
    content: ContentBuffer,
    pending_terminator: &'static [u8],
    // the start of the current line was already consumed
    mid_line: bool,
}

impl MultipartDecoder {
    /// `boundary` is the bare token from the content type, without the
    /// leading `--`.
    pub fn new(boundary: &str, limits: &Limits) -> Self {
        Self {
            boundary: Bytes::copy_from_slice(boundary.as_bytes()),
            max_file_bytes: limits.max_file_bytes(),
            max_line_bytes: limits.max_line_bytes(),
            state: Preamble,
            head: PartHead::default(),
            content: ContentBuffer::new(limits.max_file_bytes()),
            pending_terminator: NONE,
            mid_line: false,
        }
    }

    /// `Some(is_closing)` when `text` is a boundary line.
    fn match_boundary(&self, text: &[u8]) -> Option<bool> {
        let rest = text.strip_prefix(b"--")?;
        let index = if rest.starts_with(&self.boundary) { 0 } else { memmem::find(rest, &self.boundary)? };
        let tail = &rest[index + self.boundary.len()..];
        Some(tail.trim_ascii_start().starts_with(b"--"))
    }

    fn on_line(&mut self, line: &[u8]) -> Option<Part> {
        let (text, terminator) = split_terminator(line);

        if self.mid_line {
            self.mid_line = false;
            if self.state == Content {
                self.push_content(text, terminator);
            }
            return None;
        }

        if line.len() <= self.max_line_bytes
            && let Some(closing) = self.match_boundary(text)
        {
            return self.on_boundary(closing);
        }

        match self.state {
            Preamble | End => None,
            Headers => {
                self.on_header_line(text, line.len());
                None
            }
            Content => {
                self.push_content(text, terminator);
                None
            }
        }
    }

    /// Handles a line that grew past `max_line_bytes` without a terminator.
    /// A trailing `\r` stays in `src`, it may start the terminator.
    fn on_overlong_fragment(&mut self, src: &mut BytesMut) {
        let held = usize::from(src.len() > 1 && src.ends_with(b"\r"));
        let fragment = src.split_to(src.len() - held);
        match self.state {
            Content => self.push_content(&fragment, NONE),
            Headers => {
                if !self.head.unparsable {
                    debug!(limit = self.max_line_bytes, "multipart header line too long, skip part");
                }
                self.head.unparsable = true;
            }
            Preamble | End => trace!(len = fragment.len(), "skip long line outside of parts"),
        }
        self.mid_line = true;
    }

    fn push_content(&mut self, bytes: &[u8], terminator: &'static [u8]) {
        let pending = std::mem::replace(&mut self.pending_terminator, terminator);
        self.content.extend(pending);
        self.content.extend(bytes);
    }

    fn on_header_line(&mut self, text: &[u8], len: usize) {
        if len > self.max_line_bytes {
            debug!(len, limit = self.max_line_bytes, "multipart header line too long, skip part");
            self.head.unparsable = true;
            return;
        }

        if text.is_empty() {
            self.state = Content;
            self.pending_terminator = NONE;
            return;
        }

        let text = String::from_utf8_lossy(text);
        let Some((name, value)) = text.split_once(':') else {
            trace!(line = %text, "ignore malformed part header");
            return;
        };

        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case(CONTENT_DISPOSITION) {
            for (key, value) in disposition_params(value) {
                if key.eq_ignore_ascii_case("name") {
                    self.head.name = Some(value);
                } else if key.eq_ignore_ascii_case("filename") {
                    self.head.filename = Some(value);
                }
            }
        } else if name.eq_ignore_ascii_case(CONTENT_TYPE) {
            self.head.content_type = Some(value.to_owned());
        }
    }

    fn on_boundary(&mut self, closing: bool) -> Option<Part> {
        let part = match self.state {
            Preamble => {
                trace!("first multipart boundary");
                None
            }
            Headers | Content => self.finish_part(),
            End => None,
        };

        self.head = PartHead::default();
        self.content.clear();
        self.pending_terminator = NONE;
        self.state = if closing { End } else { Headers };
        part
    }

    fn finish_part(&mut self) -> Option<Part> {
        let head = std::mem::take(&mut self.head);
        let (content, truncated) = self.content.take();

        if head.unparsable {
            debug!(len = content.len(), "skip unparsable multipart part");
            return None;
        }

        let Some(name) = head.name else {
            debug!(len = content.len(), "drop multipart part without name");
            return None;
        };

        let media_type = head.content_type.unwrap_or_default();
        match head.filename {
            Some(filename) if filename.is_empty() => {
                trace!(name = %name, "file part without a file");
                let file = UploadedFile::new(Stream::new(), 0, UploadError::NoFile, filename, media_type);
                Some(Part::File { name, file })
            }
            Some(filename) => {
                let error = if truncated {
                    warn!(name = %name, filename = %filename, limit = self.max_file_bytes, "uploaded file too large, truncated");
                    UploadError::IniSize
                } else {
                    UploadError::Ok
                };
                let size = content.len() as u64;
                trace!(name = %name, filename = %filename, size, "decoded file part");
                let file = UploadedFile::new(Stream::from_bytes(Vec::from(content)), size, error, filename, media_type);
                Some(Part::File { name, file })
            }
            None => {
                if truncated {
                    warn!(name = %name, limit = self.max_file_bytes, "form field too large, truncated");
                }
                trace!(name = %name, len = content.len(), "decoded field part");
                Some(Part::Field { name, value: form_decode(&content) })
            }
        }
    }

    fn close(&mut self) {
        if self.state == Content || self.head.name.is_some() {
            debug!("multipart body ended without a closing boundary, drop the open part");
        }
        self.state = End;
        self.head = PartHead::default();
        self.content.clear();
    }
}

impl Decoder for MultipartDecoder {
    type Item = Part;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if self.state == End {
                if !src.is_empty() {
                    trace!(len = src.len(), "ignore multipart epilogue");
                    src.clear();
                }
                return Ok(None);
            }

            let Some(index) = memchr(b'\n', src) else {
                if src.len() > self.max_line_bytes {
                    self.on_overlong_fragment(src);
                }
                // need more data
                return Ok(None);
            };

            let line = src.split_to(index + 1);
            if let Some(part) = self.on_line(&line) {
                return Ok(Some(part));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(part) = self.decode(src)? {
            return Ok(Some(part));
        }

        // the last line may come without a terminator
        if !src.is_empty() {
            let line = src.split();
            if let Some(part) = self.on_line(&line) {
                return Ok(Some(part));
            }
        }

        if self.state != End {
            self.close();
        }
        Ok(None)
    }
}

fn split_terminator(line: &[u8]) -> (&[u8], &'static [u8]) {
    match line {
        [text @ .., b'\r', b'\n'] => (text, CRLF),
        [text @ .., b'\n'] => (text, LF),
        _ => (line, NONE),
    }
}

/// `key=value` parameters of a `Content-Disposition` value. Semicolons inside
/// quotes do not split.
fn disposition_params(value: &str) -> impl Iterator<Item = (&str, String)> {
    split_unquoted(value).into_iter().filter_map(|segment| {
        let (key, value) = segment.split_once('=')?;
        Some((key.trim(), unquote(value.trim()).to_owned()))
    })
}

fn split_unquoted(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (index, c) in value.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                segments.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(&value[start..]);
    segments
}

/// Strips one pair of surrounding double quotes.
pub(super) fn unquote(value: &str) -> &str {
    value.strip_prefix('"').and_then(|value| value.strip_suffix('"')).unwrap_or(value)
}
