use std::io::{self, Seek, Write};

use bytes::BytesMut;
use micro_cgi_message::codec::HeadEncoder;
use micro_cgi_message::protocol::{Response, SendError, Stream};
use tokio_util::codec::Encoder;
use tracing::{debug, trace};

/// Buffered CGI response output.
///
/// The head is encoded into an in-memory buffer and written out together
/// with the first body bytes.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: HeadEncoder,
}

impl<W> ResponseWriter<W>
where
    W: Write,
{
    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: HeadEncoder }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Header lines, the `Status` line and the blank separator line.
    pub fn write_head(&mut self, response: &Response) -> Result<(), SendError> {
        self.encoder.encode(response, &mut self.buffer)
    }

    /// Copies `body` from its start, or from its current position when it
    /// cannot seek. A closed body sends nothing.
    pub fn write_body(&mut self, body: &mut Stream) -> Result<(), SendError> {
        if !body.is_readable() {
            debug!("response body is closed, send head only");
            return self.flush();
        }

        if body.is_seekable() {
            body.rewind()?;
        }

        let head = self.buffer.len();
        self.flush_buffer()?;
        let copied = io::copy(body, &mut self.writer)?;
        trace!(head, body = copied, "sent response");
        Ok(self.writer.flush()?)
    }

    pub fn write(&mut self, response: &mut Response) -> Result<(), SendError> {
        self.write_head(response)?;
        self.write_body(response.body_mut())
    }

    #[inline]
    pub fn flush(&mut self) -> Result<(), SendError> {
        self.flush_buffer()?;
        Ok(self.writer.flush()?)
    }

    fn flush_buffer(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref())?;
        self.buffer.clear();
        Ok(())
    }
}
