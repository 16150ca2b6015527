//! Encoder for the head of a CGI response.
//!
//! A CGI program answers with header lines followed by a `Status` line and a
//! blank line; the web server turns that into a real HTTP status line. Every
//! value of a multi-valued header gets a line of its own.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{Response, SendError};

/// Initial buffer size allocated for head serialization
const INIT_HEAD_SIZE: usize = 1024;

/// Serializes the headers and status of a [`Response`].
///
/// ```
/// use bytes::BytesMut;
/// use micro_cgi_message::codec::HeadEncoder;
/// use micro_cgi_message::protocol::Response;
/// use tokio_util::codec::Encoder;
///
/// let mut response = Response::new(404, "").unwrap();
/// response.set_header("Content-Type", "text/plain");
///
/// let mut dst = BytesMut::new();
/// HeadEncoder.encode(&response, &mut dst).unwrap();
/// assert_eq!(&dst[..], b"Content-Type: text/plain\r\nStatus: 404 Not Found\r\n\r\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadEncoder;

impl Encoder<&Response> for HeadEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEAD_SIZE);

        for (name, values) in response.headers() {
            for value in values {
                dst.put_slice(name.as_bytes());
                dst.put_slice(b": ");
                dst.put_slice(value.as_bytes());
                dst.put_slice(b"\r\n");
            }
        }

        write!(FastWrite(dst), "Status: {} {}\r\n", response.status_code(), response.reason_phrase())?;
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writes straight into a `BytesMut`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
