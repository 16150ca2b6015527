use bytes::{Bytes, BytesMut};

/// Append-only buffer with a hard cap. Bytes beyond the cap are dropped and
/// the buffer remembers that it was truncated.
#[derive(Debug)]
pub(crate) struct ContentBuffer {
    buf: BytesMut,
    cap: usize,
    truncated: bool,
}

impl ContentBuffer {
    pub(crate) fn new(cap: usize) -> Self {
        Self { buf: BytesMut::new(), cap, truncated: false }
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        let room = self.cap - self.buf.len();
        if bytes.len() > room {
            self.truncated = true;
            self.buf.extend_from_slice(&bytes[..room]);
        } else {
            self.buf.extend_from_slice(bytes);
        }
    }

    /// Hands out the collected bytes and resets the buffer for the next part.
    pub(crate) fn take(&mut self) -> (Bytes, bool) {
        let truncated = std::mem::take(&mut self.truncated);
        (self.buf.split().freeze(), truncated)
    }

    pub(crate) fn clear(&mut self) {
        self.buf.clear();
        self.truncated = false;
    }
}
