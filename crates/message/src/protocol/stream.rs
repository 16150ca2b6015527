//! Byte stream used for message bodies and uploaded files.
//!
//! A [`Stream`] is backed either by an in-memory buffer or by a file handle.
//! It implements [`Read`], [`Write`] and [`Seek`], and adds the handful of
//! inspection helpers a CGI program needs (`size`, `eof`, `contents`, ...).
//! Every operation on a closed or detached stream fails with an I/O error.

use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};

#[derive(Debug)]
enum Backing {
    Memory(Cursor<Vec<u8>>),
    File(File),
}

#[derive(Debug)]
pub struct Stream {
    backing: Option<Backing>,
}

fn closed() -> io::Error {
    io::Error::new(ErrorKind::NotConnected, "stream is closed")
}

impl Default for Stream {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream {
    /// An empty in-memory stream.
    pub fn new() -> Self {
        Self { backing: Some(Backing::Memory(Cursor::new(Vec::new()))) }
    }

    /// An in-memory stream holding `bytes`, positioned at the start.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { backing: Some(Backing::Memory(Cursor::new(bytes.into()))) }
    }

    /// A stream over an open file, positioned wherever the file handle is.
    pub fn from_file(file: File) -> Self {
        Self { backing: Some(Backing::File(file)) }
    }

    fn backing(&mut self) -> io::Result<&mut Backing> {
        self.backing.as_mut().ok_or_else(closed)
    }

    /// Reads at most `len` bytes from the current position.
    pub fn read_up_to(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(8 * 1024));
        Read::by_ref(self).take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Current position from the start of the stream.
    pub fn tell(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    /// Total size in bytes.
    pub fn size(&mut self) -> io::Result<u64> {
        match self.backing()? {
            Backing::Memory(cursor) => Ok(cursor.get_ref().len() as u64),
            Backing::File(file) => file.metadata().map(|metadata| metadata.len()),
        }
    }

    /// Whether the position is at or past the end.
    pub fn eof(&mut self) -> io::Result<bool> {
        let position = self.tell()?;
        Ok(position >= self.size()?)
    }

    /// The whole stream from the start. The position is left unchanged.
    pub fn contents(&mut self) -> io::Result<Vec<u8>> {
        match self.backing()? {
            Backing::Memory(cursor) => Ok(cursor.get_ref().clone()),
            Backing::File(file) => {
                let position = file.stream_position()?;
                file.seek(SeekFrom::Start(0))?;
                let mut contents = Vec::new();
                let read = file.read_to_end(&mut contents);
                file.seek(SeekFrom::Start(position))?;
                read.map(|_| contents)
            }
        }
    }

    pub fn is_seekable(&self) -> bool {
        self.backing.is_some()
    }

    pub fn is_readable(&self) -> bool {
        self.backing.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.backing.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.backing.is_none()
    }

    /// Releases the underlying buffer or file handle.
    pub fn close(&mut self) {
        self.backing = None;
    }

    /// Hands out the underlying file, leaving the stream closed. An in-memory
    /// stream is closed and yields `None`.
    pub fn detach(&mut self) -> Option<File> {
        match self.backing.take() {
            Some(Backing::File(file)) => Some(file),
            _ => None,
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.backing()? {
            Backing::Memory(cursor) => cursor.read(buf),
            Backing::File(file) => file.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.backing()? {
            Backing::Memory(cursor) => cursor.write(buf),
            Backing::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.backing()? {
            Backing::Memory(cursor) => cursor.flush(),
            Backing::File(file) => file.flush(),
        }
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.backing()? {
            Backing::Memory(cursor) => cursor.seek(pos),
            Backing::File(file) => file.seek(pos),
        }
    }
}

impl From<Vec<u8>> for Stream {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for Stream {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl From<File> for Stream {
    fn from(file: File) -> Self {
        Self::from_file(file)
    }
}
