//! Files received through `multipart/form-data` bodies.

use std::fs::File;
use std::io::{self, Seek};
use std::path::Path;

use tracing::debug;

use super::{ParseError, Stream};

/// Outcome of receiving an uploaded file.
///
/// The numeric codes are the conventional CGI upload error codes, so they can
/// be reported to clients that already know them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UploadError {
    Ok = 0,
    /// The file exceeded the configured per-file cap and was truncated.
    IniSize = 1,
    /// The file exceeded a size declared by the form.
    FormSize = 2,
    /// The file was only partially received.
    Partial = 3,
    /// The part declared an empty filename.
    NoFile = 4,
    NoTmpDir = 6,
    CantWrite = 7,
    Extension = 8,
}

impl UploadError {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == UploadError::Ok
    }
}

/// A received file together with the metadata the client sent along.
///
/// [`client_filename`](Self::client_filename) and
/// [`client_media_type`](Self::client_media_type) come straight from the
/// request and must not be trusted.
#[derive(Debug)]
pub struct UploadedFile {
    stream: Option<Stream>,
    size: u64,
    error: UploadError,
    client_filename: String,
    client_media_type: String,
}

impl UploadedFile {
    pub fn new(
        stream: Stream,
        size: u64,
        error: UploadError,
        client_filename: impl Into<String>,
        client_media_type: impl Into<String>,
    ) -> Self {
        Self {
            stream: Some(stream),
            size,
            error,
            client_filename: client_filename.into(),
            client_media_type: client_media_type.into(),
        }
    }

    /// The file contents.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseError::StreamMoved`] after [`move_to`](Self::move_to).
    pub fn stream(&mut self) -> Result<&mut Stream, ParseError> {
        self.stream.as_mut().ok_or(ParseError::StreamMoved)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn error(&self) -> UploadError {
        self.error
    }

    pub fn client_filename(&self) -> &str {
        &self.client_filename
    }

    pub fn client_media_type(&self) -> &str {
        &self.client_media_type
    }

    pub fn is_moved(&self) -> bool {
        self.stream.is_none()
    }

    /// Copies the contents into a newly created file at `path` and releases
    /// the stream. Can only succeed once.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseError::StreamMoved`] when the file was already moved,
    /// or with [`ParseError::Io`] when the destination cannot be written.
    pub fn move_to(&mut self, path: impl AsRef<Path>) -> Result<(), ParseError> {
        let path = path.as_ref();
        let stream = self.stream.as_mut().ok_or(ParseError::StreamMoved)?;

        stream.rewind()?;
        let mut target = File::create(path)?;
        let copied = io::copy(stream, &mut target)?;
        target.sync_all()?;

        debug!(path = %path.display(), bytes = copied, "moved uploaded file");
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("micro-cgi-{name}-{}", std::process::id()))
    }

    #[test]
    fn error_codes() {
        assert_eq!(UploadError::Ok.code(), 0);
        assert_eq!(UploadError::IniSize.code(), 1);
        assert_eq!(UploadError::FormSize.code(), 2);
        assert_eq!(UploadError::Partial.code(), 3);
        assert_eq!(UploadError::NoFile.code(), 4);
        assert_eq!(UploadError::NoTmpDir.code(), 6);
        assert_eq!(UploadError::CantWrite.code(), 7);
        assert_eq!(UploadError::Extension.code(), 8);
        assert!(UploadError::Ok.is_ok());
        assert!(!UploadError::NoFile.is_ok());
    }

    #[test]
    fn metadata() {
        let mut file = UploadedFile::new(Stream::from("Hello, World!"), 13, UploadError::Ok, "hello.txt", "text/plain");

        assert_eq!(file.size(), 13);
        assert_eq!(file.error(), UploadError::Ok);
        assert_eq!(file.client_filename(), "hello.txt");
        assert_eq!(file.client_media_type(), "text/plain");
        assert_eq!(file.stream().unwrap().contents().unwrap(), b"Hello, World!");
    }

    #[test]
    fn move_to_copies_from_start() {
        let path = temp_path("move-to");
        let mut stream = Stream::from("Hello, World!");
        stream.read_up_to(5).unwrap();

        let mut file = UploadedFile::new(stream, 13, UploadError::Ok, "hello.txt", "text/plain");
        file.move_to(&path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"Hello, World!");
        assert!(file.is_moved());
        assert!(matches!(file.stream(), Err(ParseError::StreamMoved)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn second_move_fails() {
        let path = temp_path("move-twice");
        let mut file = UploadedFile::new(Stream::from("x"), 1, UploadError::Ok, "x.txt", "text/plain");

        file.move_to(&path).unwrap();
        let err = file.move_to(&path).unwrap_err();
        assert!(matches!(err, ParseError::StreamMoved));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_move_keeps_stream() {
        let path = temp_path("missing-dir").join("nested").join("file.txt");
        let mut file = UploadedFile::new(Stream::from("x"), 1, UploadError::Ok, "x.txt", "text/plain");

        let err = file.move_to(&path).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(!file.is_moved());
    }
}
