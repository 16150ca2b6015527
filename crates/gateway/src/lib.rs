//! CGI entry point
//!
//! A CGI program receives its request as environment variables plus the body
//! on standard input, and answers on standard output. [`Gateway`] turns the
//! first two into a [`ServerRequest`] and writes a [`Response`] back in the
//! CGI wire format.
//!
//! # Example
//!
//! ```no_run
//! use micro_cgi_gateway::{Gateway, environment};
//! use micro_cgi_message::protocol::{Response, Stream};
//!
//! let mut gateway = Gateway::default();
//! let request = gateway.server_request(environment(), std::io::stdin().lock()).unwrap();
//! let name = request.query_param("name").unwrap_or("world").to_owned();
//!
//! let mut response = Response::default();
//! response.set_header("Content-Type", "text/plain");
//! response.set_body(Stream::from(format!("hello {name}").into_bytes()));
//! gateway.emit_response(&mut response, std::io::stdout().lock()).unwrap();
//! ```
//!
//! Logs go through `tracing`; install a subscriber writing to standard error,
//! standard output belongs to the response.

mod config;
mod writer;

pub use config::DEFAULT_READ_BUFFER_SIZE;
pub use config::GatewayConfig;
pub use writer::ResponseWriter;

use std::io::{self, Read};

use micro_cgi_message::codec::split_env_entry;
use micro_cgi_message::protocol::{HttpError, ParseError, Response, ServerRequest, Stream};
use micro_cgi_message::uri::Uri;
use tracing::{debug, warn};

const REQUEST_METHOD: &str = "REQUEST_METHOD";
const REQUEST_URI: &str = "REQUEST_URI";
const CONTENT_LENGTH: &str = "CONTENT_LENGTH";

/// Owns the single request of a CGI process.
#[derive(Debug, Default)]
pub struct Gateway {
    config: GatewayConfig,
    server_request: Option<ServerRequest>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config, server_request: None }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The request described by `env` with its body read from `input`.
    ///
    /// Only the first call reads its arguments; later calls hand back the
    /// request built then.
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingVariable`] without `REQUEST_METHOD` or
    /// `REQUEST_URI`, [`ParseError::InvalidMethod`] for an unknown method and
    /// [`ParseError::Io`] when `input` cannot be read.
    pub fn server_request<I, N, V>(&mut self, env: I, input: impl Read) -> Result<&mut ServerRequest, HttpError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let request = match self.server_request.take() {
            Some(request) => request,
            None => self.read_request(env, input)?,
        };
        Ok(self.server_request.insert(request))
    }

    fn read_request<I, N, V>(&self, env: I, input: impl Read) -> Result<ServerRequest, ParseError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let env: Vec<(String, String)> = env.into_iter().map(|(name, value)| (name.into(), value.into())).collect();
        let variable = |name: &'static str| {
            env.iter()
                .find(|(variable, _)| variable == name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| ParseError::missing_variable(name))
        };

        let method = variable(REQUEST_METHOD)?;
        let uri = Uri::parse(&variable(REQUEST_URI)?);
        let declared_length = variable(CONTENT_LENGTH).ok().and_then(|length| length.trim().parse::<usize>().ok());

        let limits = *self.config.limits();
        let mut request = ServerRequest::new(&method, uri, env, limits)?;

        let max_body_bytes = limits.max_body_bytes();
        if let Some(length) = declared_length
            && length > max_body_bytes
        {
            warn!(length, limit = max_body_bytes, "request body exceeds the limit, read a truncated body");
        }

        let body = read_body(input, max_body_bytes, self.config.read_buffer_size())?;
        debug!(method = %method, uri = %request.uri(), body = body.len(), "read cgi request");
        request.set_body(Stream::from(body));

        Ok(request)
    }

    /// Writes `response` to `output` in the CGI wire format.
    ///
    /// # Errors
    ///
    /// [`SendError::Io`](micro_cgi_message::protocol::SendError::Io) when
    /// `output` or the body fail.
    pub fn emit_response(&self, response: &mut Response, output: impl io::Write) -> Result<(), HttpError> {
        let mut writer = ResponseWriter::with_capacity(output, self.config.read_buffer_size());
        writer.write(response)?;
        Ok(())
    }
}

fn read_body(input: impl Read, limit: usize, chunk_size: usize) -> Result<Vec<u8>, ParseError> {
    let mut input = input.take(limit as u64);
    let mut body = Vec::with_capacity(chunk_size.min(limit));
    input.read_to_end(&mut body)?;
    Ok(body)
}

/// Variables of the current process. Names and values that are not valid
/// UTF-8 are converted lossily.
pub fn environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .map(|(name, value)| (name.to_string_lossy().into_owned(), value.to_string_lossy().into_owned()))
        .collect()
}

/// Pairs from raw `NAME=VALUE` entries, the shape a CGI environment block
/// comes in. Entries without `=` are skipped.
///
/// ```
/// use micro_cgi_gateway::environment_from_entries;
///
/// let env = environment_from_entries(["REQUEST_METHOD=GET", "QUERY_STRING=a=1&b=2", "BROKEN"]);
/// assert_eq!(env, [("REQUEST_METHOD".to_owned(), "GET".to_owned()), ("QUERY_STRING".to_owned(), "a=1&b=2".to_owned())]);
/// ```
pub fn environment_from_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<(String, String)> {
    entries
        .into_iter()
        .filter_map(split_env_entry)
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use indoc::indoc;
    use micro_cgi_message::codec::Limits;

    use super::*;

    fn env<'a>(pairs: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        pairs.to_vec()
    }

    #[test]
    fn builds_request_from_env_and_input() {
        let mut gateway = Gateway::default();
        let env = env(&[
            ("REQUEST_METHOD", "GET"),
            ("REQUEST_URI", "/foo/bar"),
            ("SERVER_PROTOCOL", "HTTP/1.0"),
            ("HTTP_USER_AGENT", "curl/8.0"),
        ]);

        let request = gateway.server_request(env, Cursor::new("Hello, World!")).unwrap();

        assert_eq!(request.method().as_str(), "GET");
        assert_eq!(request.uri().path(), "/foo/bar");
        assert_eq!(request.protocol_version(), "1.0");
        assert_eq!(request.header_line("User-Agent"), "curl/8.0");
        assert_eq!(request.server_param("REQUEST_URI"), Some("/foo/bar"));
        assert_eq!(request.body_mut().contents().unwrap(), b"Hello, World!");
    }

    #[test]
    fn later_calls_return_the_first_request() {
        let mut gateway = Gateway::default();
        gateway
            .server_request(env(&[("REQUEST_METHOD", "PUT"), ("REQUEST_URI", "/first")]), Cursor::new("one"))
            .unwrap()
            .set_attribute("seen", "yes");

        let request = gateway
            .server_request(env(&[("REQUEST_METHOD", "GET"), ("REQUEST_URI", "/second")]), Cursor::new("two"))
            .unwrap();

        assert_eq!(request.method().as_str(), "PUT");
        assert_eq!(request.uri().path(), "/first");
        assert_eq!(request.attribute("seen"), Some("yes"));
        assert_eq!(request.body_mut().contents().unwrap(), b"one");
    }

    #[test]
    fn missing_variables() {
        let mut gateway = Gateway::default();
        let err = gateway.server_request(env(&[("REQUEST_URI", "/")]), io::empty()).unwrap_err();
        assert!(matches!(err, HttpError::RequestError { source: ParseError::MissingVariable { name: "REQUEST_METHOD" } }));

        let err = gateway.server_request(env(&[("REQUEST_METHOD", "GET")]), io::empty()).unwrap_err();
        assert!(matches!(err, HttpError::RequestError { source: ParseError::MissingVariable { name: "REQUEST_URI" } }));
    }

    #[test]
    fn failed_request_is_not_memoized() {
        let mut gateway = Gateway::default();
        gateway.server_request(env(&[("REQUEST_METHOD", "BREW")]), io::empty()).unwrap_err();

        let request =
            gateway.server_request(env(&[("REQUEST_METHOD", "GET"), ("REQUEST_URI", "/")]), io::empty()).unwrap();
        assert_eq!(request.method().as_str(), "GET");
    }

    #[test]
    fn invalid_method() {
        let mut gateway = Gateway::default();
        let err = gateway
            .server_request(env(&[("REQUEST_METHOD", "BREW"), ("REQUEST_URI", "/pot")]), io::empty())
            .unwrap_err();
        assert!(matches!(err, HttpError::RequestError { source: ParseError::InvalidMethod { .. } }));
    }

    #[test]
    fn body_is_capped() {
        let config = GatewayConfig::default()
            .with_limits(Limits::default().with_max_body_bytes(5))
            .with_read_buffer_size(2);
        let mut gateway = Gateway::new(config);
        let env = env(&[("REQUEST_METHOD", "POST"), ("REQUEST_URI", "/"), ("CONTENT_LENGTH", "13")]);

        let request = gateway.server_request(env, Cursor::new("Hello, World!")).unwrap();
        assert_eq!(request.body_mut().contents().unwrap(), b"Hello");
    }

    #[test]
    fn decodes_posted_form() {
        let mut gateway = Gateway::default();
        let env = env(&[
            ("REQUEST_METHOD", "POST"),
            ("REQUEST_URI", "/subscribe?src=mail"),
            ("QUERY_STRING", "src=mail"),
            ("CONTENT_TYPE", "application/x-www-form-urlencoded"),
            ("HTTP_COOKIE", "session=abc; theme=dark"),
        ]);

        let request = gateway.server_request(env, Cursor::new("email=jane%40example.com&topics=rust+cgi")).unwrap();

        assert_eq!(request.query_param("src"), Some("mail"));
        assert_eq!(request.cookie_param("theme"), Some("dark"));
        assert_eq!(request.body_param("email"), Some("jane@example.com"));
        assert_eq!(request.body_param("topics"), Some("rust cgi"));
    }

    #[test]
    fn receives_uploaded_file() {
        let body = indoc! {r#"
            --XyZ
            Content-Disposition: form-data; name="title"

            Notes
            --XyZ
            Content-Disposition: form-data; name="doc"; filename="notes.txt"
            Content-Type: text/plain

            line one
            line two
            --XyZ--
        "#};
        let mut gateway = Gateway::default();
        let env = env(&[
            ("REQUEST_METHOD", "POST"),
            ("REQUEST_URI", "/upload"),
            ("CONTENT_TYPE", "multipart/form-data; boundary=XyZ"),
        ]);

        let request = gateway.server_request(env, Cursor::new(body)).unwrap();
        assert_eq!(request.body_param("title"), Some("Notes"));

        let file = request.uploaded_file("doc").unwrap();
        assert_eq!(file.client_filename(), "notes.txt");
        assert_eq!(file.client_media_type(), "text/plain");
        assert_eq!(file.stream().unwrap().contents().unwrap(), b"line one\nline two");
    }

    #[test]
    fn emits_cgi_response() {
        let gateway = Gateway::default();
        let mut response = Response::new(400, "Bad Request").unwrap();
        response.set_header("Content-Type", "text/html");
        response.set_body(Stream::from("An error occurred!"));

        let mut output = Vec::new();
        gateway.emit_response(&mut response, &mut output).unwrap();

        assert_eq!(output, b"Content-Type: text/html\r\nStatus: 400 Bad Request\r\n\r\nAn error occurred!");
    }

    #[test]
    fn emits_default_response() {
        let gateway = Gateway::default();
        let mut output = Vec::new();
        gateway.emit_response(&mut Response::default(), &mut output).unwrap();

        assert_eq!(output, b"Status: 200 OK\r\n\r\n");
    }

    #[test]
    fn environment_is_collected() {
        let env = environment();
        assert_eq!(env.len(), std::env::vars_os().count());
    }

    #[test]
    fn request_from_raw_entries() {
        let env = environment_from_entries([
            "REQUEST_METHOD=GET",
            "REQUEST_URI=/search?q=a%3Db",
            "QUERY_STRING=q=a%3Db",
            "NO_SEPARATOR",
            "HTTP_X_TRACE=id=42",
        ]);
        assert_eq!(env.len(), 4);

        let mut gateway = Gateway::default();
        let request = gateway.server_request(env, io::empty()).unwrap();

        assert_eq!(request.query_param("q"), Some("a=b"));
        assert_eq!(request.header_line("X-Trace"), "id=42");
        assert_eq!(request.server_param("NO_SEPARATOR"), None);
    }
}
