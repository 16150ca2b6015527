//! Server response value object.

use std::ops::{Deref, DerefMut};

use http::StatusCode;

use super::{Message, ParseError};
use crate::utils::ensure;

/// Whether `code` is registered with IANA.
fn is_registered(code: u16) -> bool {
    matches!(code, 100..=104 | 200..=208 | 226 | 300..=308 | 400..=418 | 421..=431 | 451 | 500..=511)
}

/// A response: a [`Message`] plus a status code and reason phrase.
///
/// ```
/// use micro_cgi_message::protocol::Response;
///
/// let mut response = Response::default();
/// assert_eq!(response.status_code(), 200);
/// assert_eq!(response.reason_phrase(), "OK");
///
/// response.set_status(404, "").unwrap();
/// assert_eq!(response.reason_phrase(), "Not Found");
/// ```
#[derive(Debug)]
pub struct Response {
    message: Message,
    status: StatusCode,
    reason_phrase: String,
}

impl Default for Response {
    fn default() -> Self {
        Self { message: Message::new(), status: StatusCode::OK, reason_phrase: canonical_reason(StatusCode::OK) }
    }
}

fn canonical_reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_owned()
}

impl Response {
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidStatus`] for codes not registered with IANA.
    pub fn new(code: u16, reason_phrase: &str) -> Result<Self, ParseError> {
        let mut response = Self::default();
        response.set_status(code, reason_phrase)?;
        Ok(response)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    /// Sets the status. An empty `reason_phrase` falls back to the canonical
    /// phrase of `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidStatus`] for codes not registered with IANA;
    /// the current status is left untouched.
    pub fn set_status(&mut self, code: u16, reason_phrase: &str) -> Result<(), ParseError> {
        ensure!(is_registered(code), ParseError::invalid_status(code));
        let status = StatusCode::from_u16(code).map_err(|_| ParseError::invalid_status(code))?;

        self.status = status;
        self.reason_phrase = if reason_phrase.is_empty() { canonical_reason(status) } else { reason_phrase.to_owned() };
        Ok(())
    }

    pub fn into_message(self) -> Message {
        self.message
    }
}

impl Deref for Response {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}

impl DerefMut for Response {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.message
    }
}

impl AsRef<Message> for Response {
    fn as_ref(&self) -> &Message {
        &self.message
    }
}

impl AsMut<Message> for Response {
    fn as_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}
