//! CGI environment variable helpers.

use tracing::trace;

const HTTP_PREFIX: &str = "HTTP_";

/// Folds an `HTTP_*` variable name into a header name.
///
/// The prefix is dropped, `_` becomes `-` and every character after the first
/// of each hyphen-delimited word is lower-cased. Returns `None` for variables
/// that do not carry a request header.
///
/// ```
/// use micro_cgi_message::codec::header_name_from_env;
///
/// assert_eq!(header_name_from_env("HTTP_ACCEPT_LANGUAGE").as_deref(), Some("Accept-Language"));
/// assert_eq!(header_name_from_env("SERVER_PROTOCOL"), None);
/// ```
pub fn header_name_from_env(variable: &str) -> Option<String> {
    let name = variable.strip_prefix(HTTP_PREFIX).filter(|name| !name.is_empty())?;

    let mut folded = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if c == '_' {
            folded.push('-');
            word_start = true;
        } else if word_start {
            folded.push(c);
            word_start = false;
        } else {
            folded.push(c.to_ascii_lowercase());
        }
    }
    Some(folded)
}

/// Splits a `NAME=VALUE` environment entry on its first `=`.
pub fn split_env_entry(entry: &str) -> Option<(&str, &str)> {
    let split = entry.split_once('=');
    if split.is_none() {
        trace!(entry, "skip environment entry without '='");
    }
    split
}

/// Truncates `value` to at most `max` bytes without splitting a character.
pub(crate) fn truncate_on_char_boundary(value: &mut String, max: usize) {
    if value.len() <= max {
        return;
    }

    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_header_names() {
        assert_eq!(header_name_from_env("HTTP_HOST").as_deref(), Some("Host"));
        assert_eq!(header_name_from_env("HTTP_USER_AGENT").as_deref(), Some("User-Agent"));
        assert_eq!(header_name_from_env("HTTP_X_FORWARDED_FOR").as_deref(), Some("X-Forwarded-For"));
        assert_eq!(header_name_from_env("HTTP_COOKIE").as_deref(), Some("Cookie"));
    }

    #[test]
    fn non_header_variables() {
        assert_eq!(header_name_from_env("HTTP_"), None);
        assert_eq!(header_name_from_env("HTTPS"), None);
        assert_eq!(header_name_from_env("CONTENT_TYPE"), None);
        assert_eq!(header_name_from_env("http_host"), None);
    }

    #[test]
    fn env_entries() {
        assert_eq!(split_env_entry("REQUEST_METHOD=GET"), Some(("REQUEST_METHOD", "GET")));
        assert_eq!(split_env_entry("QUERY_STRING=a=b&c=d"), Some(("QUERY_STRING", "a=b&c=d")));
        assert_eq!(split_env_entry("EMPTY="), Some(("EMPTY", "")));
        assert_eq!(split_env_entry("BROKEN"), None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut value = "héllo".to_owned();
        truncate_on_char_boundary(&mut value, 2);
        assert_eq!(value, "h");

        let mut value = "hello".to_owned();
        truncate_on_char_boundary(&mut value, 10);
        assert_eq!(value, "hello");

        truncate_on_char_boundary(&mut value, 3);
        assert_eq!(value, "hel");
    }
}
