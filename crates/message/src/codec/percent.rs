//! Form-style percent decoding.
//!
//! `+` becomes a space, `%XX` becomes the byte `0xXX` when both hex digits
//! are present, and everything else is kept verbatim. Decoding never fails;
//! bytes that are not valid UTF-8 afterwards are replaced lossily.

use std::borrow::Cow;

use memchr::memchr;
use percent_encoding::percent_decode;

/// Decodes a single form component.
///
/// ```
/// use micro_cgi_message::codec::form_decode;
///
/// assert_eq!(form_decode(b"Foo%20Bar+Baz"), "Foo Bar Baz");
/// assert_eq!(form_decode(b"100%"), "100%");
/// ```
pub fn form_decode(input: &[u8]) -> String {
    let spaced: Cow<'_, [u8]> = if memchr(b'+', input).is_some() {
        Cow::Owned(input.iter().map(|&b| if b == b'+' { b' ' } else { b }).collect())
    } else {
        Cow::Borrowed(input)
    };

    let decoded: Cow<'_, [u8]> = percent_decode(&spaced).into();
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Iterates over `name=value` tokens separated by `separator`, decoding both
/// halves. Tokens without `=` are skipped.
pub fn form_pairs(input: &[u8], separator: u8) -> FormPairs<'_> {
    FormPairs { rest: Some(input), separator }
}

/// Iterator returned by [`form_pairs`].
#[derive(Debug, Clone)]
pub struct FormPairs<'a> {
    rest: Option<&'a [u8]>,
    separator: u8,
}

impl Iterator for FormPairs<'_> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(rest) = self.rest {
            let token = match memchr(self.separator, rest) {
                Some(index) => {
                    self.rest = Some(&rest[index + 1..]);
                    &rest[..index]
                }
                None => {
                    self.rest = None;
                    rest
                }
            };

            if let Some(eq) = memchr(b'=', token) {
                return Some((form_decode(&token[..eq]), form_decode(&token[eq + 1..])));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_and_escapes() {
        assert_eq!(form_decode(b"Foo%20Bar"), "Foo Bar");
        assert_eq!(form_decode(b"Foo+Bar"), "Foo Bar");
        assert_eq!(form_decode(b"a%2Bb"), "a+b");
        assert_eq!(form_decode(b"%e4%bd%a0%e5%a5%bd"), "你好");
    }

    #[test]
    fn malformed_escapes_are_verbatim() {
        assert_eq!(form_decode(b"%"), "%");
        assert_eq!(form_decode(b"%2"), "%2");
        assert_eq!(form_decode(b"%zz"), "%zz");
        assert_eq!(form_decode(b""), "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(form_decode(b"%ff"), "\u{fffd}");
    }

    #[test]
    fn pairs() {
        let pairs: Vec<_> = form_pairs(b"field1=Foo%20Bar&flag&field2=Foo%20Baz&empty=", b'&').collect();

        assert_eq!(
            pairs,
            vec![
                ("field1".to_owned(), "Foo Bar".to_owned()),
                ("field2".to_owned(), "Foo Baz".to_owned()),
                ("empty".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn value_keeps_extra_equals() {
        let pairs: Vec<_> = form_pairs(b"a=b=c", b'&').collect();
        assert_eq!(pairs, vec![("a".to_owned(), "b=c".to_owned())]);
    }
}
