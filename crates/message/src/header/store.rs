//! Ordered, case-insensitive, multi-valued header storage.
//!
//! Every message owns one [`HeaderStore`]. Entries keep the casing of the name
//! they were first created with and are returned in insertion order, while
//! lookups ignore ASCII case.
//!
//! The store performs no validation of names or values: CGI servers hand the
//! process already-framed headers, and responses are built by the program
//! itself.

use super::iter::{HeaderValues, Headers};

/// A single header with its ordered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl HeaderEntry {
    fn new(name: String, value: String) -> Self {
        Self { name, values: vec![value] }
    }

    /// The name as first inserted.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> HeaderValues<'_> {
        HeaderValues::new(&self.values)
    }

    /// Comma-joined values, in insertion order.
    pub fn line(&self) -> String {
        self.values.join(",")
    }

    /// Case-insensitive name match; `true` means the names are equal.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordered header collection keyed case-insensitively by name.
///
/// At most one entry exists per case-insensitive name. Replacing a header
/// keeps its position, appending a value keeps its position, and removing a
/// header leaves the order of the remaining entries untouched.
///
/// ```
/// use micro_cgi_message::header::HeaderStore;
///
/// let mut headers = HeaderStore::new();
/// headers.set_added_header("X-Trace", "a");
/// headers.set_added_header("x-trace", "b");
///
/// assert_eq!(headers.header_line("X-TRACE"), "a,b");
/// assert_eq!(headers.headers().next().map(|(name, _)| name), Some("X-Trace"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderStore {
    entries: Vec<HeaderEntry>,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.matches(name))
    }

    /// Returns the entry for `name`, ignoring case.
    pub fn entry(&self, name: &str) -> Option<&HeaderEntry> {
        self.entries.iter().find(|entry| entry.matches(name))
    }

    /// Replaces every value of `name` with `value`.
    ///
    /// An existing entry keeps its original casing and its place in the
    /// iteration order; otherwise a new entry is appended with the given
    /// casing.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => {
                let values = &mut self.entries[index].values;
                values.clear();
                values.push(value.into());
            }
            None => self.entries.push(HeaderEntry::new(name, value.into())),
        }
    }

    /// Appends `value` to the values of `name`, creating the entry if needed.
    pub fn set_added_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.entries[index].values.push(value.into()),
            None => self.entries.push(HeaderEntry::new(name, value.into())),
        }
    }

    /// Removes the entry for `name`, ignoring case. Does nothing when absent.
    pub fn remove_header(&mut self, name: &str) {
        if let Some(index) = self.position(name) {
            self.entries.remove(index);
        }
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Values of `name` in insertion order; empty when the header is absent.
    pub fn header(&self, name: &str) -> HeaderValues<'_> {
        self.entry(name).map(HeaderEntry::values).unwrap_or_default()
    }

    /// Values of `name` joined with `,`; an empty string when absent.
    pub fn header_line(&self, name: &str) -> String {
        self.entry(name).map(HeaderEntry::line).unwrap_or_default()
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> Headers<'_> {
        Headers::new(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HeaderStore {
    type Item = (&'a str, HeaderValues<'a>);
    type IntoIter = Headers<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers()
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for HeaderStore {
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.set_added_header(name, value);
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderStore {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut store = HeaderStore::new();
        store.extend(iter);
        store
    }
}
