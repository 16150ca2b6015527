//! Ordered name/value tables for request parameters.
//!
//! Server parameters, cookies, query parameters, body fields, uploaded files
//! and attributes are all kept in a [`ParamTable`]. Names are compared
//! exactly. Lookups return the first entry with a matching name; later
//! duplicates are retained and visible through iteration.

use std::slice;

use super::UploadedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTable<V = String> {
    entries: Vec<(String, V)>,
}

/// Decoded body fields.
pub type FieldTable = ParamTable<String>;

/// Uploaded files keyed by form field name.
pub type FileTable = ParamTable<UploadedFile>;

impl<V> Default for ParamTable<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> ParamTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, keeping any earlier entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        self.entries.push((name.into(), value));
    }

    /// Replaces the first entry named `name`, or appends when absent.
    pub fn set(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        match self.entries.iter_mut().find(|(entry, _)| *entry == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of the first entry named `name`.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.iter().find(|(entry, _)| entry == name).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.entries.iter_mut().find(|(entry, _)| entry == name).map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes and returns the first entry named `name`.
    pub fn take(&mut self, name: &str) -> Option<V> {
        let index = self.entries.iter().position(|(entry, _)| entry == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Removes every entry named `name`.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(entry, _)| entry != name);
    }

    pub fn iter(&self) -> Params<'_, V> {
        Params { inner: self.entries.iter() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V> FromIterator<(N, V)> for ParamTable<V> {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().map(|(name, value)| (name.into(), value)).collect() }
    }
}

impl<N: Into<String>, V> Extend<(N, V)> for ParamTable<V> {
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        self.entries.extend(iter.into_iter().map(|(name, value)| (name.into(), value)));
    }
}

impl<'a, V> IntoIterator for &'a ParamTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Params<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`ParamTable`] in insertion order.
#[derive(Debug, Clone)]
pub struct Params<'a, V> {
    inner: slice::Iter<'a, (String, V)>,
}

impl<'a, V> Iterator for Params<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (name.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Params<'_, V> {}
