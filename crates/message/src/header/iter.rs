use std::iter::FusedIterator;
use std::slice;

use super::store::HeaderEntry;

/// Iterator over all headers of a store, yielding `(name, values)` pairs in
/// insertion order.
///
/// Cloning the iterator restarts the walk from the clone's position.
#[derive(Debug, Clone)]
pub struct Headers<'a> {
    inner: slice::Iter<'a, HeaderEntry>,
}

impl<'a> Headers<'a> {
    pub(super) fn new(entries: &'a [HeaderEntry]) -> Self {
        Self { inner: entries.iter() }
    }
}

impl<'a> Iterator for Headers<'a> {
    type Item = (&'a str, HeaderValues<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (entry.name(), entry.values()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Headers<'_> {}

impl FusedIterator for Headers<'_> {}

/// Iterator over the values of a single header.
#[derive(Debug, Clone, Default)]
pub struct HeaderValues<'a> {
    inner: slice::Iter<'a, String>,
}

impl<'a> HeaderValues<'a> {
    pub(super) fn new(values: &'a [String]) -> Self {
        Self { inner: values.iter() }
    }
}

impl<'a> Iterator for HeaderValues<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for HeaderValues<'_> {}

impl FusedIterator for HeaderValues<'_> {}
