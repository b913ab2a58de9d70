//! Parameter capture sinks.
//!
//! A search writes captured `(name, value)` pairs into a [`ParamsSetter`]
//! rather than returning them, so callers choose the storage: the pooled
//! [`Params`] type copies into reusable buffers, while a
//! `Vec<(String, &str)>` keeps values as views into the searched path.
//! The trie itself never looks at what the sink does with a pair.

use std::slice;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Receiver for the `(name, value)` pairs captured during a search.
///
/// `'q` is the lifetime of the searched path; implementations may either
/// borrow the value from it or copy it out. Pairs arrive in the order the
/// pattern's parameters appear.
pub trait ParamsSetter<'q> {
    /// Records one captured parameter.
    fn set(&mut self, key: &str, value: &'q str);
}

/// Values stay as views into the searched path; names are copied.
impl<'q> ParamsSetter<'q> for Vec<(String, &'q str)> {
    fn set(&mut self, key: &str, value: &'q str) {
        self.push((key.to_owned(), value));
    }
}

/// A single captured path parameter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParamEntry {
    /// Parameter name, without the leading `:` or `*`.
    pub key: String,
    /// Captured value.
    pub value: String,
}

/// An owned, reusable parameter sink.
///
/// `Params` keeps its entry buffers across [`reset`](Params::reset) calls:
/// the live length drops to zero but the `Vec` and the per-entry `String`
/// capacities stay, so a recycled sink captures without allocating once it
/// has warmed up.
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<ParamEntry>,
    len: usize,
}

impl Params {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value captured for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries[..self.len]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Returns the live entries in capture order.
    #[must_use]
    pub fn entries(&self) -> &[ParamEntry] {
        &self.entries[..self.len]
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries[..self.len]
            .iter()
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }

    /// Number of live captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no captures are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zeroes the live length; buffers and their capacities are retained.
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl<'q> ParamsSetter<'q> for Params {
    fn set(&mut self, key: &str, value: &'q str) {
        if let Some(entry) = self.entries.get_mut(self.len) {
            // Reuse a dead slot left behind by an earlier reset.
            entry.key.clear();
            entry.key.push_str(key);
            entry.value.clear();
            entry.value.push_str(value);
        } else {
            self.entries.push(ParamEntry {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
        self.len += 1;
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a ParamEntry;
    type IntoIter = slice::Iter<'a, ParamEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries().iter()
    }
}

/// Serializes the live captures as a string map.
impl Serialize for Params {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
