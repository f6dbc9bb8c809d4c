//! Newest-first, optionally capped log used by the audit, chat and
//! feedback slots.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal<T> {
    entries: Vec<T>,
}

impl<T> Default for Journal<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Journal<T> {
    /// Insert `entry` at the front. When `retention` is set, entries
    /// past the cap are evicted oldest first.
    pub fn prepend(&mut self, entry: T, retention: Option<usize>) -> &T {
        self.entries.insert(0, entry);
        if let Some(cap) = retention {
            self.entries.truncate(cap.max(1));
        }
        &self.entries[0]
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Journal<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
