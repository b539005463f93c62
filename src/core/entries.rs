//! In-memory entry sets
//!
//! [`Entries`] keeps the records of one table in file order. All mutation is
//! in memory; nothing reaches disk until [`Entries::save`] rewrites the whole
//! file. Lookups are linear scans, which is fine for tables sized by the
//! number of accounts on a machine.

use crate::core::lock::write_with_lock;
use crate::core::options::Options;
use crate::core::record::{Codec, NumericId, Record};
use crate::error::{AccountError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ordered, mutable collection of records from one table
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<T> {
    entries: Vec<T>,
}

impl<T> Entries<T> {
    /// Empty set
    pub fn new() -> Self {
        Entries {
            entries: Vec::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.entries.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T: Record> Entries<T> {
    /// First record whose key is `key`
    ///
    /// An empty key never matches, even a decoded record with an empty name.
    pub fn get(&self, key: &str) -> Option<&T> {
        if key.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| entry.key() == key)
    }

    /// Mutable access to the first record whose key is `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        if key.is_empty() {
            return None;
        }
        self.entries.iter_mut().find(|entry| entry.key() == key)
    }

    /// True if a record with `key` exists
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove the first record whose key is `key`
    ///
    /// The order of the remaining records is preserved.
    ///
    /// # Errors
    ///
    /// - `EmptyKey` if `key` is empty
    /// - `NotFound` if no record has that key; the set is left unchanged
    pub fn remove(&mut self, key: &str) -> Result<T> {
        if key.is_empty() {
            return Err(AccountError::EmptyKey("name"));
        }

        match self.entries.iter().position(|entry| entry.key() == key) {
            Some(index) => Ok(self.entries.remove(index)),
            None => Err(AccountError::not_found("entry", key)),
        }
    }

    /// Records that picked up errors while decoding
    pub fn with_errors(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter(|entry| !entry.is_valid())
    }
}

impl<T: NumericId> Entries<T> {
    /// First record whose uid/gid is `id`
    pub fn get_by_id(&self, id: i64) -> Option<&T> {
        self.entries.iter().find(|entry| entry.id() == id)
    }
}

impl<T: Codec> Entries<T> {
    /// Decode table contents
    pub fn from_bytes(data: &[u8]) -> Self {
        Entries {
            entries: T::decode(data),
        }
    }

    /// Encode the set into table contents
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        T::encode(&mut self.entries)
    }

    /// Read and decode the table at `path`
    ///
    /// The read does not take the write lock.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let entries = Self::from_bytes(&data);
        debug!(
            "Loaded {} {} entries from {}",
            entries.len(),
            T::KIND,
            path.display()
        );
        Ok(entries)
    }

    /// Encode the set and rewrite the table at `path` under an exclusive lock
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        write_with_lock(path, &data)?;
        info!(
            "Saved {} {} entries to {}",
            self.len(),
            T::KIND,
            path.display()
        );
        Ok(())
    }

    /// [`load`](Self::load) from the path configured for this table
    pub fn load_with(options: &Options) -> Result<Self> {
        Self::load(options.path(T::KIND))
    }

    /// [`save`](Self::save) to the path configured for this table
    pub fn save_with(&mut self, options: &Options) -> Result<()> {
        self.save(options.path(T::KIND))
    }
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Entries<T> {
    fn from(entries: Vec<T>) -> Self {
        Entries { entries }
    }
}

impl<T> FromIterator<T> for Entries<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Entries {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Entries<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Entries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> std::ops::Index<usize> for Entries<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.entries[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::passwd::UserEntry;

    fn two_users() -> Entries<UserEntry> {
        Entries::from(vec![
            UserEntry::new("root", 0, 0, "root", "/root", "/bin/bash"),
            UserEntry::new("removeme", 1, 1, "", "/", "/usr/sbin/nologin"),
        ])
    }

    #[test]
    fn test_remove_present_key() {
        let mut users = two_users();
        users.push(UserEntry::new("nobody", 65534, 65534, "", "/", "/bin/false"));

        let removed = users.remove("removeme").unwrap();

        assert_eq!(removed.name, "removeme");
        let names: Vec<&str> = users.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, vec!["root", "nobody"]);
    }

    #[test]
    fn test_remove_missing_key_leaves_set_unchanged() {
        let mut users = two_users();
        let before = users.clone();

        let err = users.remove("boat").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(users, before);
    }

    #[test]
    fn test_remove_empty_key() {
        let mut users = two_users();
        let err = users.remove("").unwrap_err();
        assert!(matches!(err, AccountError::EmptyKey(_)));
        assert!(!err.is_not_found());
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_empty_key_lookup_matches_nothing() {
        let mut users: Entries<UserEntry> =
            Entries::from_bytes(b":x:5:5::/:/bin/sh\nroot:x:0:0::/root:/bin/sh");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "");

        assert!(users.get("").is_none());
        assert!(users.get_mut("").is_none());
        assert!(!users.contains(""));
        assert!(users.get("root").is_some());
    }

    #[test]
    fn test_lookup_by_key_and_id() {
        let mut users = two_users();
        assert_eq!(users.get("root").map(|user| user.uid), Some(0));
        assert!(users.get("missing").is_none());
        assert_eq!(users.get_by_id(1).map(|user| user.name.as_str()), Some("removeme"));
        assert!(users.get_by_id(42).is_none());

        users.get_mut("root").unwrap().shell = "/bin/zsh".to_string();
        assert_eq!(users[0].shell, "/bin/zsh");
    }

    #[test]
    fn test_duplicates_are_positional() {
        let mut users: Entries<UserEntry> = Entries::from_bytes(b"dup:x:1:1:::\ndup:x:2:2:::");
        assert_eq!(users.len(), 2);
        assert_eq!(users.get("dup").map(|user| user.uid), Some(1));

        users.remove("dup").unwrap();
        assert_eq!(users.get("dup").map(|user| user.uid), Some(2));
    }
}
