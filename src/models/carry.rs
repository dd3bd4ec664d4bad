//! Header carry state
//!
//! Response values captured by actions, replayed as request headers on
//! every later case of the same run.

use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulated headers for one run.
///
/// Entries are only ever inserted or overwritten, never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HeaderCarry {
    headers: BTreeMap<String, String>,
}

impl HeaderCarry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; a later action on the same key replaces it
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderCarry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut carry = HeaderCarry::new();
        for (key, value) in iter {
            carry.set(key, value);
        }
        carry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut carry = HeaderCarry::new();
        carry.set("token", "a");
        carry.set("token", "b");
        assert_eq!(carry.get("token"), Some("b"));
        assert_eq!(carry.iter().count(), 1);
    }

    #[test]
    fn test_from_iter() {
        let carry: HeaderCarry = [("x-a", "1"), ("x-b", "2")].into_iter().collect();
        let keys: Vec<_> = carry.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x-a", "x-b"]);
    }
}
