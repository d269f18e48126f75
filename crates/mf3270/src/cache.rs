//! Open connections addressable by index or alias

use crate::KeywordError;
use std::collections::HashMap;

/// Registry of open connections with one current connection.
///
/// Indices are 1-based and handed out in registration order. Switching the
/// current connection is bookkeeping only.
#[derive(Debug)]
pub struct ConnectionCache<T> {
    connections: Vec<T>,
    aliases: HashMap<String, usize>,
    current: Option<usize>,
}

impl<T> Default for ConnectionCache<T> {
    fn default() -> Self {
        Self {
            connections: Vec::new(),
            aliases: HashMap::new(),
            current: None,
        }
    }
}

impl<T> ConnectionCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection`, make it current and return its index
    pub fn register(&mut self, connection: T, alias: Option<&str>) -> usize {
        self.connections.push(connection);
        let index = self.connections.len();
        if let Some(alias) = alias {
            self.aliases.insert(normalize(alias), index);
        }
        self.current = Some(index);
        index
    }

    /// Make the connection named by `alias_or_index` current
    pub fn switch(&mut self, alias_or_index: &str) -> Result<usize, KeywordError> {
        let index = self.resolve(alias_or_index)?;
        self.current = Some(index);
        Ok(index)
    }

    /// Index of the connection named by an alias or a 1-based index
    pub fn resolve(&self, alias_or_index: &str) -> Result<usize, KeywordError> {
        if let Some(index) = self.aliases.get(&normalize(alias_or_index)) {
            return Ok(*index);
        }
        alias_or_index
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|index| (1..=self.connections.len()).contains(index))
            .ok_or_else(|| KeywordError::UnknownConnection(alias_or_index.to_string()))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Result<&T, KeywordError> {
        self.current
            .and_then(|index| self.connections.get(index - 1))
            .ok_or(KeywordError::NoConnection)
    }

    pub fn current_mut(&mut self) -> Result<&mut T, KeywordError> {
        self.current
            .and_then(|index| self.connections.get_mut(index - 1))
            .ok_or(KeywordError::NoConnection)
    }

    pub fn get(&self, alias_or_index: &str) -> Option<&T> {
        let index = self.resolve(alias_or_index).ok()?;
        self.connections.get(index - 1)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.connections.iter_mut()
    }

    /// Remove every connection and start indexing from 1 again.
    ///
    /// The caller is responsible for closing what is returned.
    pub fn take_all(&mut self) -> Vec<T> {
        self.aliases.clear();
        self.current = None;
        std::mem::take(&mut self.connections)
    }
}

/// Aliases compare case-insensitively and ignore spaces and underscores
fn normalize(alias: &str) -> String {
    alias
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_start_at_one() {
        let mut cache = ConnectionCache::new();

        assert_eq!(cache.register("first", None), 1);
        assert_eq!(cache.register("second", Some("two")), 2);
        assert_eq!(cache.current_index(), Some(2));
        assert_eq!(*cache.current().unwrap(), "second");
    }

    #[test]
    fn test_switch_by_alias_and_index() {
        let mut cache = ConnectionCache::new();
        cache.register("first", Some("My First"));
        cache.register("second", None);

        cache.switch("my_first").unwrap();
        assert_eq!(*cache.current().unwrap(), "first");

        cache.switch("2").unwrap();
        assert_eq!(*cache.current().unwrap(), "second");
        assert_eq!(cache.get("MYFIRST"), Some(&"first"));
    }

    #[test]
    fn test_switch_unknown() {
        let mut cache = ConnectionCache::new();
        cache.register("first", None);

        let err = cache.switch("nope").unwrap_err();
        assert_eq!(err.to_string(), "Non-existing index or alias 'nope'.");
        assert!(cache.switch("0").is_err());
        assert!(cache.switch("2").is_err());
        assert_eq!(cache.current_index(), Some(1));
    }

    #[test]
    fn test_empty_cache_has_no_current() {
        let mut cache: ConnectionCache<&str> = ConnectionCache::new();

        assert!(matches!(cache.current(), Err(KeywordError::NoConnection)));
        assert!(matches!(cache.current_mut(), Err(KeywordError::NoConnection)));
        assert_eq!(
            KeywordError::NoConnection.to_string(),
            "No connection open"
        );
    }

    #[test]
    fn test_take_all_resets_indices() {
        let mut cache = ConnectionCache::new();
        cache.register("first", Some("a"));
        cache.register("second", None);

        let taken = cache.take_all();

        assert_eq!(taken, vec!["first", "second"]);
        assert!(cache.is_empty());
        assert!(cache.current().is_err());
        assert!(cache.switch("a").is_err());
        assert_eq!(cache.register("third", None), 1);
    }
}
