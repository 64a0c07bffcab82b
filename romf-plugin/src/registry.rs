use indexmap::IndexMap;

/// Named capabilities available to the rest of the application.
///
/// Names are unique. Registering a name twice replaces the earlier value
/// (last writer wins) and is not reported as an error. Entries are never
/// removed.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for CapabilityRegistry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> CapabilityRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`, returning the value it displaced, if any.
    pub fn register(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), value);
        if previous.is_some() {
            tracing::debug!(%name, "capability overwritten");
        } else {
            tracing::debug!(%name, "capability registered");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names in first-registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut reg = CapabilityRegistry::new();
        assert!(reg.register("alpha", 1).is_none());

        assert_eq!(reg.get("alpha"), Some(&1));
        assert!(reg.get("beta").is_none());
        assert!(reg.contains("alpha"));
    }

    #[test]
    #[traced_test]
    fn test_last_write_wins() {
        let mut reg = CapabilityRegistry::new();
        reg.register("x", 1);
        let displaced = reg.register("x", 2);

        assert_eq!(displaced, Some(1));
        assert_eq!(reg.get("x"), Some(&2));
        assert_eq!(reg.len(), 1);
        assert!(logs_contain("capability overwritten"));
    }

    #[test]
    fn test_registration_order_does_not_change_values() {
        let mut forward = CapabilityRegistry::new();
        forward.register("a", "first");
        forward.register("b", "second");

        let mut backward = CapabilityRegistry::new();
        backward.register("b", "second");
        backward.register("a", "first");

        for name in ["a", "b"] {
            assert_eq!(forward.get(name), backward.get(name));
        }
    }

    #[test]
    fn test_names_keep_first_registration_order() {
        let mut reg = CapabilityRegistry::new();
        reg.register("b", 1);
        reg.register("a", 2);
        reg.register("b", 3);

        let names: Vec<&str> = reg.names().collect();
        assert_eq!(names, vec!["b", "a"]);
        let pairs: Vec<(&str, &i32)> = reg.iter().collect();
        assert_eq!(pairs, vec![("b", &3), ("a", &2)]);
    }

    #[test]
    fn test_empty_registry() {
        let reg: CapabilityRegistry<()> = CapabilityRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.names().count(), 0);
    }
}
