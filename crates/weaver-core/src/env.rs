use std::collections::BTreeMap;

/// `PATH` every container starts from before runtime blocks extend it.
pub const BASELINE_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Environment variables baked into the image and passed to the server.
///
/// Ordered by name so rendered output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVarMap {
    vars: BTreeMap<String, String>,
}

impl EnvVarMap {
    /// An empty map. Most callers want [`EnvVarMap::baseline`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The map seeded with `PATH`.
    pub fn baseline() -> Self {
        let mut env = Self::new();
        env.insert("PATH", BASELINE_PATH);
        env
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVarMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut env = Self::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}
