use std::collections::BTreeMap;
use std::fmt;

use serde_yaml::Value;

/// A parsed descriptor value.
///
/// Mirrors the YAML data model with two simplifications: mapping keys are
/// always strings, and tagged values are unwrapped to their inner value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConfigTree {
    #[default]
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    Sequence(Vec<ConfigTree>),
    Mapping(BTreeMap<String, ConfigTree>),
}

impl ConfigTree {
    /// Parse a YAML document. An empty document yields [`ConfigTree::Null`].
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        if source.trim().is_empty() {
            return Ok(Self::Null);
        }
        let value: Value = serde_yaml::from_str(source)?;
        Ok(Self::from(value))
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigTree)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn sequence<I: IntoIterator<Item = ConfigTree>>(items: I) -> Self {
        Self::Sequence(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_)
        )
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, ConfigTree>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut BTreeMap<String, ConfigTree>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigTree> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short, human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Number(_) => "a number",
            Self::String(_) => "a string",
            Self::Sequence(_) => "a list",
            Self::Mapping(_) => "a mapping",
        }
    }
}

/// Scalars render as their plain text (null renders empty); collections
/// render in YAML flow style.
impl fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<Value> for ConfigTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Mapping(
                map.into_iter()
                    .map(|(k, v)| (key_string(k), Self::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

fn key_string(key: Value) -> String {
    match ConfigTree::from(key) {
        ConfigTree::String(s) => s,
        other => other.to_string(),
    }
}

impl From<&str> for ConfigTree {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for ConfigTree {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigTree {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigTree {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for ConfigTree {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_string_keys_become_strings() {
        let tree = ConfigTree::from_yaml_str("1: one\ntrue: yes\n").unwrap();
        assert_eq!(tree.get("1"), Some(&ConfigTree::from("one")));
        assert_eq!(tree.get("true"), Some(&ConfigTree::from("yes")));
    }

    #[test]
    fn empty_document_is_null() {
        assert!(ConfigTree::from_yaml_str("").unwrap().is_null());
    }

    #[test]
    fn display_coerces_scalars() {
        assert_eq!(ConfigTree::from(3).to_string(), "3");
        assert_eq!(ConfigTree::from(true).to_string(), "true");
        assert_eq!(ConfigTree::Null.to_string(), "");
        let tree = ConfigTree::from_yaml_str("version: 3.9").unwrap();
        assert_eq!(tree.get("version").unwrap().to_string(), "3.9");
    }

    #[test]
    fn display_renders_collections_in_flow_style() {
        let tree = ConfigTree::mapping([(
            "a",
            ConfigTree::sequence([ConfigTree::from(1), ConfigTree::from("x")]),
        )]);
        assert_eq!(tree.to_string(), "{a: [1, x]}");
    }
}
