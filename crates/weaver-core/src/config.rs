use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::merge::merge_into;
use crate::tree::ConfigTree;

/// Descriptor filename used when none is configured.
pub const DEFAULT_DESCRIPTOR: &str = "Weaverfile";

/// The effective deployment descriptor: the parsed Weaverfile with the
/// selected environment-type section merged over it.
///
/// Read-only once constructed; section accessors live in [`crate::sections`].
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    tree: ConfigTree,
}

impl Descriptor {
    /// Load the descriptor at `path` and apply `env_type` overrides.
    pub fn load(path: &Path, env_type: Option<&str>) -> Result<Self> {
        load(path, env_type).map(|tree| Self { tree })
    }

    /// Wrap an already parsed tree, applying `env_type` overrides.
    pub fn from_tree(tree: ConfigTree, env_type: Option<&str>) -> Result<Self> {
        apply_environment(tree, env_type).map(|tree| Self { tree })
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn get(&self, key: &str) -> Option<&ConfigTree> {
        self.tree.get(key)
    }
}

/// Parse the YAML document at `path` and apply `env_type` overrides.
pub fn load(path: &Path, env_type: Option<&str>) -> Result<ConfigTree> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::DescriptorRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tree = match ConfigTree::from_yaml_str(&content).map_err(|e| Error::DescriptorParse {
        path: path.to_path_buf(),
        source: e,
    })? {
        ConfigTree::Null => ConfigTree::Mapping(BTreeMap::new()),
        tree @ ConfigTree::Mapping(_) => tree,
        other => {
            return Err(Error::DescriptorShape {
                path: path.to_path_buf(),
                found: other.kind(),
            });
        }
    };

    apply_environment(tree, env_type)
}

/// Remove the top-level `env_type` section and merge it over the rest.
///
/// A missing, empty or null section leaves the tree untouched.
pub fn apply_environment(mut tree: ConfigTree, env_type: Option<&str>) -> Result<ConfigTree> {
    let Some(env_type) = env_type.filter(|name| !name.is_empty()) else {
        return Ok(tree);
    };

    let Some(map) = tree.as_mapping_mut() else {
        return Ok(tree);
    };
    if map.get(env_type).is_none_or(ConfigTree::is_null) {
        debug!(env_type, "no environment override section");
        return Ok(tree);
    }
    let Some(overrides) = map.remove(env_type) else {
        return Ok(tree);
    };

    debug!(env_type, "merging environment override section");
    merge_into(&mut tree, overrides).map_err(|e| Error::Override {
        env_type: env_type.to_owned(),
        source: e,
    })?;
    Ok(tree)
}
