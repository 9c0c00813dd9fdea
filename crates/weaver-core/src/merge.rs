//! Structural merge of two [`ConfigTree`]s.
//!
//! | base            | overlay        | result                                 |
//! |-----------------|----------------|----------------------------------------|
//! | null / scalar   | anything       | overlay                                |
//! | list            | list           | base followed by overlay               |
//! | list            | anything else  | base with overlay appended             |
//! | mapping         | mapping        | key-by-key, recursing on shared keys   |
//! | mapping         | anything else  | [`MergeError`]                         |

use crate::tree::ConfigTree;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "cannot merge {} `{overlay}` into mapping `{base}` {}",
    overlay.kind(),
    describe_key(key.as_deref())
)]
pub struct MergeError {
    /// Dotted path of the offending key; `None` at the top level.
    pub key: Option<String>,
    pub base: ConfigTree,
    pub overlay: ConfigTree,
}

fn describe_key(key: Option<&str>) -> String {
    match key {
        Some(key) => format!("at key `{key}`"),
        None => "at the top level".to_owned(),
    }
}

/// Merge `overlay` onto `base`, consuming both.
pub fn merge(base: ConfigTree, overlay: ConfigTree) -> Result<ConfigTree, MergeError> {
    merge_at(None, base, overlay)
}

/// Merge `overlay` onto `dest` in place.
///
/// On error `dest` is left as [`ConfigTree::Null`]; callers abort anyway.
pub fn merge_into(dest: &mut ConfigTree, overlay: ConfigTree) -> Result<(), MergeError> {
    let base = std::mem::take(dest);
    *dest = merge(base, overlay)?;
    Ok(())
}

fn merge_at(
    key: Option<&str>,
    base: ConfigTree,
    overlay: ConfigTree,
) -> Result<ConfigTree, MergeError> {
    match (base, overlay) {
        (ConfigTree::Sequence(mut items), ConfigTree::Sequence(extra)) => {
            items.extend(extra);
            Ok(ConfigTree::Sequence(items))
        }
        (ConfigTree::Sequence(mut items), single) => {
            items.push(single);
            Ok(ConfigTree::Sequence(items))
        }
        (ConfigTree::Mapping(mut map), ConfigTree::Mapping(extra)) => {
            for (child, value) in extra {
                let merged = match map.remove(&child) {
                    Some(existing) => {
                        let path = match key {
                            Some(parent) => format!("{parent}.{child}"),
                            None => child.clone(),
                        };
                        merge_at(Some(&path), existing, value)?
                    }
                    None => value,
                };
                map.insert(child, merged);
            }
            Ok(ConfigTree::Mapping(map))
        }
        (base @ ConfigTree::Mapping(_), overlay) => Err(MergeError {
            key: key.map(str::to_owned),
            base,
            overlay,
        }),
        (_, overlay) => Ok(overlay),
    }
}
