//! Typed views over the effective descriptor.
//!
//! Values come back raw (coerced to strings but not interpolated); the
//! renderer interpolates them once the environment map is known.

use crate::config::Descriptor;
use crate::error::{Error, Result};
use crate::tree::ConfigTree;

/// Document root used when the descriptor has no `docroot`.
pub const DEFAULT_DOCROOT: &str = "/app";

/// Basic-auth realm used when `auth.realm` is absent.
pub const DEFAULT_REALM: &str = "Restricted";

/// PHP index scripts used when `php.index` is absent.
pub const DEFAULT_PHP_INDEX: &[&str] = &["index.php"];

/// ini directive injected when `php.ini-set` does not set a timezone.
pub const DEFAULT_TIMEZONE_INI: &str = "date.timezone=UTC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SslSection {
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSection {
    Python(PythonSection),
    Php(PhpSection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonSection {
    pub version: String,
    /// WSGI entry module, e.g. `app:application`.
    pub wsgi: String,
    /// Requirements file installed into the image virtualenv.
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpSection {
    pub version: String,
    /// Front-controller script for requests that match no file.
    pub fallback: String,
    pub index: Vec<String>,
    pub extensions: Vec<String>,
    /// `key=value` directives; always contains a `date.timezone` entry.
    pub ini_set: Vec<String>,
    /// Composer packages required into the checkout before the build.
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSection {
    pub ip_whitelist: Vec<String>,
    pub htpasswd: Option<String>,
    pub realm: String,
}

impl Descriptor {
    /// Raw `env` entries, ordered by name.
    pub fn env_entries(&self) -> Result<Vec<(String, String)>> {
        match self.get("env") {
            None | Some(ConfigTree::Null) => Ok(Vec::new()),
            Some(ConfigTree::Mapping(map)) => map
                .iter()
                .map(|(name, value)| Ok((name.clone(), scalar(&format!("env.{name}"), value)?)))
                .collect(),
            Some(other) => Err(invalid("env", "a mapping", other)),
        }
    }

    pub fn docroot(&self) -> Result<String> {
        match self.get("docroot") {
            None | Some(ConfigTree::Null) => Ok(DEFAULT_DOCROOT.to_owned()),
            Some(value) => scalar("docroot", value),
        }
    }

    pub fn ssl(&self) -> Result<Option<SslSection>> {
        let Some(section) = self.get("ssl").filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        if section.as_mapping().is_none() {
            return Err(invalid("ssl", "a mapping", section));
        }
        let force = match section.get("force") {
            None | Some(ConfigTree::Null) => false,
            Some(ConfigTree::Bool(force)) => *force,
            Some(other) => return Err(invalid("ssl.force", "a boolean", other)),
        };
        Ok(Some(SslSection { force }))
    }

    /// The configured language runtime, if any.
    pub fn runtime(&self) -> Result<Option<RuntimeSection>> {
        match (self.get("python"), self.get("php")) {
            (Some(_), Some(_)) => Err(Error::ConflictingRuntimes),
            (Some(python), None) => PythonSection::from_tree(python)
                .map(RuntimeSection::Python)
                .map(Some),
            (None, Some(php)) => PhpSection::from_tree(php).map(RuntimeSection::Php).map(Some),
            (None, None) => Ok(None),
        }
    }

    pub fn public_dirs(&self) -> Result<Vec<String>> {
        string_list("public-dirs", self.get("public-dirs"))
    }

    /// `(url prefix, directory)` pairs from `static-maps`.
    pub fn static_maps(&self) -> Result<Vec<(String, String)>> {
        match self.get("static-maps") {
            None | Some(ConfigTree::Null) => Ok(Vec::new()),
            Some(ConfigTree::Mapping(map)) => map
                .iter()
                .map(|(prefix, dir)| {
                    Ok((prefix.clone(), scalar(&format!("static-maps.{prefix}"), dir)?))
                })
                .collect(),
            Some(other) => Err(invalid("static-maps", "a mapping", other)),
        }
    }

    pub fn static_index(&self) -> Result<Vec<String>> {
        string_list("static-index", self.get("static-index"))
    }

    pub fn auth(&self) -> Result<Option<AuthSection>> {
        let Some(section) = self.get("auth").filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        if section.as_mapping().is_none() {
            return Err(invalid("auth", "a mapping", section));
        }
        let htpasswd = optional_scalar("auth.htpasswd", section.get("htpasswd"))?;
        let realm = optional_scalar("auth.realm", section.get("realm"))?
            .unwrap_or_else(|| DEFAULT_REALM.to_owned());
        Ok(Some(AuthSection {
            ip_whitelist: string_list("auth.ip-whitelist", section.get("ip-whitelist"))?,
            htpasswd,
            realm,
        }))
    }

    /// Custom build commands, in declaration order.
    pub fn commands(&self) -> Result<Vec<String>> {
        string_list("commands", self.get("commands"))
    }
}

impl PythonSection {
    fn from_tree(section: &ConfigTree) -> Result<Self> {
        if section.as_mapping().is_none() {
            return Err(invalid("python", "a mapping", section));
        }
        Ok(Self {
            version: required("python", "version", section)?,
            wsgi: required("python", "wsgi", section)?,
            requirements: optional_scalar("python.requirements", section.get("requirements"))?,
        })
    }
}

impl PhpSection {
    fn from_tree(section: &ConfigTree) -> Result<Self> {
        if section.as_mapping().is_none() {
            return Err(invalid("php", "a mapping", section));
        }

        // Absent keeps the default index list; an explicit null clears it.
        let index: Vec<String> = match section.get("index") {
            None => DEFAULT_PHP_INDEX.iter().map(|s| (*s).to_owned()).collect(),
            Some(value) => string_list("php.index", Some(value))?,
        };

        let mut ini_set = match section.get("ini-set") {
            Some(ConfigTree::Mapping(map)) => map
                .iter()
                .map(|(key, value)| {
                    let value = scalar(&format!("php.ini-set.{key}"), value)?;
                    Ok(format!("{key}={value}"))
                })
                .collect::<Result<Vec<_>>>()?,
            other => string_list("php.ini-set", other)?,
        };
        if !ini_set.iter().any(|line| ini_key(line) == "date.timezone") {
            ini_set.push(DEFAULT_TIMEZONE_INI.to_owned());
        }

        Ok(Self {
            version: required("php", "version", section)?,
            fallback: required("php", "fallback", section)?,
            index,
            extensions: string_list("php.extensions", section.get("extensions"))?,
            ini_set,
            requirements: string_list("php.requirements", section.get("requirements"))?,
        })
    }
}

fn ini_key(line: &str) -> &str {
    line.split_once('=').map_or(line, |(key, _)| key).trim()
}

/// Accepts exactly `X.Y`: one digit, a dot, one digit.
pub fn validate_version(section: &'static str, version: &str) -> Result<()> {
    match version.as_bytes() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(()),
        _ => Err(Error::InvalidVersion {
            section,
            version: version.to_owned(),
        }),
    }
}

fn required(section: &'static str, key: &'static str, tree: &ConfigTree) -> Result<String> {
    match tree.get(key) {
        None | Some(ConfigTree::Null) => Err(Error::MissingKey { section, key }),
        Some(value) => scalar(&format!("{section}.{key}"), value),
    }
}

fn optional_scalar(key: &str, value: Option<&ConfigTree>) -> Result<Option<String>> {
    match value {
        None | Some(ConfigTree::Null) => Ok(None),
        Some(value) => scalar(key, value).map(Some),
    }
}

fn scalar(key: &str, value: &ConfigTree) -> Result<String> {
    if value.is_scalar() {
        Ok(value.to_string())
    } else {
        Err(invalid(key, "a scalar", value))
    }
}

/// A list of scalars; a lone scalar counts as a one-element list and
/// absent or null as empty.
fn string_list(key: &str, value: Option<&ConfigTree>) -> Result<Vec<String>> {
    match value {
        None | Some(ConfigTree::Null) => Ok(Vec::new()),
        Some(ConfigTree::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| scalar(&format!("{key}[{i}]"), item))
            .collect(),
        Some(map @ ConfigTree::Mapping(_)) => Err(invalid(key, "a list", map)),
        Some(single) => Ok(vec![single.to_string()]),
    }
}

fn invalid(key: &str, expected: &'static str, found: &ConfigTree) -> Error {
    Error::InvalidSection {
        key: key.to_owned(),
        expected,
        found: found.kind(),
    }
}
