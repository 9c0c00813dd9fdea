//! `${name}` / `${function:arg:...}` placeholder expansion.
//!
//! Placeholders match `\$\{[A-Za-z0-9_:/-]+\}`. A token without a colon is a
//! variable: it resolves from the [`EnvVarMap`] first, then the process
//! environment, and expands to the empty string when neither has it. A token
//! with a colon is a function call resolved through a fixed, named table.
//!
//! Expansion is a single pass; substituted text is never rescanned.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::env::EnvVarMap;
use crate::tree::ConfigTree;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z0-9_:/-]+)\}").expect("placeholder pattern is a valid regex")
});

/// Handler for a `${name:args}` placeholder. Receives the colon-separated
/// arguments; an `Err` carries a message for the user.
pub type FunctionHandler = fn(&[&str]) -> Result<String, String>;

/// Built-in placeholder functions. No names are assigned yet.
pub const FUNCTIONS: &[(&str, FunctionHandler)] = &[];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    #[error("unresolved placeholder `${{{token}}}`: unknown function `{function}`")]
    UnknownFunction { token: String, function: String },

    #[error("placeholder `${{{token}}}` failed in function `{function}`: {message}")]
    FunctionFailed {
        token: String,
        function: String,
        message: String,
    },
}

/// A piece of scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    /// The token between `${` and `}`.
    Placeholder(&'a str),
}

/// Split `input` into literal text and placeholder tokens, in order.
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(input) {
        let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Literal(&input[last..whole.start()]));
        }
        out.push(Segment::Placeholder(token.as_str()));
        last = whole.end();
    }
    if last < input.len() {
        out.push(Segment::Literal(&input[last..]));
    }
    out
}

#[derive(Debug, Clone, Default)]
enum ProcessEnv {
    #[default]
    Inherit,
    Fixed(BTreeMap<String, String>),
}

impl ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        match self {
            Self::Inherit => std::env::var(name).ok(),
            Self::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

/// Resolves placeholders against an [`EnvVarMap`], the process environment
/// and a function table.
#[derive(Debug, Clone)]
pub struct Interpolator {
    functions: &'static [(&'static str, FunctionHandler)],
    process_env: ProcessEnv,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolator {
    /// Built-in functions, real process environment.
    pub fn new() -> Self {
        Self {
            functions: FUNCTIONS,
            process_env: ProcessEnv::Inherit,
        }
    }

    pub fn with_functions(mut self, functions: &'static [(&'static str, FunctionHandler)]) -> Self {
        self.functions = functions;
        self
    }

    /// Replace the process environment fallback with a fixed set of variables.
    pub fn with_process_env<K, V, I>(mut self, vars: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.process_env = ProcessEnv::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn interpolate(&self, input: &str, env: &EnvVarMap) -> Result<String, InterpolationError> {
        let mut out = String::with_capacity(input.len());
        for segment in segments(input) {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(token) => out.push_str(&self.resolve(token, env)?),
            }
        }
        Ok(out)
    }

    /// Coerce `value` to its string form, then interpolate.
    pub fn interpolate_value(
        &self,
        value: &ConfigTree,
        env: &EnvVarMap,
    ) -> Result<String, InterpolationError> {
        self.interpolate(&value.to_string(), env)
    }

    fn resolve(&self, token: &str, env: &EnvVarMap) -> Result<String, InterpolationError> {
        let Some((function, rest)) = token.split_once(':') else {
            return Ok(env
                .get(token)
                .map(str::to_owned)
                .or_else(|| self.process_env.lookup(token))
                .unwrap_or_default());
        };

        let handler = self
            .functions
            .iter()
            .find(|(name, _)| *name == function)
            .map(|(_, handler)| *handler)
            .ok_or_else(|| InterpolationError::UnknownFunction {
                token: token.to_owned(),
                function: function.to_owned(),
            })?;

        let args: Vec<&str> = rest.split(':').collect();
        handler(&args).map_err(|message| InterpolationError::FunctionFailed {
            token: token.to_owned(),
            function: function.to_owned(),
            message,
        })
    }
}
