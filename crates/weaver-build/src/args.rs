/// Port the server listens on inside the container.
pub const HTTP_PORT: u16 = 8080;

/// Server executable the image runs.
pub const SERVER_BINARY: &str = "uwsgi";

/// Access-log format, combined-log style.
pub const LOG_FORMAT: &str = r#"%(addr) - %(user) [%(ltime)] "%(method) %(uri) %(proto)" %(status) %(size) "%(referer)" "%(uagent)" %(msecs)ms"#;

/// Ordered uWSGI command-line arguments.
///
/// Append-only: routing rules are evaluated top to bottom, so insertion
/// order is the routing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeArgs {
    args: Vec<String>,
}

impl RuntimeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bare `--name` switch.
    pub fn flag(&mut self, name: &str) {
        self.args.push(format!("--{name}"));
    }

    /// Append `--name=value`.
    pub fn option(&mut self, name: &str, value: impl AsRef<str>) {
        self.args.push(format!("--{name}={}", value.as_ref()));
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Index of the first argument equal to `arg`.
    pub fn position(&self, arg: &str) -> Option<usize> {
        self.args.iter().position(|a| a == arg)
    }

    pub fn contains(&self, arg: &str) -> bool {
        self.position(arg).is_some()
    }
}

impl<'a> IntoIterator for &'a RuntimeArgs {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

/// Flags every rendered server starts with.
pub(crate) fn baseline(args: &mut RuntimeArgs, docroot: &str) {
    args.option("http-socket", format!("0.0.0.0:{HTTP_PORT}"));
    args.flag("auto-procname");
    args.option("procname-prefix-spaced", "[weaver]");
    args.option("chdir", docroot);
    args.flag("master");
    args.flag("enable-threads");
    args.option("offload-threads", "2");
    args.option("log-format", LOG_FORMAT);
}
