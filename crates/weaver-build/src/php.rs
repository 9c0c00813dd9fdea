use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// ini file written into the checkout for PHP runtimes.
pub const PHP_INI_FILENAME: &str = "weaver-php.ini";

const PREAMBLE: &str = "\
; Generated by weaver. Do not edit.
[PHP]
expose_php = Off
display_errors = Off
log_errors = On
error_log = /dev/stderr
";

/// Contents of the generated PHP ini file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhpIni {
    pub extensions: Vec<String>,
    /// `key=value` directives, already interpolated.
    pub directives: Vec<String>,
}

impl PhpIni {
    pub fn render(&self) -> String {
        let mut out = String::from(PREAMBLE);
        for extension in &self.extensions {
            out.push_str(&format!("extension={extension}\n"));
        }
        for directive in &self.directives {
            out.push_str(directive);
            out.push('\n');
        }
        out
    }

    pub fn write(&self, source_dir: &Path) -> Result<PathBuf, RenderError> {
        let path = source_dir.join(PHP_INI_FILENAME);
        std::fs::write(&path, self.render()).map_err(|e| RenderError::WriteRuntimeConfig {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}
