use std::fmt;

use crate::args::{RuntimeArgs, SERVER_BINARY};

/// Recipe filename written into the source checkout.
pub const RECIPE_FILENAME: &str = "Weaver.Dockerfile";

/// Directory the source is copied to inside the image.
pub const APP_DIR: &str = "/app";

/// Base image for descriptors without a language runtime.
pub const DEFAULT_BASE_IMAGE: &str = "weaver/uwsgi:2.0";

/// One line of the container build recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    From(String),
    Expose(u16),
    Workdir(String),
    Copy { from: String, to: String },
    Run(String),
    Env { name: String, value: String },
    Cmd(Vec<String>),
}

impl Instruction {
    /// `CMD` running the server with `args`.
    pub fn server_cmd(args: &RuntimeArgs) -> Self {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(SERVER_BINARY.to_owned());
        argv.extend(args.iter().cloned());
        Self::Cmd(argv)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From(image) => write!(f, "FROM {image}"),
            Self::Expose(port) => write!(f, "EXPOSE {port}"),
            Self::Workdir(dir) => write!(f, "WORKDIR {dir}"),
            Self::Copy { from, to } => write!(f, "COPY {from} {to}"),
            Self::Run(command) => write!(f, "RUN {command}"),
            Self::Env { name, value } => write!(f, "ENV {name}=\"{}\"", escape(value)),
            Self::Cmd(argv) => {
                let quoted: Vec<String> = argv.iter().map(|a| format!("\"{}\"", escape(a))).collect();
                write!(f, "CMD [{}]", quoted.join(", "))
            }
        }
    }
}

/// Escape backslashes and double quotes for a double-quoted string.
pub fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// The ordered build recipe.
///
/// Append-only; each instruction is one image layer step, so order is the
/// build order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInstructions {
    instructions: Vec<Instruction>,
}

impl BuildInstructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Dockerfile text, one instruction per line.
    pub fn render(&self) -> String {
        let mut out = String::from("# Generated by weaver. Do not edit.\n");
        for instruction in &self.instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out
    }
}
