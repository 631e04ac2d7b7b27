//! Compilation database input.
//!
//! A compilation database is a `compile_commands.json` file listing, per
//! source file, the command used to compile it. Despite the name there is
//! nothing database-like about it. Each command's argument list is handed
//! to the frontend verbatim; the frontend consumes the include-path flags
//! it understands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// One entry of a compile_commands.json file.
///
/// Either `arguments` (an argv array) or `command` (a single shell string)
/// carries the compile invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileCommand {
    pub directory: PathBuf,
    pub file: PathBuf,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub command: Option<String>,
}

impl CompileCommand {
    /// The compile argv. `command` strings are whitespace-split; quoting
    /// inside them is not interpreted.
    pub fn argv(&self) -> Vec<String> {
        if !self.arguments.is_empty() {
            return self.arguments.clone();
        }
        match &self.command {
            Some(cmd) => cmd.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    /// Absolute path of the source file this command compiles.
    pub fn source_path(&self) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            self.directory.join(&self.file)
        }
    }
}

/// Load `compile_commands.json` from its parent directory `dir`.
pub fn load_compile_commands(dir: &Path) -> Result<Vec<CompileCommand>> {
    let path = dir.join("compile_commands.json");
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let commands: Vec<CompileCommand> = serde_json::from_str(&text)
        .with_context(|| format!("cannot parse '{}'", path.display()))?;
    Ok(commands)
}

/// The compile flags the frontend acts on.
#[derive(Debug, Clone, Default)]
pub struct CompileArgs {
    /// Include search directories, in command-line order.
    pub include_dirs: Vec<PathBuf>,
}

/// Extract the flags the frontend understands from a verbatim argv.
///
/// Handled: `-I <dir>`, `-I<dir>`, `-iquote <dir>`, `-iquote<dir>`.
/// Relative directories resolve against `base_dir`. Everything else is
/// passed over.
pub fn parse_compile_args(argv: &[String], base_dir: &Path) -> CompileArgs {
    let mut include_dirs = Vec::new();
    let mut iter = argv.iter().peekable();

    let resolve = |dir: &str| -> PathBuf {
        let path = Path::new(dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    };

    while let Some(arg) = iter.next() {
        for flag in ["-I", "-iquote"] {
            if arg == flag {
                if let Some(dir) = iter.peek() {
                    include_dirs.push(resolve(dir));
                    iter.next();
                }
                break;
            }
            if let Some(dir) = arg.strip_prefix(flag) {
                if !dir.is_empty() {
                    include_dirs.push(resolve(dir));
                    break;
                }
            }
        }
    }

    CompileArgs { include_dirs }
}

/// Default compile arguments synthesized for a bare `.c` input.
pub fn default_argv() -> Vec<String> {
    ["cc", "-std=c17", "-x", "c"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
