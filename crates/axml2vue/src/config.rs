//! Configuration loading and management.

use crate::cli::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Markup files converted to `.vue`.
pub const MARKUP_EXT: &str = "axml";
/// Helper modules referenced from markup, copied verbatim.
pub const HELPER_EXT: &str = "sjs";
/// Scripts scanned for declaration calls.
pub const SCRIPT_EXTS: &[&str] = &["js", "ts"];
/// Source stylesheets used to seed generated styles.
pub const SOURCE_STYLE_EXT: &str = "acss";
/// Generated stylesheets linked from `.vue` files.
pub const STYLE_EXT: &str = "css";
/// Generated single-file components.
pub const VUE_EXT: &str = "vue";

/// Patterns always ignored.
const DEFAULT_IGNORES: &[&str] = &[
    "**/node_modules",
    "**/node_modules/**",
    "**/.git",
    "**/.git/**",
];

/// Fatal configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required argument --input <DIR>")]
    MissingInput,

    #[error("missing required argument --output <DIR>")]
    MissingOutput,

    #[error("input directory `{0}` does not exist or is not a directory")]
    InputNotDirectory(PathBuf),

    #[error("output directory `{output}` lies inside input directory `{input}`")]
    OutputInsideInput { input: PathBuf, output: PathBuf },

    #[error("invalid ignore pattern `{pattern}`")]
    InvalidIgnore {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Configuration for axml2vue.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root to convert.
    pub input: PathBuf,
    /// Root of the converted project.
    pub output: PathBuf,
    /// Default and user ignore patterns, compiled.
    ignore: GlobSet,
    /// Whether to write `declare.d.ts`.
    pub declarations: bool,
}

impl Config {
    /// Load configuration from CLI arguments.
    pub fn load(args: &Args) -> Result<Self> {
        let input = args
            .input
            .as_deref()
            .ok_or(ConfigError::MissingInput)
            .into_diagnostic()?;
        let output = args
            .output
            .as_deref()
            .ok_or(ConfigError::MissingOutput)
            .into_diagnostic()?;

        let input = expand(input);
        if !input.is_dir() {
            return Err(ConfigError::InputNotDirectory(input)).into_diagnostic();
        }
        let input = input.canonicalize().into_diagnostic()?;
        let output = absolute(&expand(output))?;

        let resolved_output = resolve(&output);
        if resolved_output.starts_with(&input) {
            return Err(ConfigError::OutputInsideInput {
                input,
                output: resolved_output,
            })
            .into_diagnostic();
        }

        let patterns: Vec<String> = DEFAULT_IGNORES
            .iter()
            .map(|p| p.to_string())
            .chain(args.ignore.iter().cloned())
            .collect();
        let ignore = build_ignore(&patterns).into_diagnostic()?;

        Ok(Self {
            input,
            output,
            ignore,
            declarations: !args.no_declarations,
        })
    }

    /// Check if a path relative to the input root is ignored.
    pub fn is_ignored(&self, relative: &Path) -> bool {
        self.ignore.is_match(relative)
    }
}

fn build_ignore(patterns: &[String]) -> std::result::Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidIgnore {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidIgnore {
        pattern: patterns.join(", "),
        source,
    })
}

/// Expand `~` and environment variables in a path.
fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(&raw).into_owned()),
    }
}

/// Canonicalize the longest existing prefix of a path.
fn resolve(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir().into_diagnostic()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["axml2vue"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_missing_paths() {
        let err = Config::load(&args(&[])).unwrap_err();
        assert!(err.to_string().contains("--input"));

        let err = Config::load(&args(&["-i", "."])).unwrap_err();
        assert!(err.to_string().contains("--output"));
    }

    #[test]
    fn test_input_must_be_directory() {
        let err = Config::load(&args(&["-i", "/definitely/not/here", "-o", "out"])).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        let config = Config::load(&args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--ignore",
            "**/mock/**",
        ]))
        .unwrap();

        assert!(config.is_ignored(Path::new("node_modules")));
        assert!(config.is_ignored(Path::new("pages/node_modules/a.js")));
        assert!(config.is_ignored(Path::new("mock/data.js")));
        assert!(!config.is_ignored(Path::new("pages/index/index.axml")));
        assert!(config.declarations);
    }

    #[test]
    fn test_output_inside_input_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().to_path_buf();
        let output = input.join("dist");
        let err = Config::load(&args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("lies inside"));
    }
}
