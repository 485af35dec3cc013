// isocss/src/cli.rs
//! This file defines the command-line interface (CLI) for the isocss application.
//! License: MIT OR APACHE 2.0

use clap::{Parser, ValueEnum};
use isocss_core::EngineKind;
use log::LevelFilter;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "isocss",
    author = "Obscura Team (Relay)",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scope stylesheets under a single class",
    long_about = "isocss rewrites CSS files so that every rule only applies inside an element carrying a prefix class. Each input is wrapped in `.prefix { ... }`, compiled back to flat CSS and written next to the input as `<name>.iso<ext>` (or under --out-dir).",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Files or directories to process. Directories are searched recursively.
    #[arg(value_name = "PATH", required = true, help = "Files or directories to process (directories are searched recursively).")]
    pub paths: Vec<PathBuf>,

    /// Class used to isolate the stylesheets.
    #[arg(long = "prefix-class", short = 'p', value_name = "CLASS", help = "Prefix class used to isolate CSS (default: derived from package.json's name).")]
    pub prefix_class: Option<String>,

    /// Extensions of the files to process (comma-separated).
    #[arg(long, short = 'e', value_name = "EXTS", value_delimiter = ',', help = "Comma separated list of extensions that should be processed (default: .css).")]
    pub extensions: Vec<String>,

    /// Regular expression of paths to skip.
    #[arg(long, short = 'i', value_name = "REGEX", help = "Regular expression of paths to ignore.")]
    pub ignore: Option<String>,

    /// Directory where processed files are written.
    #[arg(long = "out-dir", short = 'o', value_name = "DIR", help = "Directory where processed files should be saved.")]
    pub out_dir: Option<PathBuf>,

    #[arg(long = "create-out-dir", short = 'c', help = "Create the output directory if it doesn't exist.")]
    pub create_out_dir: bool,

    /// Number of leading path components removed from output paths.
    #[arg(long, short = 'u', value_name = "N", help = "Slice N leading components off the output paths (requires --out-dir).")]
    pub up: Option<usize>,

    #[arg(long = "remove-root-selectors", short = 'r', help = "Remove html, body and :root from the isolated selectors.")]
    pub remove_root_selectors: bool,

    #[arg(long = "remove-source-maps", short = 's', help = "Remove sourceMappingURL references from the output.")]
    pub remove_source_maps: bool,

    #[arg(long, help = "Write indented CSS instead of minified CSS.")]
    pub pretty: bool,

    #[arg(long, short = 'f', help = "Overwrite existing output files.")]
    pub force: bool,

    /// Select which namespacing backend to use.
    #[arg(long, value_enum, value_name = "ENGINE", help = "Select the namespacing engine (default: lightning).")]
    pub engine: Option<EngineChoice>,

    /// Path of the `lessc` executable.
    #[arg(long, env = "ISOCSS_LESSC", value_name = "PATH", help = "Path of the lessc executable used by --engine lessc.")]
    pub lessc: Option<PathBuf>,

    /// Path to a YAML configuration file.
    #[arg(long, value_name = "FILE", help = "Path to a YAML configuration file (default: .isocss.yml in the working directory).")]
    pub config: Option<PathBuf>,

    /// Disable informational messages
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,
}

impl Cli {
    /// Log level forced by the command line, if any. `None` defers to `RUST_LOG`.
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.debug {
            Some(LevelFilter::Debug)
        } else if self.quiet {
            Some(LevelFilter::Off)
        } else {
            None
        }
    }
}

/// Enum for selecting the namespacing engine.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum EngineChoice {
    /// The in-process lightningcss compiler.
    Lightning,
    /// The external LESS compiler.
    Lessc,
}

impl From<EngineChoice> for EngineKind {
    fn from(choice: EngineChoice) -> Self {
        match choice {
            EngineChoice::Lightning => EngineKind::Lightning,
            EngineChoice::Lessc => EngineKind::Lessc,
        }
    }
}
