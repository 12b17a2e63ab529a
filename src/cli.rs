use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand};

use crate::diagnostic::ColorMode;

pub const USAGE: &str =
    "PyToASM: A python to assembly compiler.\nType --help for commands or --info for more information.\n";

#[derive(Parser)]
#[command(name = "pytoasm")]
#[command(about = "A python to assembly compiler front end")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print the version string
    #[arg(long, visible_alias = "v")]
    pub version: bool,

    /// Start the interactive playground
    #[arg(long, visible_alias = "p")]
    pub playground: bool,

    /// Limits file (defaults to pytoasm.toml in the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// When to color diagnostics
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tokenize a source file and print the classified tokens
    Tokens(FileArgs),
    /// Parse a source file and print the AST
    Parse(FileArgs),
}

#[derive(clap::Args)]
pub struct FileArgs {
    /// Input file path
    pub file: PathBuf,
}

impl Cli {
    pub fn color_mode(&self) -> ColorMode {
        match self.color {
            ColorChoice::Auto => ColorMode::Auto,
            ColorChoice::Always => ColorMode::Always,
            ColorChoice::Never => ColorMode::Never,
        }
    }
}

pub fn version_string() -> String {
    format!("PyToASM Version {}.", env!("CARGO_PKG_VERSION"))
}
