pub mod build;
pub mod completions;
pub mod init;
pub mod palette;
pub mod resolve;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

/// swatch - icon palette pipeline
#[derive(Parser, Debug)]
#[command(name = "swatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log pipeline internals (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export icons from the design document and write the library index
    Build(build::BuildArgs),

    /// Check an icon library index and its SVG files
    Validate(validate::ValidateArgs),

    /// Print the shared palette of an icon library
    Palette(palette::PaletteArgs),

    /// Resolve rendered colours under a customization profile
    Resolve(resolve::ResolveArgs),

    /// Write a default swatch.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load `--config` if given, else discover swatch.yaml in the working directory.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(Path::new(".")),
    }
}

/// An explicit index path, or the one the configuration points at.
pub(crate) fn index_path(explicit: Option<PathBuf>, config: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(load_config(config)?.index_path()),
    }
}
