//! Init command implementation.
//!
//! Writes a `swatch.yaml` holding every setting at its default.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Config, CONFIG_FILENAME, DOCUMENT_ENV, TOKEN_ENV};
use crate::error::{Result, SwatchError};
use crate::output::{display_path, Printer};

/// Initialize a swatch project by writing swatch.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write swatch.yaml into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing swatch.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(SwatchError::Build {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let mut yaml = format!(
        "# Credentials are read from {} and {}, never from this file.\n",
        TOKEN_ENV, DOCUMENT_ENV
    );
    yaml.push_str(&Config::default().to_yaml()?);

    fs::write(&config_path, &yaml).map_err(|e| SwatchError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.status("Created", &display_path(&config_path));
    Ok(())
}
