//! Validate command implementation.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{Result, SwatchError};
use crate::output::{display_path, plural, Printer};
use crate::palette::IconLibraryData;
use crate::validation::validate_library;

/// Check an icon library index and the SVG files next to it
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Index file (default: the one configured in swatch.yaml)
    pub index: Option<PathBuf>,

    /// Path to swatch.yaml
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Only check the index, not the SVG files
    #[arg(long)]
    pub index_only: bool,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let index = super::index_path(args.index, args.config.as_deref())?;
    let library = IconLibraryData::load(&index)?;
    printer.status(
        "Checking",
        &format!("{} ({})", display_path(&index), plural(library.icons.len(), "icon", "icons")),
    );

    let root = index
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let output = (!args.index_only).then_some(root);
    let diagnostics = validate_library(&library, output);
    printer.diagnostics(&diagnostics);

    let failed = diagnostics.has_errors() || (args.strict && diagnostics.warning_count() > 0);
    if failed {
        return Err(SwatchError::Validation {
            message: format!("{} is not consistent", display_path(&index)),
            help: Some("Regenerate it with `swatch build`".to_string()),
        });
    }

    printer.status("Finished", "index is consistent");
    Ok(())
}
