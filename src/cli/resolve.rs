//! Resolve command implementation.
//!
//! Applies a saved customization profile to a library and prints the
//! colours each icon would render with.

use std::path::PathBuf;

use clap::Args;

use crate::customize::{ColorResolver, CustomizationState, CustomizationStore, ResolvedIcon};
use crate::error::{Result, SwatchError};
use crate::output::{display_path, plural, Printer};
use crate::palette::IconLibraryData;

/// Resolve rendered colours under a customization profile
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Index file produced by `swatch build`
    pub index: PathBuf,

    /// Customization profile (JSON)
    #[arg(long, short)]
    pub profile: PathBuf,

    /// Only this icon (name as in the index)
    #[arg(long)]
    pub icon: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ResolveArgs, printer: &Printer) -> Result<()> {
    let library = IconLibraryData::load(&args.index)?;
    let state = CustomizationState::load(&args.profile)?;

    let mut store = CustomizationStore::new(&library.palette);
    let pruned = store.load_state(state);
    if pruned > 0 {
        printer.warning(
            "Pruned",
            &format!("{} not in this palette", plural(pruned, "stale override", "stale overrides")),
        );
    }
    printer.status(
        "Resolving",
        &format!("{} in {} mode", display_path(&args.index), store.state().mode),
    );

    let icons = match &args.icon {
        Some(name) => {
            let icon = library.icon(name).ok_or_else(|| SwatchError::Validation {
                message: format!("no icon named '{}'", name),
                help: Some("Run `swatch palette` or inspect the index for icon names".to_string()),
            })?;
            vec![icon]
        }
        None => library.icons.iter().collect(),
    };

    let resolver = ColorResolver::new(store.state(), store.palette());
    let resolved: Vec<ResolvedIcon> = icons.into_iter().map(|i| resolver.resolve_icon(i)).collect();

    if args.json {
        let json = serde_json::to_string_pretty(&resolved).map_err(|e| SwatchError::Build {
            message: format!("Failed to serialize resolved colours: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    for icon in &resolved {
        println!("{}", icon.name);
        for solid in &icon.solids {
            println!("  {} -> {}", solid.original, solid.paint);
        }
        for gradient in &icon.gradients {
            let stops: Vec<String> = gradient.stops.iter().map(|p| p.to_string()).collect();
            println!("  {} -> {}", gradient.hash, stops.join(" "));
        }
    }
    Ok(())
}
