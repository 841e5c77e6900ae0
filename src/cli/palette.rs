//! Palette command implementation.
//!
//! Prints the shared palette of a built library to stdout.

use std::path::PathBuf;

use clap::Args;

use crate::customize::group_gradients;
use crate::error::{Result, SwatchError};
use crate::output::{display_path, plural, Printer};
use crate::palette::{IconLibraryData, UniqueGradientStructure};

/// Print solid colours and gradients of an icon library
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Index file (default: the one configured in swatch.yaml)
    pub index: Option<PathBuf>,

    /// Path to swatch.yaml
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Group gradients by colour signature
    #[arg(long)]
    pub collapsed: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let index = super::index_path(args.index, args.config.as_deref())?;
    let library = IconLibraryData::load(&index)?;
    let palette = &library.palette;

    printer.status(
        "Loaded",
        &format!(
            "{} and {} from {}",
            plural(palette.unique_solid_colors.len(), "solid colour", "solid colours"),
            plural(palette.unique_gradients.len(), "gradient", "gradients"),
            display_path(&index)
        ),
    );

    if args.collapsed {
        let groups = group_gradients(&palette.unique_gradients);
        if args.json {
            return print_json(&groups);
        }
        for group in &groups {
            println!(
                "{}  {}",
                group.color_signature,
                plural(group.original_hashes.len(), "gradient", "gradients")
            );
            for hash in &group.original_hashes {
                println!("  {}", hash);
            }
        }
        return Ok(());
    }

    if args.json {
        return print_json(palette);
    }

    for color in &palette.unique_solid_colors {
        println!("{}", color);
    }
    for gradient in &palette.unique_gradients {
        println!("{}", describe(gradient));
    }
    Ok(())
}

/// `hash  linear  red@0 blue@1`
fn describe(gradient: &UniqueGradientStructure) -> String {
    let stops: Vec<String> = gradient
        .gradient
        .stops
        .iter()
        .map(|s| {
            if s.opacity < 1.0 {
                format!("{}@{}/{}", s.color, s.offset, s.opacity)
            } else {
                format!("{}@{}", s.color, s.offset)
            }
        })
        .collect();
    format!("{}  {}  {}", gradient.hash, gradient.gradient.kind.as_str(), stops.join(" "))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| SwatchError::Build {
        message: format!("Failed to serialize palette: {}", e),
        help: None,
    })?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{GradientInfo, GradientKind};

    #[test]
    fn test_describe_gradient() {
        let gradient = UniqueGradientStructure {
            hash: "0123456789abcdef".to_string(),
            gradient: GradientInfo::new(GradientKind::Radial)
                .with_stop(0.0, "#fff", 0.5)
                .with_stop(1.0, "#000", 1.0),
        };
        assert_eq!(describe(&gradient), "0123456789abcdef  radial  #fff@0/0.5 #000@1");
    }
}
