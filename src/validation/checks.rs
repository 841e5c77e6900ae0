//! Consistency checks for a built icon library.
//!
//! Each check takes the library (and, for file checks, the output root)
//! and returns its own `Diagnostics`.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use walkdir::WalkDir;

use crate::palette::{gradient_hash, IconLibraryData};

use super::warning::{Diagnostic, Diagnostics};

/// Every gradient ref must point into the palette.
pub fn check_dangling_refs(library: &IconLibraryData) -> Diagnostics {
    let mut result = Diagnostics::new();
    let known: HashSet<&str> = library
        .palette
        .unique_gradients
        .iter()
        .map(|g| g.hash.as_str())
        .collect();

    for icon in &library.icons {
        for hash in &icon.gradient_refs {
            if !known.contains(hash.as_str()) {
                result.push(
                    Diagnostic::error(
                        "swatch::validate::dangling-ref",
                        format!("gradient ref '{}' is not in the palette", hash),
                    )
                    .about(&icon.file_path)
                    .with_help("Regenerate the index with `swatch build`"),
                );
            }
        }
    }

    result
}

/// Each palette hash appears once.
pub fn check_duplicate_hashes(library: &IconLibraryData) -> Diagnostics {
    let mut result = Diagnostics::new();
    let mut seen = HashSet::new();

    for gradient in &library.palette.unique_gradients {
        if !seen.insert(gradient.hash.as_str()) {
            result.error(
                "swatch::validate::duplicate-hash",
                &gradient.hash,
                "gradient appears more than once in the palette",
            );
        }
    }

    result
}

/// Stored hashes match what the current hasher computes.
pub fn check_hash_drift(library: &IconLibraryData) -> Diagnostics {
    let mut result = Diagnostics::new();

    for gradient in &library.palette.unique_gradients {
        let computed = gradient_hash(&gradient.gradient);
        if computed != gradient.hash {
            result.push(
                Diagnostic::warning(
                    "swatch::validate::hash-drift",
                    format!("stored hash differs from computed hash {}", computed),
                )
                .about(&gradient.hash)
                .with_help("The index was written by a different hasher; rebuild it"),
            );
        }
    }

    result
}

/// No two icons share a file path.
pub fn check_duplicate_paths(library: &IconLibraryData) -> Diagnostics {
    let mut result = Diagnostics::new();
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for icon in &library.icons {
        if let Some(first) = seen.insert(icon.file_path.as_str(), icon.node_id.as_str()) {
            result.error(
                "swatch::validate::duplicate-path",
                &icon.file_path,
                format!("used by nodes {} and {}", first, icon.node_id),
            );
        }
    }

    result
}

/// The solid palette is sorted, unique, and covers every icon's solids.
pub fn check_solid_palette(library: &IconLibraryData) -> Diagnostics {
    let mut result = Diagnostics::new();
    let solids = &library.palette.unique_solid_colors;

    if solids.windows(2).any(|w| w[0] >= w[1]) {
        result.push(
            Diagnostic::warning(
                "swatch::validate::unsorted-solids",
                "uniqueSolidColors is not sorted and deduplicated",
            )
            .with_help("Regenerate the index with `swatch build`"),
        );
    }

    let known: BTreeSet<&str> = solids.iter().map(String::as_str).collect();
    for icon in &library.icons {
        for color in &icon.solid_colors {
            if !known.contains(color.as_str()) {
                result.error(
                    "swatch::validate::unknown-solid",
                    &icon.file_path,
                    format!("solid colour '{}' is missing from the palette", color),
                );
            }
        }
    }

    result
}

/// Gradients no icon refers to.
pub fn check_unused_gradients(library: &IconLibraryData) -> Diagnostics {
    let mut result = Diagnostics::new();
    let used: HashSet<&str> = library
        .icons
        .iter()
        .flat_map(|i| i.gradient_refs.iter().map(String::as_str))
        .collect();

    for gradient in &library.palette.unique_gradients {
        if !used.contains(gradient.hash.as_str()) {
            result.warn(
                "swatch::validate::unused-gradient",
                &gradient.hash,
                "no icon refers to this gradient",
            );
        }
    }

    result
}

/// Indexed SVGs exist under `root`, and no unindexed SVGs sit beside them.
pub fn check_files(library: &IconLibraryData, root: &Path) -> Diagnostics {
    let mut result = Diagnostics::new();

    let indexed: HashSet<&str> = library.icons.iter().map(|i| i.file_path.as_str()).collect();
    for icon in &library.icons {
        let path = icon.file_path.split('/').fold(root.to_path_buf(), |acc, p| acc.join(p));
        if !path.is_file() {
            result.error(
                "swatch::validate::missing-svg",
                &icon.file_path,
                format!("{} does not exist", path.display()),
            );
        }
    }

    let mut orphans = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some("svg")
        {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let relative: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let relative = relative.join("/");
        if !indexed.contains(relative.as_str()) {
            orphans.push(relative);
        }
    }

    orphans.sort();
    for orphan in orphans {
        result.push(
            Diagnostic::warning("swatch::validate::orphan-svg", "SVG file is not in the index")
                .about(orphan)
                .with_help("Delete it or rebuild the output directory from scratch"),
        );
    }

    result
}
