//! Diagnostics and consistency checks for icon libraries.
//!
//! `Diagnostics` collects the recoverable problems of a build; the checks
//! here back `swatch validate`.

mod checks;
mod warning;

pub use checks::{
    check_dangling_refs, check_duplicate_hashes, check_duplicate_paths, check_files,
    check_hash_drift, check_solid_palette, check_unused_gradients,
};
pub use warning::{Diagnostic, Diagnostics, Severity};

use std::path::Path;

use crate::palette::IconLibraryData;

/// Run every index check. With `output`, also check the SVG files.
pub fn validate_library(library: &IconLibraryData, output: Option<&Path>) -> Diagnostics {
    let mut result = Diagnostics::new();

    result.merge(check_dangling_refs(library));
    result.merge(check_duplicate_hashes(library));
    result.merge(check_hash_drift(library));
    result.merge(check_duplicate_paths(library));
    result.merge(check_solid_palette(library));
    result.merge(check_unused_gradients(library));
    if let Some(root) = output {
        result.merge(check_files(library, root));
    }

    result
}
