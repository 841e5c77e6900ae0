//! The build pipeline: document to SVG files plus the library index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::{select_variant, DocumentWalker, IconTarget};
use crate::error::{Result, SwatchError};
use crate::fetch::{AssetFetcher, DocumentApi, FailedBatch, FetchSettings};
use crate::palette::{IconLibraryData, PaletteAggregator};
use crate::svg::{extract_colors, normalize_svg, optimizer_for, ColorExtraction, SvgOptimizer};
use crate::validation::Diagnostics;

/// Result of a build run.
#[derive(Debug)]
pub struct BuildReport {
    pub library: IconLibraryData,
    pub index_path: PathBuf,
    /// Icon sets found by the walk.
    pub sets_found: usize,
    /// Sets with a selected variant, sent for export.
    pub selected: usize,
    /// SVG files written.
    pub written: usize,
    pub failed_batches: Vec<FailedBatch>,
    pub diagnostics: Diagnostics,
}

impl BuildReport {
    /// Node ids that were in a failed batch.
    pub fn failed_nodes(&self) -> usize {
        self.failed_batches.iter().map(|b| b.node_ids.len()).sum()
    }
}

/// Normalized markup and colour data for one downloaded icon.
struct ProcessedIcon {
    content: String,
    warnings: Vec<String>,
    extraction: Result<ColorExtraction>,
}

pub struct Pipeline<'a> {
    api: &'a dyn DocumentApi,
    config: &'a Config,
    optimizer: Box<dyn SvgOptimizer>,
}

impl<'a> Pipeline<'a> {
    pub fn new(api: &'a dyn DocumentApi, config: &'a Config) -> Self {
        Self {
            api,
            config,
            optimizer: optimizer_for(config.optimizer),
        }
    }

    pub fn with_optimizer(mut self, optimizer: Box<dyn SvgOptimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Fetch, normalize, index and write every selected icon.
    pub async fn run(&self) -> Result<BuildReport> {
        let document = self.api.fetch_document().await?;

        let walk = DocumentWalker::new(&self.config.page, &self.config.sections).walk(&document)?;
        let mut diagnostics = walk.diagnostics;
        let sets_found = walk.sets.len();
        info!(sets = sets_found, "walked document");

        let mut targets: HashMap<String, IconTarget> = HashMap::new();
        let mut node_ids = Vec::new();
        for set in &walk.sets {
            match select_variant(set) {
                Ok(variant) => {
                    let target = set.target(variant);
                    debug!(name = %set.name, node = %target.node_id, "selected variant");
                    if targets.contains_key(&target.node_id) {
                        continue;
                    }
                    node_ids.push(target.node_id.clone());
                    targets.insert(target.node_id.clone(), target);
                }
                Err(reason) => {
                    warn!(set = %set.raw_name, %reason, "skipping icon set");
                    diagnostics.warn("swatch::select::skipped", &set.raw_name, reason.to_string());
                }
            }
        }

        let optimizer = self.optimizer.as_ref();
        let fetcher = AssetFetcher::new(self.api, FetchSettings::from(self.config));
        let outcome = fetcher
            .fetch(&node_ids, |node_id, raw| process(&targets, optimizer, node_id, &raw))
            .await;
        diagnostics.merge(outcome.diagnostics);

        let mut aggregator = PaletteAggregator::new();
        let mut written = 0;
        for (node_id, processed) in outcome.items {
            let Some(target) = targets.get(&node_id) else {
                continue;
            };
            let Some(processed) = processed else {
                continue;
            };

            for warning in &processed.warnings {
                diagnostics.warn("swatch::normalize", &target.file_path(), warning.clone());
            }

            let extraction = match processed.extraction {
                Ok(extraction) => extraction,
                Err(e) => {
                    warn!(node = %node_id, error = %e, "colour extraction failed, skipping");
                    diagnostics.warn("swatch::extract", &target.file_path(), e.to_string());
                    continue;
                }
            };
            for dropped in &extraction.dropped {
                diagnostics.warn("swatch::extract::gradient", &target.file_path(), dropped.clone());
            }

            if aggregator.add(target, &extraction) {
                write_svg(&self.config.output, &target.file_path(), &processed.content)?;
                written += 1;
            }
        }

        let (library, index_diagnostics) = aggregator.finish();
        diagnostics.merge(index_diagnostics);

        let index_path = self.config.index_path();
        library.save(&index_path)?;
        info!(
            icons = library.icons.len(),
            gradients = library.palette.unique_gradients.len(),
            path = %index_path.display(),
            "wrote index"
        );

        Ok(BuildReport {
            library,
            index_path,
            sets_found,
            selected: node_ids.len(),
            written,
            failed_batches: outcome.failed_batches,
            diagnostics,
        })
    }
}

fn process(
    targets: &HashMap<String, IconTarget>,
    optimizer: &dyn SvgOptimizer,
    node_id: &str,
    raw: &str,
) -> Option<ProcessedIcon> {
    let target = targets.get(node_id)?;
    let normalized = normalize_svg(raw, &target.prefix(), optimizer);
    let extraction = extract_colors(&normalized.content);
    Some(ProcessedIcon {
        content: normalized.content,
        warnings: normalized.warnings,
        extraction,
    })
}

/// Write one icon below `root`. `file_path` is `/`-separated.
fn write_svg(root: &Path, file_path: &str, content: &str) -> Result<()> {
    let path = file_path.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SwatchError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }
    std::fs::write(&path, content).map_err(|e| SwatchError::Io {
        path: path.clone(),
        message: format!("Failed to write SVG: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_svg_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        write_svg(dir.path(), "icon/arrows/arrow-up.svg", "<svg/>").unwrap();

        let written = std::fs::read_to_string(dir.path().join("icon/arrows/arrow-up.svg")).unwrap();
        assert_eq!(written, "<svg/>");
    }

    #[test]
    fn test_process_unknown_node() {
        let targets = HashMap::new();
        let optimizer = crate::svg::Passthrough;
        assert!(process(&targets, &optimizer, "9:9", "<svg/>").is_none());
    }
}
