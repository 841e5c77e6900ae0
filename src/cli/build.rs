//! Build command implementation.
//!
//! Runs the export pipeline against the document API and writes SVGs plus
//! the library index.

use std::path::PathBuf;

use clap::Args;

use crate::config::{Credentials, OptimizerKind};
use crate::error::{Result, SwatchError};
use crate::fetch::FigmaClient;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{BuildReport, Pipeline};

/// Export icons and write the icon library index
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to swatch.yaml (default: ./swatch.yaml when present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output directory, overriding the configuration
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Node ids per export request, overriding the configuration
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Skip the SVG optimizer
    #[arg(long)]
    pub no_optimize: bool,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            return Err(SwatchError::config(
                "--batch-size must be at least 1",
                "Omit it to use the configured batch size",
            ));
        }
        config.batch_size = batch_size;
    }
    if args.no_optimize {
        config.optimizer = OptimizerKind::None;
    }

    // Before any network access
    let credentials = Credentials::from_env()?;
    printer.status("Fetching", &format!("document {}", credentials.document_key));

    let client = FigmaClient::new(&config.api_base, credentials, config.timeout())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(Pipeline::new(&client, &config).run())?;

    print_report(&report, printer);

    if !report.failed_batches.is_empty() {
        return Err(SwatchError::Build {
            message: format!(
                "{} failed, {} not exported",
                plural(report.failed_batches.len(), "batch", "batches"),
                plural(report.failed_nodes(), "node", "nodes")
            ),
            help: Some("The index was written without them; re-run `swatch build`".to_string()),
        });
    }

    Ok(())
}

fn print_report(report: &BuildReport, printer: &Printer) {
    printer.diagnostics(&report.diagnostics);

    for batch in &report.failed_batches {
        printer.error(
            "Failed",
            &format!("batch of {}: {}", plural(batch.node_ids.len(), "node", "nodes"), batch.error),
        );
        printer.info("Attempted", &batch.node_ids.join(", "));
    }

    let library = &report.library;
    printer.info(
        "Selected",
        &format!(
            "{} of {}",
            plural(report.selected, "icon", "icons"),
            plural(report.sets_found, "icon set", "icon sets")
        ),
    );
    printer.status(
        "Wrote",
        &format!(
            "{} with {} and {} to {}",
            plural(report.written, "icon", "icons"),
            plural(library.palette.unique_solid_colors.len(), "solid colour", "solid colours"),
            plural(library.palette.unique_gradients.len(), "gradient", "gradients"),
            display_path(&report.index_path)
        ),
    );
}
