use clap::Parser;
use miette::Result;
use swatch::cli::{Cli, Commands};
use swatch::output::Printer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => swatch::cli::build::run(args, &printer)?,
        Commands::Validate(args) => swatch::cli::validate::run(args, &printer)?,
        Commands::Palette(args) => swatch::cli::palette::run(args, &printer)?,
        Commands::Resolve(args) => swatch::cli::resolve::run(args, &printer)?,
        Commands::Init(args) => swatch::cli::init::run(args, &printer)?,
        Commands::Completions(args) => swatch::cli::completions::run(args)?,
    }

    Ok(())
}

/// Diagnostics reach the user through the printer, so library logs stay
/// quiet unless asked for with `--verbose` or `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "swatch=debug" } else { "swatch=error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
