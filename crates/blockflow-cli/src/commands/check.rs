//! Diagram validation command.

use std::path::PathBuf;

use anyhow::bail;
use blockflow_config::{ValidationError, validate_diagram};
use blockflow_registry::BlockRegistry;
use clap::Args;

use super::common::load_diagram;

#[derive(Args)]
pub struct CheckArgs {
    /// Diagram file (.toml or .json)
    diagram: PathBuf,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let diagram = load_diagram(&args.diagram)?;
    let registry = BlockRegistry::new();

    if let Err(err) = validate_diagram(&diagram, &registry) {
        let errors = match err {
            ValidationError::Multiple(errors) => errors,
            single => vec![single],
        };
        println!("{}: {} problem(s)", args.diagram.display(), errors.len());
        for e in &errors {
            println!("  - {e}");
        }
        bail!("{} is not a valid diagram", args.diagram.display());
    }

    let chart = diagram.build(&registry)?;
    let cycles = chart.find_cycles();

    println!(
        "{}: ok ({} blocks, {} connectors, {} globals)",
        args.diagram.display(),
        chart.block_count(),
        chart.connector_count(),
        diagram.globals.len()
    );
    for cycle in &cycles {
        tracing::warn!("{cycle}; these blocks will be skipped on every recompute");
        println!("  warning: {cycle}");
    }
    Ok(())
}
