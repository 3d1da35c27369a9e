//! Diagram run command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use blockflow_core::{Block, Flowchart, Globals, RecomputeReport, Value};
use blockflow_registry::BlockRegistry;
use clap::Args;
use serde::Serialize;

use super::common::{load_diagram, parse_global};

#[derive(Args)]
pub struct RunArgs {
    /// Diagram file (.toml or .json)
    diagram: PathBuf,

    /// Override a global variable (can be repeated)
    #[arg(short, long = "global", value_name = "NAME=NUMBER", value_parser = parse_global)]
    globals: Vec<(String, f64)>,

    /// Number of recomputes to run. Stateful blocks advance once per pass,
    /// so a tick that needs extra passes to settle globals advances them more than once
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    ticks: u32,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Exit with an error if any block failed or a cycle was skipped
    #[arg(long)]
    strict: bool,
}

/// Machine-readable result of a run.
#[derive(Serialize)]
struct RunOutput {
    diagram: String,
    passes: usize,
    globals_settled: bool,
    evaluated: Vec<String>,
    failures: Vec<FailureOutput>,
    cycles: Vec<Vec<String>>,
    values: BTreeMap<String, BTreeMap<String, Value>>,
    globals: Globals,
}

#[derive(Serialize)]
struct FailureOutput {
    block: String,
    error: String,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut diagram = load_diagram(&args.diagram)?;
    for (name, value) in &args.globals {
        diagram.globals.insert(name.clone(), Value::Scalar(*value));
    }

    let registry = BlockRegistry::new();
    let mut chart = diagram
        .build(&registry)
        .with_context(|| format!("building {}", args.diagram.display()))?;

    let mut report = RecomputeReport::default();
    for tick in 1..=args.ticks {
        report = chart.update_results()?;
        tracing::debug!(tick, passes = report.passes, "recomputed");
    }

    let output = collect(&diagram.name, &chart, &report);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_table(&output);
    }

    if args.strict && !report.is_clean() {
        bail!(
            "run not clean: {} failed, {} cycles, globals settled: {}",
            report.failures.len(),
            report.cycles.len(),
            report.globals_settled
        );
    }
    Ok(())
}

/// Values shown for a block: its outputs, or its inputs if it is a sink.
fn shown_values(block: &dyn Block) -> BTreeMap<String, Value> {
    let ports = block.ports();
    let shown: Vec<_> = if ports.outputs().next().is_some() {
        ports.outputs().collect()
    } else {
        ports.inputs().collect()
    };
    shown
        .into_iter()
        .map(|p| (p.uid().to_string(), p.value.clone()))
        .collect()
}

fn collect(name: &str, chart: &Flowchart, report: &RecomputeReport) -> RunOutput {
    let uid = |id| chart.block(id).map_or_else(String::new, |b| b.uid().to_string());

    RunOutput {
        diagram: name.to_string(),
        passes: report.passes,
        globals_settled: report.globals_settled,
        evaluated: report.evaluated.iter().map(|&id| uid(id)).collect(),
        failures: report
            .failures
            .iter()
            .map(|f| FailureOutput {
                block: f.uid.clone(),
                error: f.source.to_string(),
            })
            .collect(),
        cycles: report.cycles.iter().map(|c| c.uids.clone()).collect(),
        values: chart
            .block_ids()
            .filter_map(|id| chart.block(id))
            .map(|b| (b.uid().to_string(), shown_values(b)))
            .collect(),
        globals: chart.globals().clone(),
    }
}

fn print_table(output: &RunOutput) {
    println!("{}", output.diagram);
    println!("{}", "=".repeat(output.diagram.len()));
    println!();
    println!(
        "Recompute: {} evaluated, {} failed, {} pass{}",
        output.evaluated.len(),
        output.failures.len(),
        output.passes,
        if output.passes == 1 { "" } else { "es" }
    );
    println!();

    for (block, ports) in &output.values {
        for (port, value) in ports {
            println!("  {:24} = {}", format!("{block}.{port}"), value);
        }
    }

    if !output.globals.is_empty() {
        println!();
        println!("Globals:");
        for (name, value) in &output.globals {
            println!("  {name:24} = {value}");
        }
    }

    if !output.failures.is_empty() {
        println!();
        println!("Failures:");
        for f in &output.failures {
            println!("  {}: {}", f.block, f.error);
        }
    }

    if !output.cycles.is_empty() {
        println!();
        println!("Skipped cycles:");
        for cycle in &output.cycles {
            println!("  {}", cycle.join(" -> "));
        }
    }

    if !output.globals_settled {
        println!();
        println!("Warning: globals were still changing when the pass limit was reached.");
    }
}
