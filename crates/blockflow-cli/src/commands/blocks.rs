//! Block kind listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use blockflow_core::{Block, Port};
use blockflow_registry::{BlockCategory, BlockRegistry};
use clap::Args;

#[derive(Args)]
pub struct BlocksArgs {
    /// Show ports and default properties for a specific kind
    #[arg(value_name = "KIND")]
    kind: Option<String>,

    /// Only list kinds whose id, name, category or description match
    #[arg(short, long)]
    search: Option<String>,
}

pub fn run(args: BlocksArgs) -> anyhow::Result<()> {
    let registry = BlockRegistry::new();

    if let Some(kind) = &args.kind {
        let descriptor = registry
            .get(kind)
            .ok_or_else(|| anyhow::anyhow!("Unknown block kind: {}", kind))?;
        let block = registry
            .create(descriptor.kind, descriptor.kind)
            .ok_or_else(|| anyhow::anyhow!("Cannot create block kind: {}", kind))?;

        println!("{} ({})", descriptor.name, descriptor.kind);
        println!("{}", "=".repeat(descriptor.name.len() + descriptor.kind.len() + 3));
        println!();
        println!("{}", descriptor.description);
        println!("Category: {}", descriptor.category.name());
        println!();
        print_ports(block.as_ref());
        println!();

        let properties = block.properties();
        if properties.is_empty() {
            println!("Properties: none");
        } else {
            println!("Properties:");
            println!();
            println!("  {:16}  {}", "Name", "Default");
            println!("  {:16}  {}", "----", "-------");
            for (key, value) in &properties {
                println!("  {key:16}  {value}");
            }
        }
        return Ok(());
    }

    let query = args.search.as_deref().unwrap_or("");
    println!("Available Blocks");
    println!("================");

    for category in BlockCategory::ALL {
        let matching: Vec<_> = registry
            .blocks_in_category(category)
            .into_iter()
            .filter(|d| d.matches_query(query))
            .collect();
        if matching.is_empty() {
            continue;
        }
        println!();
        println!("{}", category.name());
        for d in matching {
            println!("  {:16} - {}", d.kind, d.description);
        }
    }

    println!();
    println!("Use 'blockflow blocks <kind>' for ports and properties.");
    Ok(())
}

fn print_ports(block: &dyn Block) {
    println!("Inputs:  {}", port_list(block.ports().inputs()));
    println!("Outputs: {}", port_list(block.ports().outputs()));
}

fn port_list<'a>(ports: impl Iterator<Item = &'a Port>) -> String {
    let list: Vec<_> = ports.map(Port::uid).collect();
    if list.is_empty() {
        "none".to_string()
    } else {
        list.join(", ")
    }
}
