//! Consolidate command - merge declared rule lists from several sources

use anyhow::{Context, Result};
use colored::Colorize;
use rulekit::{RuleDescriptor, consolidate};
use serde_json::Value;

use crate::Context as AppContext;
use crate::cli::ConsolidateArgs;
use crate::model::security::load_rule_file;
use crate::ui;

pub fn run(ctx: &AppContext, args: ConsolidateArgs) -> Result<()> {
    let mut rules = Vec::new();
    for path in &args.files {
        let loaded = load_rule_file(path)?;
        log::info!("{}: {}", path.display(), ui::plural(loaded.len(), "rule", "rules"));
        rules.extend(loaded);
    }

    let before = rules.len();
    let merged = consolidate(rules);

    let output = Value::Array(
        merged
            .iter()
            .map(RuleDescriptor::to_field_map)
            .map(Value::Object)
            .collect(),
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize rules")?
    );

    // stdout carries only the JSON document
    if !ctx.quiet {
        eprintln!(
            "{}",
            format!(
                "{} consolidated into {}",
                ui::plural(before, "rule", "rules"),
                merged.len()
            )
            .dimmed()
        );
    }
    Ok(())
}
