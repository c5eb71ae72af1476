//! Diff command - show how live IAM resources differ from their declarations

use anyhow::{Context, Result};
use changeset::{ChangeKind, ChangeSet, ChangeSummary, group_by_kind};
use colored::Colorize;

use crate::Context as AppContext;
use crate::cli::DiffArgs;
use crate::compare;
use crate::config::{self, Settings};
use crate::model::iam::{IamConfig, IamSnapshot};
use crate::ui;

pub fn run(ctx: &AppContext, args: DiffArgs) -> Result<()> {
    let settings = Settings::load()?;
    let declared_path = config::resolve_path(
        args.declared,
        settings.iam.declared.as_deref(),
        "--declared",
        "iam.declared",
    )?;
    let live_path = config::resolve_path(
        args.live,
        settings.iam.live.as_deref(),
        "--live",
        "iam.live",
    )?;

    let declared = IamSnapshot::load(&declared_path)?.into_configs();
    let live = IamSnapshot::load(&live_path)?.into_configs();

    let changes: Vec<ChangeSet<'_, IamConfig>> = compare::compare_all(&declared, &live)
        .into_iter()
        .filter(|c| c.has_differences())
        .filter(|c| args.filter.as_deref().is_none_or(|f| c.name().contains(f)))
        .collect();

    if !ctx.quiet {
        ui::header("IAM Diff");
        if ctx.verbose > 0 {
            ui::kv("declared", &declared_path.display().to_string());
            ui::kv("live", &live_path.display().to_string());
        }
    }

    let summary = print_changes(&changes)?;

    if args.exit_code && summary.has_changes() {
        std::process::exit(1);
    }
    Ok(())
}

const DISPLAY_ORDER: [ChangeKind; 4] = [
    ChangeKind::Add,
    ChangeKind::Change,
    ChangeKind::RemovePolicy,
    ChangeKind::Remove,
];

/// Print rendered change sets, grouped by kind, followed by a summary line
pub fn print_changes(changes: &[ChangeSet<'_, IamConfig>]) -> Result<ChangeSummary> {
    let summary = ChangeSummary::from_changes(changes);

    if !summary.has_changes() {
        println!();
        ui::success("No changes - live state matches declared state");
        return Ok(summary);
    }

    let groups = group_by_kind(changes);
    for kind in DISPLAY_ORDER {
        let Some(group) = groups.get(&kind) else {
            continue;
        };
        println!();
        for change in group {
            let text = change
                .render()
                .with_context(|| format!("Could not render changes for {}", change.name()))?;
            println!("{} {}", ui::kind_symbol(change.kind()), text);
        }
    }

    println!();
    println!(
        "Summary: {} ({} to add, {} unmanaged, {} to change, {} with policies to remove)",
        ui::plural(summary.total(), "difference", "differences").bold(),
        summary.additions.to_string().green(),
        summary.removals.to_string().red(),
        summary.changes.to_string().yellow(),
        summary.policy_removals.to_string().yellow()
    );
    Ok(summary)
}
