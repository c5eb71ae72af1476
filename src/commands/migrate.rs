//! Migrate command - turn live security group rules into declared config

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Context as AppContext;
use crate::cli::MigrateArgs;
use crate::config::{self, Settings};
use crate::model::security::{DeclaredGroupRules, SecurityGroupSnapshot};
use crate::ui;

pub fn run(ctx: &AppContext, args: MigrateArgs) -> Result<()> {
    let settings = Settings::load()?;
    let live_path = config::resolve_path(
        args.live,
        settings.security_groups.live.as_deref(),
        "--live",
        "security-groups.live",
    )?;
    let output_dir = if args.stdout {
        None
    } else {
        config::resolve_optional_path(args.output, settings.security_groups.output.as_deref())
    };

    let snapshot = SecurityGroupSnapshot::load(&live_path)?;
    if snapshot.groups.is_empty() {
        ui::warn(&format!("No security groups found in {}", live_path.display()));
        return Ok(());
    }

    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    for (name, rules) in &snapshot.groups {
        let declared = rules.migrate();
        log::info!(
            "{}: {} raw rules became {}",
            name,
            rules.rule_count(),
            declared.rule_count()
        );

        match &output_dir {
            Some(dir) => {
                let path = write_group(dir, name, &declared)?;
                if !ctx.quiet {
                    ui::success(&format!(
                        "{} ({}) -> {}",
                        name,
                        ui::plural(declared.rule_count(), "rule", "rules"),
                        path.display()
                    ));
                }
            }
            None => {
                let content = serde_json::to_string_pretty(&declared)
                    .with_context(|| format!("Failed to serialize rules for {name}"))?;
                if !ctx.quiet {
                    ui::header(name);
                }
                println!("{content}");
            }
        }
    }

    Ok(())
}

/// File name for a group's rules, with path separators replaced
///
/// Separators become `_`, so the file always lands directly in the output directory.
fn group_file_name(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        bail!("Security group has an empty name");
    }
    let stem = name.replace(['/', '\\'], "_");
    if stem != name {
        log::debug!("Writing security group {name} as {stem}.json");
    }
    Ok(format!("{stem}.json"))
}

/// Write one group's declared rules into `dir`
fn write_group(dir: &Path, name: &str, declared: &DeclaredGroupRules) -> Result<PathBuf> {
    let path = dir.join(group_file_name(name)?);
    let content = serde_json::to_string_pretty(declared)
        .with_context(|| format!("Failed to serialize rules for {name}"))?;
    fs::write(&path, content + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}
