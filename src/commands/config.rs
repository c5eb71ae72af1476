use anyhow::Result;

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::{self, ENV_CONFIG_DIR, Settings};
use crate::ui;

pub fn run(_ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(),
        ConfigCommand::Path => path(),
    }
}

fn show() -> Result<()> {
    ui::header("Settings");

    let path = config::settings_path()?;
    println!();
    ui::kv("Settings file", &path.display().to_string());
    if !path.exists() {
        ui::dim("Not found, using defaults");
    }
    println!();

    let settings = Settings::load_from(&path)?;
    let rendered = settings.to_toml()?;
    if rendered.trim().is_empty() {
        ui::info("No paths configured");
    } else {
        println!("{rendered}");
    }

    ui::dim(&format!("Set {ENV_CONFIG_DIR} to use another config directory."));
    Ok(())
}

fn path() -> Result<()> {
    println!("{}", config::settings_path()?.display());
    Ok(())
}
