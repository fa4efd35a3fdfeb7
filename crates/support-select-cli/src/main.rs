//! support-select CLI entry point.

mod args;
mod config;
mod sim;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use support_select_core::{PreferenceSet, SupportSelector};
use tracing::{error, info};

use crate::args::{CheckConfigArgs, Cli, Commands, SelectArgs};
use crate::config::{load_config, load_scene, ConfigSource};
use crate::sim::SimDevice;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // Logs go to stderr so the JSON report on stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Select(args) => run_select(args),
        Commands::CheckConfig(args) => run_check_config(args),
        Commands::Examples => {
            println!("{}", crate::args::EXAMPLES_TEXT);
            Ok(())
        }
    }
}

fn run_select(args: SelectArgs) -> anyhow::Result<()> {
    let (mut config, source) = load_config(args.config.as_deref())?;
    if let Some(swipes) = args.swipes {
        config.swipes_per_refresh = swipes;
    }
    if let Some(refreshes) = args.refreshes {
        config.max_refreshes = refreshes;
    }
    let mode = args.mode.unwrap_or(config.mode);
    info!(?source, %mode, "Starting support selection");

    let scene = load_scene(&args.scene)?;
    let prefs = config.preferences();
    let mut device = SimDevice::new(scene, config.layout.clone());

    let success = SupportSelector::new(&mut device, &prefs, &config.layout)
        .with_deadlines(config.deadlines())
        .select_support(mode)
        .with_context(|| format!("support selection in {} mode failed", mode))?;

    if let Some(entry) = device.selected() {
        info!(?entry, "Selection committed");
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&device.report(mode, success))?
    );
    Ok(())
}

#[derive(Serialize)]
struct ConfigCheck<'a> {
    source: String,
    mode: String,
    preferences: &'a PreferenceSet,
}

fn run_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let (config, source) = load_config(args.config.as_deref())?;
    let prefs = config.preferences();
    let source = match source {
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Defaults => "defaults".to_string(),
    };

    let check = ConfigCheck {
        source,
        mode: config.mode.to_string(),
        preferences: &prefs,
    };
    println!("{}", serde_json::to_string_pretty(&check)?);
    Ok(())
}
