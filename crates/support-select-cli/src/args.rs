//! CLI argument parsing with clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use support_select_core::SelectionMode;

const CONFIG_HELP: &str =
    "Config file [default: $SUPPORT_SELECT_CONFIG or ~/.config/support-select/config.json]";

/// Support list selection against a scripted scene.
///
/// Runs the support selector over a simulated support screen and prints a
/// JSON report of what was picked and how many scrolls, refreshes and clicks
/// it took.
#[derive(Debug, Parser)]
#[command(name = "support-select", version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a selection over a scene file
    #[command(after_help = "\
Examples:
  support-select select --scene scene.json                   # Mode from config
  support-select select --scene scene.json --mode friend     # Search friends
  support-select select --scene scene.json --mode preferred --swipes 2 --refreshes 1")]
    Select(SelectArgs),

    /// Load the config and print the parsed preferences
    CheckConfig(CheckConfigArgs),

    /// Show a sample config and scene
    Examples,
}

#[derive(Debug, clap::Args)]
pub struct SelectArgs {
    /// Scene file describing the support list pages
    #[arg(long, value_name = "FILE")]
    pub scene: PathBuf,

    /// Selection mode (first, friend, preferred, manual) [default: from config]
    #[arg(short, long)]
    pub mode: Option<SelectionMode>,

    #[arg(short, long, value_name = "FILE", help = CONFIG_HELP)]
    pub config: Option<PathBuf>,

    /// Override swipes per refresh
    #[arg(long)]
    pub swipes: Option<u32>,

    /// Override the refresh limit
    #[arg(long)]
    pub refreshes: Option<u32>,
}

#[derive(Debug, clap::Args)]
pub struct CheckConfigArgs {
    #[arg(short, long, value_name = "FILE", help = CONFIG_HELP)]
    pub config: Option<PathBuf>,
}

/// Sample files for the `examples` command.
pub const EXAMPLES_TEXT: &str = r#"End-to-end example: pick a limit broken Kaleidoscope Merlin

# 1. Write a config (every field is optional)
cat > config.json <<'EOF'
{
  "mode": "preferred",
  "preferred_servants": "Merlin, Skadi",
  "preferred_craft_essences": "*Kaleidoscope",
  "friends_only": false,
  "swipes_per_refresh": 2,
  "max_refreshes": 1,
  "fallback_to": "first"
}
EOF

# 2. Describe what the support list shows, one array per refresh
cat > scene.json <<'EOF'
{
  "pages": [
    [
      {"servant": "Skadi", "craft_essence": "Kaleidoscope"},
      {"servant": "Merlin", "craft_essence": "Kaleidoscope"}
    ],
    [
      {"servant": "Merlin", "craft_essence": "Kaleidoscope", "limit_broken": true,
       "friend": true, "friend_name": "Alice"}
    ]
  ]
}
EOF

# 3. Run the selector
support-select select --scene scene.json --config config.json

# The report shows the Merlin from the second page, found after one refresh.
"#;
