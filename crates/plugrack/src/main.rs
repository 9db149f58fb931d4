// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! plugrack - inspect the plugin modules a host would discover.
//!
//! This is the binary entry point. Configuration is loaded and validated
//! before anything else; discovery runs lazily on the first command that
//! needs the registry.

mod inspect;
mod load;

use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use plugrack_core::PluginCategory;
use plugrack_plugin::PluginFactory;

/// plugrack - discover, describe and instantiate plugin modules.
#[derive(Parser, Debug)]
#[command(name = "plugrack", version, about, long_about = None)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the plugin search directories in scan order.
    Paths,
    /// List discovered plugins.
    List {
        /// Only list plugins of this category (e.g. Effect, Instrument).
        #[arg(long, value_parser = parse_category)]
        category: Option<PluginCategory>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show which plugin handles files with an extension.
    Which {
        /// File extension without the leading dot.
        extension: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the sub-plugin keys a plugin family offers.
    Keys {
        /// Plugin name.
        name: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show modules that failed to load during discovery.
    Errors {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Instantiate a plugin once and report the result.
    Load {
        /// Plugin name.
        name: String,
        /// Persisted key (JSON) selecting a sub-plugin.
        #[arg(long)]
        key: Option<String>,
        /// Reject the instance unless it has this category.
        #[arg(long, value_parser = parse_category)]
        expect: Option<PluginCategory>,
    },
}

fn parse_category(value: &str) -> Result<PluginCategory, String> {
    PluginCategory::from_str(value).map_err(|_| format!("unknown plugin category: {value}"))
}

fn main() {
    let cli = Cli::parse();

    let config = match plugrack_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            plugrack_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let factory = Arc::new(PluginFactory::from_config(&config.plugins));

    let result = match cli.command {
        Commands::Paths => {
            inspect::print_paths(&factory);
            Ok(())
        }
        Commands::List { category, json } => inspect::run_list(&factory, category, json, cli.plain),
        Commands::Which { extension, json } => inspect::run_which(&factory, &extension, json),
        Commands::Keys { name, json } => inspect::run_keys(&factory, &name, json),
        Commands::Errors { json } => inspect::run_errors(&factory, json, cli.plain),
        Commands::Load { name, key, expect } => {
            load::run_load(factory, &name, key.as_deref(), expect, cli.plain)
        }
    };

    if let Err(e) = result {
        if cli.plain {
            eprintln!("error: {e}");
        } else {
            use colored::Colorize;
            eprintln!("{}: {e}", "error".red());
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "plugrack={log_level},plugrack_plugin={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
