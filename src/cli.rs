use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use crate::config::Config;
use crate::error::Result;

/// Coles shopping lists exporter - fetch your lists with current prices
#[derive(Parser)]
#[command(name = "coles-lists")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Session cookie header sent with page and list requests
    #[arg(long, env = "COLES_LISTS_COOKIE", global = true, hide_env_values = true)]
    pub cookie: Option<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, env = "COLES_LISTS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch lists and prices, render them and open the result
    Export {
        /// Shopping list page: saved HTML file, URL, or "-" for stdin
        #[arg(short, long)]
        page: String,

        /// Write the document to this file instead of the output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not open the document in a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Fetch and print the lists for a page, without prices
    Lists {
        /// Shopping list page: saved HTML file, URL, or "-" for stdin
        #[arg(short, long)]
        page: String,
    },

    /// Look up the current price of one product
    Price {
        /// Product ID (e.g., "5551234")
        product_id: String,
    },

    /// Check whether the export control shows on a path
    Visible {
        /// Page path (e.g., "/lists/123/edit")
        path: String,
    },

    /// Follow navigation read from stdin and report control visibility
    ///
    /// Each line is "push <path>", "replace <path>", "back <path>", or a bare
    /// path for a change made outside history navigation.
    Watch {
        /// Path of the page at load time
        #[arg(long, default_value = "/")]
        initial_path: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "visibility.root_path")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Remove the configuration file
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Configuration file in effect for this invocation
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::config_path)
    }

    /// Load configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_from(&self.config_path())?;
        if let Some(ref cookie) = self.cookie {
            config.api.cookie = Some(cookie.clone());
        }
        Ok(config)
    }

    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Export {
                page,
                output,
                no_open,
            } => commands::export::run(self, page, output.as_deref(), *no_open).await,
            Commands::Lists { page } => commands::lists::run(self, page).await,
            Commands::Price { product_id } => commands::price::run(self, product_id).await,
            Commands::Visible { path } => commands::visible::run(self, path).await,
            Commands::Watch { initial_path } => commands::watch::run(self, initial_path).await,
            Commands::Config { command } => commands::config::run(self, command).await,
        }
    }
}
