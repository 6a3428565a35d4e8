//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ERP Platform - Manage addons, models, and access rules
#[derive(Parser, Debug)]
#[command(name = "erp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing addon packages
    #[arg(long, global = true, default_value = "./addons")]
    pub addons_path: PathBuf,

    /// Install state file (defaults to <addons-path>/installed.toml)
    #[arg(long, global = true)]
    pub state_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List discovered addons with their lifecycle state
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved dependency order
    Order,

    /// Install an addon, or every discovered addon
    ///
    /// Installing a single addon requires its dependencies to already be
    /// installed; `--all` installs the whole discovered set in resolved
    /// dependency order.
    ///
    /// Examples:
    ///   erp install base          # Install one addon
    ///   erp install --all         # Install everything in order
    Install {
        /// Name of the addon to install
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        name: Option<String>,

        /// Install every discovered addon in resolved order
        #[arg(long)]
        all: bool,
    },

    /// Uninstall an addon, retracting its models and access rules
    Uninstall {
        /// Name of the addon to uninstall
        name: String,
    },

    /// Re-apply an installed addon's contribution
    Upgrade {
        /// Name of the addon to upgrade
        name: String,
    },

    /// Show the assembled definition of a model
    Show {
        /// Model name (e.g., "sale.order")
        model: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Evaluate an access check
    ///
    /// Prints the decision and exits 0 on allow, 1 on deny.
    Check {
        /// Role to check
        role: String,

        /// Model name
        model: String,

        /// Operation: create, read, update, or delete
        operation: String,

        /// Restrict the check to one field
        #[arg(long)]
        field: Option<String>,
    },
}
