//! ERP Platform CLI
//!
//! The command-line interface for managing addons on the ERP platform.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::PlatformContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} ERP Platform CLI", "erp".green().bold());
        println!();
        println!("Run {} for available commands.", "erp --help".cyan());
        return Ok(());
    };

    let mut ctx = PlatformContext::load(&cli.addons_path, cli.state_path)?;
    match command {
        Commands::List { json } => commands::run_list(&ctx, json),
        Commands::Order => commands::run_order(&ctx),
        Commands::Install { name, all } => {
            if all {
                commands::run_install_all(&mut ctx)
            } else {
                // clap guarantees `name` when `--all` is absent
                let name = name.unwrap_or_default();
                commands::run_install(&mut ctx, &name)
            }
        }
        Commands::Uninstall { name } => commands::run_uninstall(&mut ctx, &name),
        Commands::Upgrade { name } => commands::run_upgrade(&mut ctx, &name),
        Commands::Show { model, json } => commands::run_show(&ctx, &model, json),
        Commands::Check {
            role,
            model,
            operation,
            field,
        } => commands::run_check(&ctx, &role, &model, &operation, field.as_deref()),
    }
}
