//! `erp install` - install one addon or the whole discovered set.

use colored::Colorize;

use crate::context::PlatformContext;
use crate::error::Result;

pub fn run_install(ctx: &mut PlatformContext, name: &str) -> Result<()> {
    ctx.manager.install(name)?;
    ctx.record_installed(name);
    ctx.save()?;

    println!("{} Addon '{}' installed", "=>".blue().bold(), name.cyan());
    Ok(())
}

pub fn run_install_all(ctx: &mut PlatformContext) -> Result<()> {
    let report = ctx.manager.install_all()?;
    for name in &report.installed {
        ctx.record_installed(name);
    }
    ctx.save()?;

    if report.installed.is_empty() && report.is_clean() {
        println!("Nothing to install.");
        return Ok(());
    }
    for name in &report.installed {
        println!("{} Addon '{}' installed", "=>".blue().bold(), name.cyan());
    }
    for failure in &report.failed {
        println!(
            "{} Addon '{}' failed: {}",
            "=>".red().bold(),
            failure.addon.cyan(),
            failure.reason
        );
    }
    for name in &report.skipped {
        println!(
            "{} Addon '{}' skipped: dependency unavailable",
            "=>".yellow().bold(),
            name.cyan()
        );
    }

    if !report.is_clean() {
        return Err(crate::error::CliError::user(format!(
            "{} of {} addons failed to install",
            report.failed.len() + report.skipped.len(),
            report.failed.len() + report.skipped.len() + report.installed.len()
        )));
    }
    Ok(())
}
