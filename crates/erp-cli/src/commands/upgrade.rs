//! `erp upgrade` - re-apply an installed addon's contribution.

use colored::Colorize;

use crate::context::PlatformContext;
use crate::error::Result;

pub fn run_upgrade(ctx: &mut PlatformContext, name: &str) -> Result<()> {
    ctx.manager.upgrade(name)?;
    ctx.record_installed(name);
    ctx.save()?;

    println!("{} Addon '{}' upgraded", "=>".blue().bold(), name.cyan());
    Ok(())
}
