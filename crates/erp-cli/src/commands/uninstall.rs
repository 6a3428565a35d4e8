//! `erp uninstall` - retract an addon's contribution.

use colored::Colorize;

use crate::context::PlatformContext;
use crate::error::Result;

pub fn run_uninstall(ctx: &mut PlatformContext, name: &str) -> Result<()> {
    ctx.manager.uninstall(name)?;
    ctx.record_uninstalled(name);
    ctx.save()?;

    println!("{} Addon '{}' uninstalled", "=>".blue().bold(), name.cyan());
    Ok(())
}
