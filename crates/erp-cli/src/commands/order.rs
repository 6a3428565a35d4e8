//! `erp order` - the resolved dependency order.

use colored::Colorize;

use crate::context::PlatformContext;
use crate::error::Result;

pub fn run_order(ctx: &PlatformContext) -> Result<()> {
    let order = ctx.manager.resolved_order()?;

    if order.is_empty() {
        println!("No addons discovered.");
        return Ok(());
    }

    for (i, name) in order.iter().enumerate() {
        println!("{:>3}. {}", i + 1, name.cyan());
    }
    Ok(())
}
