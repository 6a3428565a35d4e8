//! `erp list` - discovered addons with their lifecycle state.

use colored::Colorize;
use erp_core::AddonState;

use crate::context::PlatformContext;
use crate::error::Result;

pub fn run_list(ctx: &PlatformContext, json: bool) -> Result<()> {
    let statuses = ctx.manager.statuses();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No addons discovered.");
        return Ok(());
    }

    for status in statuses {
        let state = match status.state {
            AddonState::Installed => status.state.to_string().green(),
            AddonState::Failed => status.state.to_string().red(),
            _ => status.state.to_string().dimmed(),
        };
        let description = status
            .description
            .map(|d| format!("  {}", d.dimmed()))
            .unwrap_or_default();
        println!(
            "{:<20} {:<10} {}{}",
            status.name.cyan(),
            status.version,
            state,
            description
        );
    }
    Ok(())
}
