//! `erp check` - evaluate an access check.

use colored::Colorize;
use erp_security::Operation;

use crate::context::PlatformContext;
use crate::error::{CliError, Result};

pub fn run_check(
    ctx: &PlatformContext,
    role: &str,
    model: &str,
    operation: &str,
    field: Option<&str>,
) -> Result<()> {
    let operation: Operation = operation
        .parse()
        .map_err(|e: erp_security::rule::ParseOperationError| CliError::user(e.to_string()))?;

    let decision = ctx.manager.security().check(role, model, operation, field);

    let target = match field {
        Some(field) => format!("{model}.{field}"),
        None => model.to_string(),
    };
    if decision.is_allowed() {
        println!("{} {} may {} {}", "allow".green().bold(), role, operation, target);
        Ok(())
    } else {
        println!("{} {} may not {} {}", "deny".red().bold(), role, operation, target);
        // Denial is an ordinary outcome, reported through the exit code
        // rather than an error message.
        std::process::exit(1);
    }
}
