//! `erp show` - the assembled definition of a model.

use colored::Colorize;

use crate::context::PlatformContext;
use crate::error::Result;

pub fn run_show(ctx: &PlatformContext, model: &str, json: bool) -> Result<()> {
    let definition = ctx
        .manager
        .registry()
        .get(model)
        .map_err(erp_core::Error::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&definition)?);
        return Ok(());
    }

    println!(
        "{} {} (contributed by {})",
        "model".dimmed(),
        definition.name.cyan().bold(),
        definition.owners.join(", ")
    );

    if !definition.fields.is_empty() {
        println!("{}", "fields:".dimmed());
        for (name, field) in &definition.fields {
            let mut attrs = vec![format!("{:?}", field.kind).to_lowercase()];
            if let Some(comodel) = &field.comodel {
                attrs.push(format!("-> {comodel}"));
            }
            if field.required {
                attrs.push("required".to_string());
            }
            if field.readonly {
                attrs.push("readonly".to_string());
            }
            println!("  {:<24} {}", name, attrs.join(", ").dimmed());
        }
    }

    if !definition.hooks.is_empty() {
        println!("{}", "hooks:".dimmed());
        for (name, hook) in &definition.hooks {
            println!(
                "  {:<24} {}",
                name,
                format!("{:?}", hook.kind).to_lowercase().dimmed()
            );
        }
    }
    Ok(())
}
