use anyhow::Result;
use std::path::Path;
use tracing::{error, info};

use crate::plan::Plan;

pub fn plan_template() -> Result<String> {
    Ok(serde_yaml::to_string(&Plan::template())?)
}

pub fn generate_template(name: String) {
    info!("Generating template: {}", name);
    match name.as_str() {
        "html" => {
            println!("{}", crate::export::to_html::get_template());
        }
        "plan" => match plan_template() {
            Ok(template) => println!("{}", template),
            Err(e) => error!("Failed to render plan template: {}", e),
        },
        _ => {
            error!("Unsupported template: {} - use html, plan", name);
        }
    }
}

/// Writes the default plan. Refuses to overwrite an existing file.
pub fn init_plan(plan: &str) -> Result<()> {
    if Path::new(plan).exists() {
        anyhow::bail!("Plan file {} already exists", plan);
    }
    crate::common::write_string_to_file(plan, &plan_template()?)?;
    info!("Wrote default plan to {}", plan);
    Ok(())
}
