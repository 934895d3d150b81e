use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::describe::LogInteraction;
use crate::export::ExportFileType;
use crate::feed::source_for;
use crate::map::MapComposition;
use crate::pipeline::{Pipeline, Stage};
use crate::plan::{ExportProfileItem, Plan};

/// Loads a plan file, or the default plan when no path is given.
pub fn load_plan(plan: Option<&str>) -> Result<(Plan, PathBuf)> {
    match plan {
        Some(path) => {
            let plan_file_path = Path::new(path);
            let content = std::fs::read_to_string(plan_file_path)
                .with_context(|| format!("Failed to read plan {}", path))?;
            let plan: Plan = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse plan {}", path))?;
            let base_dir = plan_file_path
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| anyhow!("Plan file has no parent directory"))?;
            Ok((plan, base_dir))
        }
        None => {
            info!("No plan given, using defaults");
            Ok((Plan::default(), PathBuf::from(".")))
        }
    }
}

/// Builds the pipeline described by a plan. Relative feed paths resolve
/// against `base_dir`.
pub fn build_pipeline(plan: &Plan, base_dir: &Path) -> Result<Pipeline> {
    let feeds = plan.get_feed_settings();
    let earthquakes = source_for(&feeds.earthquakes, base_dir, feeds.timeout)?;
    let boundaries = source_for(&feeds.boundaries, base_dir, feeds.timeout)?;

    Ok(Pipeline::new(earthquakes, boundaries, Arc::new(LogInteraction))
        .with_record_policy(feeds.record_policy)
        .with_boundary_style(plan.get_boundary_style())
        .with_settings(plan.get_map_settings()))
}

/// Writes one export. Relative filenames resolve against `base_dir`.
fn export_map(
    composition: &MapComposition,
    profile: &ExportProfileItem,
    title: Option<&str>,
    base_dir: &Path,
) -> Result<()> {
    let target = base_dir.join(&profile.filename);
    let target = target
        .to_str()
        .ok_or_else(|| anyhow!("Output path contains invalid UTF-8: {}", target.display()))?;
    info!(
        "Starting export to file: {} using exporter {:?}",
        target, profile.exporter
    );

    let output = crate::export::render(profile.exporter, composition, title)?;
    crate::common::write_string_to_file(target, &output)?;
    Ok(())
}

/// Runs the pipeline once and writes every export profile. `output`
/// replaces the plan's profiles with a single export relative to the working
/// directory, JSON when the name ends in `.json`.
pub async fn execute_plan(plan: Option<String>, output: Option<String>) -> Result<()> {
    let (plan, base_dir) = load_plan(plan.as_deref())?;
    debug!("Executing plan: {:?}", plan);

    let (profiles, export_dir) = match output {
        Some(filename) => {
            let exporter = if filename.to_lowercase().ends_with(".json") {
                ExportFileType::JSON
            } else {
                ExportFileType::HTML
            };
            (vec![ExportProfileItem { filename, exporter }], PathBuf::new())
        }
        None => (plan.get_export_profiles(), base_dir.clone()),
    };

    let pipeline = build_pipeline(&plan, &base_dir)?;
    let composition = match pipeline.run().await {
        Ok(composition) => composition,
        Err(err) => {
            if err.is_transport_error() {
                warn!("A feed could not be read; check its location and the network");
            } else if err.is_data_error() {
                warn!("A feed was read but its content is unusable");
            }
            if let Some(earthquakes) = &err.earthquakes {
                warn!(
                    "Earthquake overlay with {} markers was built but the map was not rendered",
                    earthquakes.len()
                );
            }
            return Err(err.into());
        }
    };

    let mut failures = 0;
    for profile in &profiles {
        if let Err(e) = export_map(&composition, profile, plan.get_name(), &export_dir) {
            error!("Failed to export file {}: {}", profile.filename, e);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} exports failed", failures, profiles.len());
    }
    info!("Stage: {}", Stage::Rendered);
    info!("Map rendered to {} file(s)", profiles.len());
    Ok(())
}
