//! Render command implementation - one SVG chart per day of snapshots

use anyhow::Result;
use rayon::prelude::*;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;
use crowdplot_core::{aggregate_day, Day, MetadataIndex, SnapshotCatalog, SnapshotError};
use crowdplot_render::VectorExporter;

/// Render charts for every discovered day, or only `date` when given.
///
/// Returns the paths written, in day order.
pub fn execute(config: &Config, date: Option<Day>) -> Result<Vec<PathBuf>> {
    let paths = &config.paths;
    log::info!("Starting chart rendering");
    log::debug!("Data directory: {}", paths.data_dir.display());
    log::debug!("Metadata file: {}", paths.metadata.display());
    log::debug!("Output directory: {}", paths.charts_dir.display());

    if !paths.metadata.is_file() {
        return Err(CliError::missing_input("metadata file", paths.metadata.clone()).into());
    }
    let metadata = MetadataIndex::load(&paths.metadata)
        .map_err(|e| CliError::metadata(paths.metadata.clone(), e.to_string()))?;
    log::info!("Loaded metadata for {} locations", metadata.len());

    let catalog = SnapshotCatalog::discover(&paths.data_dir, &paths.snapshot_extension)
        .map_err(|e| match e {
            SnapshotError::MissingDirectory(dir) => CliError::missing_input("data directory", dir),
            other => CliError::io(other.to_string()),
        })?;

    std::fs::create_dir_all(&paths.charts_dir).map_err(|e| {
        CliError::io(format!(
            "Failed to create output directory {}: {}",
            paths.charts_dir.display(),
            e
        ))
    })?;

    let days = catalog.select(date.as_ref());
    match date {
        Some(day) if days.is_empty() => log::warn!("No snapshots found for {}", day),
        None if days.is_empty() => log::warn!("No snapshots found in {}", paths.data_dir.display()),
        _ => {}
    }

    let exporter = VectorExporter::new(config.chart.clone());
    let written = days
        .par_iter()
        .map(|day| {
            let series = aggregate_day(&catalog, day, config.chart.max_value);
            log::debug!(
                "{}: {} samples across {} locations",
                day,
                series.sample_count(),
                series.locations().count()
            );
            exporter
                .export_day(&paths.charts_dir, day, &series, &metadata)
                .map_err(|e| CliError::rendering(format!("{}: {:#}", day, e)))
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    log::info!("Wrote {} chart(s) to {}/", written.len(), paths.charts_dir.display());
    Ok(written)
}
