/*!
# Day Chart Export

Turns one day's series into a finished SVG file. The document is built and
serialized in memory, then written to a temporary file next to the target
and renamed into place, so a failed run never leaves a truncated chart.
*/

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crowdplot_core::{Day, DayLayout, DaySeries, MetadataIndex};

use crate::config::ChartConfig;
use crate::frame::compose_day;
use crate::scene::Document;
use crate::svg::to_svg;

/// Exports day charts with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct VectorExporter {
    config: ChartConfig,
}

impl VectorExporter {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Plan and compose the document for `day`.
    pub fn build_document(&self, day: &Day, series: &DaySeries, metadata: &MetadataIndex) -> Document {
        let layout = DayLayout::plan(series, metadata);
        compose_day(&self.config, day, series, &layout)
    }

    /// Render `day` to SVG text.
    pub fn render_svg(&self, day: &Day, series: &DaySeries, metadata: &MetadataIndex) -> String {
        to_svg(&self.build_document(day, series, metadata))
    }

    /// Render `day` and write it to `<out_dir>/<YYYYMMDD>.svg`.
    pub fn export_day<P: AsRef<Path>>(
        &self,
        out_dir: P,
        day: &Day,
        series: &DaySeries,
        metadata: &MetadataIndex,
    ) -> Result<PathBuf> {
        let path = out_dir.as_ref().join(format!("{}.svg", day.key()));
        let svg = self.render_svg(day, series, metadata);
        write_atomic(&path, svg.as_bytes())
            .with_context(|| format!("Failed to write chart {}", path.display()))?;
        log::debug!("Wrote {} ({} bytes)", path.display(), svg.len());
        Ok(path)
    }
}

/// Write `bytes` to `path` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move output into place: {}", path.display()))?;
    Ok(())
}
