//! Readme command implementation - refresh the chart listing in a Markdown document

use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crowdplot_core::Day;
use crowdplot_render::write_atomic;

pub const CHARTS_START: &str = "<!-- CHARTS:START -->";
pub const CHARTS_END: &str = "<!-- CHARTS:END -->";

const README_TEMPLATE: &str = "# Crowd charts

Daily crowd levels per location, rendered from timestamped snapshots.

## Data available

- `data/*.csv`: crowd snapshots named `YYYYMMDD-HHMMSS.csv` with columns `id`, `postal`, `crowd`.
- `atms.json`: location names, postal codes and regions.
- `charts/*.svg`: one chart per day, regenerated with `crowdplot update`.

## Daily charts

<!-- CHARTS:START -->
<!-- CHARTS:END -->
";

/// Rewrite the chart block of the configured README.
///
/// Returns `true` when the file was written.
pub fn execute(config: &Config) -> Result<bool> {
    let readme_path = &config.paths.readme;
    let days = list_chart_days(&config.paths.charts_dir)?;
    let counts = count_snapshots_by_day(&config.paths.data_dir, &config.paths.snapshot_extension)?;
    log::debug!("{} chart(s), snapshots on {} day(s)", days.len(), counts.len());

    let existing = read_readme(readme_path)?;
    let base = existing.clone().unwrap_or_else(|| format!("{}\n", README_TEMPLATE));
    let link_dir = chart_link_dir(readme_path, &config.paths.charts_dir);
    let content = build_charts_content(&days, &counts, &link_dir);
    let updated = replace_charts_block(&base, &content);

    if existing.as_deref() == Some(updated.as_str()) {
        log::info!("No README changes ({})", readme_path.display());
        return Ok(false);
    }

    write_atomic(readme_path, updated.as_bytes())
        .map_err(|e| CliError::io(format!("Failed to write {}: {:#}", readme_path.display(), e)))?;
    log::info!("Updated charts block in {}", readme_path.display());
    Ok(true)
}

fn read_readme(path: &Path) -> CliResult<Option<String>> {
    if !path.exists() {
        log::info!("Creating {} from template", path.display());
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| CliError::io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Days with a chart in `charts_dir`, newest first.
pub fn list_chart_days(charts_dir: &Path) -> CliResult<Vec<Day>> {
    if !charts_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut days = Vec::new();
    for entry in std::fs::read_dir(charts_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("svg") {
            continue;
        }
        if let Some(day) = path.file_stem().and_then(|s| s.to_str()).and_then(Day::parse) {
            days.push(day);
        }
    }
    days.sort_unstable_by(|a, b| b.cmp(a));
    Ok(days)
}

/// Snapshot files per day, keyed on names of the form `YYYYMMDD-HHMMSS.<ext>`.
pub fn count_snapshots_by_day(data_dir: &Path, extension: &str) -> CliResult<BTreeMap<Day, usize>> {
    let mut counts = BTreeMap::new();
    if !data_dir.is_dir() {
        return Ok(counts);
    }
    let pattern = Regex::new(&format!(r"^(\d{{8}})-\d{{6}}\.{}$", regex::escape(extension)))
        .map_err(|e| CliError::config(format!("Invalid snapshot extension '{}': {}", extension, e)))?;

    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(captures) = name.to_str().and_then(|n| pattern.captures(n)) else {
            continue;
        };
        if let Some(day) = Day::parse(&captures[1]) {
            *counts.entry(day).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Chart directory as written in image links, relative to the README when possible.
fn chart_link_dir(readme: &Path, charts_dir: &Path) -> String {
    let base = readme.parent().unwrap_or_else(|| Path::new(""));
    let relative = charts_dir.strip_prefix(base).unwrap_or(charts_dir);
    let mut link = String::new();
    for component in relative.components() {
        match component {
            Component::RootDir => link.push('/'),
            Component::CurDir => {}
            other => {
                if !link.is_empty() && !link.ends_with('/') {
                    link.push('/');
                }
                link.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    if link.is_empty() {
        ".".to_string()
    } else {
        link
    }
}

fn render_chart_section(day: &Day, counts: &BTreeMap<Day, usize>, link_dir: &str, latest: bool) -> Vec<String> {
    let label = day.iso();
    let suffix = if latest { " (latest)" } else { "" };
    vec![
        format!("### {}{}", label, suffix),
        format!("- Snapshots: {}", counts.get(day).copied().unwrap_or(0)),
        format!("![Crowd chart for {}]({}/{}.svg)", label, link_dir, day.key()),
        String::new(),
    ]
}

/// Markdown placed between the chart markers. `days` must be newest first.
pub fn build_charts_content(days: &[Day], counts: &BTreeMap<Day, usize>, link_dir: &str) -> String {
    let Some((latest, older)) = days.split_first() else {
        return "No charts generated yet.".to_string();
    };

    let mut lines = render_chart_section(latest, counts, link_dir, true);
    if !older.is_empty() {
        lines.push("<details>".to_string());
        lines.push("<summary>Older days</summary>".to_string());
        lines.push(String::new());
        for day in older {
            lines.extend(render_chart_section(day, counts, link_dir, false));
        }
        lines.push("</details>".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Swap the first marker block for `content`, appending a section when no markers exist.
pub fn replace_charts_block(readme: &str, content: &str) -> String {
    let replacement = format!("{}\n{}\n{}", CHARTS_START, content, CHARTS_END);
    let open = format!("{}\n", CHARTS_START);
    if let Some(start) = readme.find(&open) {
        let body = start + open.len();
        if let Some(offset) = readme[body..].find(CHARTS_END) {
            let end = body + offset + CHARTS_END.len();
            return format!("{}{}{}", &readme[..start], replacement, &readme[end..]);
        }
    }
    format!("{}\n\n## Daily charts\n\n{}\n", readme.trim_end(), replacement)
}
