//! Variables file writer
//!
//! One `name="value"` line per setting, sorted by name. String values are
//! quoted, other types are written bare, and a value opening with `[` becomes a quoted list.

use crate::settings::Setting;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

/// Settings that describe the run rather than the deployment
pub const EXCLUDED: [&str; 2] = ["project_name", "stack_name"];

/// Variable name for a setting: lowercase, spaces become underscores
pub fn variable_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

fn render_value(setting: &Setting) -> String {
    let value = setting.value.as_str();
    if let Some(rest) = value.strip_prefix('[') {
        let inner = rest.strip_suffix(']').unwrap_or(rest);
        let items: Vec<String> = inner
            .split(',')
            .map(|item| format!("\"{}\"", item.trim().trim_matches('"')))
            .collect();
        return format!("[{}]", items.join(",")).replace("[\"\"]", "[]");
    }
    if setting.kind.is_quoted() {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Render the variables file contents
pub fn render(settings: &[Setting]) -> String {
    let mut sorted: Vec<&Setting> = settings
        .iter()
        .filter(|s| !s.value.is_empty() && !EXCLUDED.contains(&variable_name(&s.name).as_str()))
        .collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    sorted
        .into_iter()
        .map(|s| format!("{}={}\n", variable_name(&s.name), render_value(s)))
        .collect()
}

/// Write the variables file
pub fn write(path: &Path, settings: &[Setting]) -> anyhow::Result<()> {
    let contents = render(settings);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write variables file {}", path.display()))?;
    info!(path = %path.display(), "Wrote variables file");
    Ok(())
}
