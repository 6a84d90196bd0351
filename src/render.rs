//! Rendering: turn a resolved catalog into the generated output module.
//!
//! The renderer substitutes serialized catalog values into a small
//! placeholder template (`{{key}}`), then writes the artifact atomically:
//! the content lands in a temp file next to the destination and is persisted
//! over it. A failed run leaves any previous artifact untouched.

use crate::catalog::{Catalog, DependencyRecord};
use crate::config::Serializer;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Built-in template used when the configuration names none.
pub const DEFAULT_TEMPLATE: &str = "\
/* Generated by vendorcat. Do not edit by hand. */
var {{ident}} = {
    \"name\": {{name}},
    \"js\": {{js}},
    \"css\": {{css}},
    \"unknown\": {{unknown}}
};
";

/// Read the configured template, or fall back to the embedded default.
pub fn load_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading template {}", path.display())),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// Substitute the catalog into the template.
///
/// Recognized placeholders: `{{ident}}` (catalog name as an identifier),
/// `{{name}}` (catalog name as a serialized string), `{{js}}`, `{{css}}`,
/// `{{unknown}}` (serialized record arrays). Unrecognized placeholders pass
/// through untouched; they belong to the template author.
pub fn render(
    name: &str,
    catalog: &Catalog,
    serializer: Serializer,
    template: &str,
) -> Result<String> {
    let substitutions = [
        ("{{ident}}", identifier(name)),
        ("{{name}}", serialize_value(&name, serializer)?),
        ("{{js}}", serialize_records(&catalog.js, serializer)?),
        ("{{css}}", serialize_records(&catalog.css, serializer)?),
        ("{{unknown}}", serialize_records(&catalog.unknown, serializer)?),
    ];

    let mut output = template.to_string();
    for (key, value) in substitutions {
        output = output.replace(key, &value);
    }
    Ok(output)
}

/// Write the rendered module, creating parent directories as needed.
pub fn write_artifact(dest: &Path, contents: &str) -> Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&parent)
        .with_context(|| format!("creating output directory {}", parent.display()))?;

    let mut file = NamedTempFile::new_in(&parent)
        .with_context(|| format!("creating temp file in {}", parent.display()))?;
    file.write_all(contents.as_bytes())
        .context("writing rendered module")?;
    file.persist(dest)
        .with_context(|| format!("persisting artifact {}", dest.display()))?;
    Ok(())
}

/// The catalog name as a usable identifier: every run of non-alphanumeric
/// characters becomes an underscore, with a leading underscore when the
/// name starts with a digit.
pub fn identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if ident.is_empty() {
        ident.push('_');
    }
    ident
}

fn serialize_records(records: &[DependencyRecord], serializer: Serializer) -> Result<String> {
    serialize_value(&records, serializer)
}

fn serialize_value<T: serde::Serialize>(value: &T, serializer: Serializer) -> Result<String> {
    let rendered = match serializer {
        Serializer::Json => serde_json::to_string(value),
        Serializer::JsonPretty => serde_json::to_string_pretty(value),
    };
    rendered.context("serializing catalog value")
}
