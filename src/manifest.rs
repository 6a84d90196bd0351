//! Manifest ingestion: the document declaring the project's dependencies.
//!
//! The manifest is a JSON document with a root `name` (the catalog's
//! identity) and a `dependencies` object of name → version-range pairs.
//! Shape is enforced with an embedded JSON Schema before parsing so a
//! malformed document fails the run up front with the offending paths,
//! instead of surfacing later as a half-classified catalog. Declaration
//! order of the `dependencies` object is preserved; it becomes discovery
//! and emission order downstream.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

/// One declared dependency. Immutable input; names are unique because they
/// are keys of the manifest's `dependencies` object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub range: String,
}

/// The parsed manifest document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub entries: Vec<ManifestEntry>,
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    let document: Value = serde_json::from_str(&data)
        .with_context(|| format!("parsing manifest {}", path.display()))?;
    parse_manifest(&document).with_context(|| format!("in manifest {}", path.display()))
}

pub fn parse_manifest(document: &Value) -> Result<Manifest> {
    validate_shape(document)?;

    let name = document
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("manifest is missing a name"))?;

    let mut entries = Vec::new();
    if let Some(dependencies) = document.get("dependencies").and_then(Value::as_object) {
        for (dep_name, range) in dependencies {
            let range = range
                .as_str()
                .ok_or_else(|| anyhow!("dependency '{dep_name}' has a non-string range"))?;
            entries.push(ManifestEntry {
                name: dep_name.clone(),
                range: range.to_string(),
            });
        }
    }

    Ok(Manifest { name, entries })
}

fn validate_shape(document: &Value) -> Result<()> {
    let schema = manifest_schema();
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling manifest schema: {err}"))?;
    if let Err(errors) = compiled.validate(document) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("manifest failed validation:\n{details}");
    }
    Ok(())
}

fn manifest_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "dependencies": {
                "type": "object",
                "additionalProperties": {"type": "string"}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_keep_declaration_order() {
        let manifest = parse_manifest(&json!({
            "name": "sample-app",
            "dependencies": {
                "zeta": "1.0.0",
                "alpha": "2.0.0",
                "mid": "*"
            }
        }))
        .unwrap();

        let names: Vec<_> = manifest.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(manifest.name, "sample-app");
    }

    #[test]
    fn empty_dependencies_are_allowed() {
        let manifest = parse_manifest(&json!({"name": "bare"})).unwrap();
        assert!(manifest.entries.is_empty());
    }

    #[test]
    fn missing_name_fails_validation() {
        let err = parse_manifest(&json!({"dependencies": {}})).unwrap_err();
        assert!(format!("{err:#}").contains("failed validation"));
    }

    #[test]
    fn non_string_range_fails_validation() {
        let err = parse_manifest(&json!({
            "name": "bad",
            "dependencies": {"foo": 1}
        }))
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed validation"));
    }

    #[test]
    fn non_object_document_fails_validation() {
        assert!(parse_manifest(&json!(["not", "a", "manifest"])).is_err());
    }
}
