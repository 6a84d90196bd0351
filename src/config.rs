//! Run configuration: defaults, optional config file, pre-seeded stubs.
//!
//! Options come from built-in defaults overlaid with an optional JSON config
//! file; the CLI applies its own flag overrides on top. Everything that can
//! make the run unusable (an unreadable file, an unknown serializer name, a
//! malformed seed) fails here, before any lookup runs or output is written.

use crate::catalog::{AssetType, DependencyRecord};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "vendorcat.json";
pub const DEFAULT_MANIFEST_PATH: &str = "manifest.json";
pub const DEFAULT_DEST: &str = "dist/vendor.js";
pub const DEFAULT_HOST_URL: &str = "http://localhost:9000";
pub const DEFAULT_JS_PATH: &str = "/scripts/vendor";
pub const DEFAULT_CSS_PATH: &str = "/styles/vendor";
const DEFAULT_REGISTRY_PROGRAM: &str = "bower";
const ENV_REGISTRY_CLI: &str = "VENDORCAT_REGISTRY_CLI";

/// Serialization strategy for rendered catalog values.
///
/// A closed set: unrecognized names are rejected while the configuration is
/// read, not when the value is first serialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Serializer {
    #[default]
    Json,
    JsonPretty,
}

impl Serializer {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Serializer::Json),
            "json-pretty" => Some(Serializer::JsonPretty),
            _ => None,
        }
    }
}

/// Registry command selection: program plus leading arguments; the client
/// appends `name#range --json` per lookup.
#[derive(Clone, Debug, Deserialize)]
pub struct RegistryCommand {
    #[serde(default = "default_registry_program")]
    pub program: String,
    #[serde(default = "default_registry_args")]
    pub args: Vec<String>,
}

impl Default for RegistryCommand {
    fn default() -> Self {
        Self {
            program: default_registry_program(),
            args: default_registry_args(),
        }
    }
}

fn default_registry_program() -> String {
    DEFAULT_REGISTRY_PROGRAM.to_string()
}

fn default_registry_args() -> Vec<String> {
    vec!["info".to_string()]
}

/// Environment override for the registry program, mirroring the config
/// field. Tests point this at mock scripts.
pub fn registry_program_override() -> Option<String> {
    match env::var(ENV_REGISTRY_CLI) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// A pre-seeded dependency stub from the config file. Only the name is
/// required; known fields short-circuit derivation during the run.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SeedEntry {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl SeedEntry {
    /// Build a fresh record for this stub. Each call produces an
    /// independent record so stubs never share mutable state.
    pub fn materialize(&self, asset_type: AssetType) -> DependencyRecord {
        DependencyRecord::seeded(
            &self.name,
            asset_type,
            self.version.clone(),
            self.src.clone(),
            self.filename.clone(),
        )
    }
}

/// Pre-seeded stubs per typed bucket. There is no unknown seed list: the
/// overflow bucket is populated by the engine, not by operators.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SeedBuckets {
    #[serde(default)]
    pub js: Vec<SeedEntry>,
    #[serde(default)]
    pub css: Vec<SeedEntry>,
}

impl SeedBuckets {
    pub fn bucket(&self, asset_type: AssetType) -> &[SeedEntry] {
        match asset_type {
            AssetType::Script => &self.js,
            AssetType::Style => &self.css,
            AssetType::Unknown => &[],
        }
    }
}

/// Resolved run options.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Catalog identity; falls back to the manifest's `name` when unset.
    pub name: Option<String>,
    pub dest: PathBuf,
    pub host_url: String,
    pub js_path: String,
    pub css_path: String,
    pub manifest: PathBuf,
    /// Optional template file; the embedded default is used when unset.
    pub template: Option<PathBuf>,
    pub serializer: Serializer,
    pub registry: RegistryCommand,
    pub deps: SeedBuckets,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: None,
            dest: PathBuf::from(DEFAULT_DEST),
            host_url: DEFAULT_HOST_URL.to_string(),
            js_path: DEFAULT_JS_PATH.to_string(),
            css_path: DEFAULT_CSS_PATH.to_string(),
            manifest: PathBuf::from(DEFAULT_MANIFEST_PATH),
            template: None,
            serializer: Serializer::default(),
            registry: RegistryCommand::default(),
            deps: SeedBuckets::default(),
        }
    }
}

impl Options {
    /// Load options from a config file overlaid on the defaults.
    ///
    /// An explicit path must exist; the default path is optional and its
    /// absence just yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !path.is_file() {
            if required {
                bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let options: Options = serde_json::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(options)
    }

    /// Path prefix for a typed bucket; `None` for the unknown bucket, whose
    /// records never get a derived source URL.
    pub fn path_prefix(&self, asset_type: AssetType) -> Option<&str> {
        match asset_type {
            AssetType::Script => Some(&self.js_path),
            AssetType::Style => Some(&self.css_path),
            AssetType::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_apply_without_config_file() {
        let options = Options::default();
        assert_eq!(options.host_url, DEFAULT_HOST_URL);
        assert_eq!(options.serializer, Serializer::Json);
        assert_eq!(options.registry.program, "bower");
        assert!(options.deps.js.is_empty());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "host_url": "https://cdn.example",
                "serializer": "json-pretty",
                "deps": {{"js": [{{"name": "jquery", "version": "2.1.4"}}], "css": []}}
            }}"#
        )
        .unwrap();

        let options = Options::load(Some(file.path())).unwrap();
        assert_eq!(options.host_url, "https://cdn.example");
        assert_eq!(options.serializer, Serializer::JsonPretty);
        assert_eq!(options.deps.js[0].name, "jquery");
        assert_eq!(options.js_path, DEFAULT_JS_PATH);
    }

    #[test]
    fn unknown_serializer_is_rejected_at_parse_time() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"serializer": "yaml"}}"#).unwrap();
        assert!(Options::load(Some(file.path())).is_err());
    }

    #[test]
    fn explicit_missing_config_is_fatal() {
        assert!(Options::load(Some(Path::new("/nonexistent/vendorcat.json"))).is_err());
    }

    #[test]
    fn serializer_names_form_a_closed_set() {
        assert_eq!(Serializer::from_name("json"), Some(Serializer::Json));
        assert_eq!(
            Serializer::from_name("json-pretty"),
            Some(Serializer::JsonPretty)
        );
        assert_eq!(Serializer::from_name("source"), None);
    }

    #[test]
    fn seed_materialization_marks_known_fields_resolved() {
        let seed = SeedEntry {
            name: "normalize-css".to_string(),
            version: Some("3.0.0".to_string()),
            src: None,
            filename: Some("normalize.css".to_string()),
        };
        let record = seed.materialize(AssetType::Style);
        assert_eq!(record.name, "normalize-css");
        assert!(record.version.is_resolved());
        assert!(record.filename.is_resolved());
        assert!(!record.src.is_resolved());
        assert_eq!(record.asset_type, AssetType::Style);
    }
}
