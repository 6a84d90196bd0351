//! Registry client: one blocking external lookup per unresolved dependency.
//!
//! The client spawns the configured registry CLI (`bower info` by default)
//! with a `name#range` argument and `--json`, captures stdout, and parses the
//! metadata. Every transport or parse failure surfaces as an error at this
//! boundary; the classifier treats it as a skip-with-warning signal, never a
//! reason to abort the run. Lookups run strictly one at a time: the whole
//! resolution pass is a single sequential sweep with no timeout, so a hung
//! registry process blocks it.

use crate::config::{Options, registry_program_override};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};

/// Package metadata as returned by the registry. Fields the engine does not
/// consume are ignored on parse.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Present when the registry answers a wildcard query with both the
    /// matched record and the latest release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<Box<RegistryInfo>>,
}

/// The `main` metadata field: a single entry path or a list of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MainEntry {
    One(String),
    Many(Vec<String>),
}

impl RegistryInfo {
    /// The single usable main entry, if there is one. A plain string or a
    /// one-element list qualifies; an empty or multi-element list does not.
    /// Ambiguous mains are a resolution failure, not a first-element pick.
    pub fn usable_main(&self) -> Option<&str> {
        match self.main.as_ref()? {
            MainEntry::One(path) if !path.trim().is_empty() => Some(path),
            MainEntry::One(_) => None,
            MainEntry::Many(paths) => match paths.as_slice() {
                [only] if !only.trim().is_empty() => Some(only),
                _ => None,
            },
        }
    }
}

/// Invokes the external registry CLI for single-package lookups.
pub struct RegistryClient {
    program: String,
    args: Vec<String>,
}

impl RegistryClient {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Client for the configured registry command, honoring the
    /// `VENDORCAT_REGISTRY_CLI` environment override.
    pub fn from_options(options: &Options) -> Self {
        let program = registry_program_override()
            .unwrap_or_else(|| options.registry.program.clone());
        Self::new(program, options.registry.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Look up one package. Blocks until the registry process exits.
    ///
    /// Normalizes the wildcard indirection before returning: a `*` query
    /// answered with a `latest` sub-record yields that sub-record, not the
    /// top-level metadata.
    pub fn lookup(&self, name: &str, range: &str) -> Result<RegistryInfo> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(format!("{name}#{range}"))
            .arg("--json")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .with_context(|| {
                format!("failed to invoke registry command '{}'", self.program)
            })?;

        if !output.status.success() {
            bail!(
                "registry lookup for '{name}#{range}' exited with {}",
                output.status
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let body = stdout.trim();
        if body.is_empty() {
            bail!("registry lookup for '{name}#{range}' produced no output");
        }

        let info: RegistryInfo = serde_json::from_str(body)
            .with_context(|| format!("parsing registry metadata for '{name}#{range}'"))?;
        Ok(normalize_wildcard(range, info))
    }
}

fn normalize_wildcard(range: &str, info: RegistryInfo) -> RegistryInfo {
    if range == "*" {
        if let Some(latest) = info.latest {
            return *latest;
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_parses_string_and_list_mains() {
        let one: RegistryInfo =
            serde_json::from_value(json!({"main": "dist/a.js", "version": "1.0.0"})).unwrap();
        assert_eq!(one.usable_main(), Some("dist/a.js"));

        let many: RegistryInfo =
            serde_json::from_value(json!({"main": ["a.js", "a.css"]})).unwrap();
        assert_eq!(many.usable_main(), None);

        let single: RegistryInfo = serde_json::from_value(json!({"main": ["a.js"]})).unwrap();
        assert_eq!(single.usable_main(), Some("a.js"));
    }

    #[test]
    fn empty_or_missing_main_is_unusable() {
        let absent: RegistryInfo = serde_json::from_value(json!({"version": "1.0.0"})).unwrap();
        assert_eq!(absent.usable_main(), None);

        let blank: RegistryInfo = serde_json::from_value(json!({"main": "  "})).unwrap();
        assert_eq!(blank.usable_main(), None);

        let empty_list: RegistryInfo = serde_json::from_value(json!({"main": []})).unwrap();
        assert_eq!(empty_list.usable_main(), None);
    }

    #[test]
    fn wildcard_query_prefers_latest_record() {
        let info: RegistryInfo = serde_json::from_value(json!({
            "main": "old.css",
            "version": "1.0.0",
            "latest": {"main": "x.css", "version": "2.0.0"}
        }))
        .unwrap();

        let normalized = normalize_wildcard("*", info.clone());
        assert_eq!(normalized.usable_main(), Some("x.css"));
        assert_eq!(normalized.version.as_deref(), Some("2.0.0"));

        let pinned = normalize_wildcard("1.0.0", info);
        assert_eq!(pinned.usable_main(), Some("old.css"));
    }

    #[test]
    fn extra_metadata_fields_are_ignored() {
        let info: RegistryInfo = serde_json::from_value(json!({
            "name": "foo",
            "main": "foo.js",
            "version": "0.1.0",
            "homepage": "https://example.invalid",
            "dependencies": {"bar": "*"}
        }))
        .unwrap();
        assert_eq!(info.usable_main(), Some("foo.js"));
    }
}
