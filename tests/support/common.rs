#![cfg(unix)]
#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vendorcat::{Options, RegistryClient};

// Shell-script stand-in for the registry CLI. Answers canned JSON per
// package spec ("name#range"), logs every invocation, and exits non-zero
// for anything it has no answer for. The script lives in its own temp dir
// and disappears with the fixture.
pub struct MockRegistry {
    dir: TempDir,
    pub script: PathBuf,
    pub log: PathBuf,
}

impl MockRegistry {
    pub fn install(responses: &[(&str, &str)]) -> Result<Self> {
        let mut body = String::new();
        for (spec, response) in responses {
            body.push_str(&format!(
                "  \"{spec}\") cat <<'RESPONSE'\n{response}\nRESPONSE\n    ;;\n"
            ));
        }
        body.push_str("  *) exit 1 ;;\n");
        Self::from_case_arms(&body)
    }

    /// A registry whose process always fails, whatever the package.
    pub fn failing() -> Result<Self> {
        Self::from_case_arms("  *) exit 2 ;;\n")
    }

    /// A registry that answers with something that is not JSON.
    pub fn garbled() -> Result<Self> {
        Self::from_case_arms("  *) echo not-json ;;\n")
    }

    fn from_case_arms(arms: &str) -> Result<Self> {
        let dir = TempDir::new().context("allocating mock registry dir")?;
        let log = dir.path().join("invocations.log");
        let script = dir.path().join("mock-registry");

        let body = format!(
            "#!/bin/sh\necho \"$1\" >> \"{}\"\ncase \"$1\" in\n{arms}esac\n",
            log.display()
        );
        fs::write(&script, body)
            .with_context(|| format!("writing mock registry {}", script.display()))?;
        let mut perms = fs::metadata(&script)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms)?;

        Ok(Self { dir, script, log })
    }

    /// Options wired to this mock registry, otherwise defaults.
    pub fn options(&self) -> Options {
        let mut options = Options::default();
        options.registry.program = self.script.to_string_lossy().into_owned();
        options.registry.args = Vec::new();
        options
    }

    pub fn client(&self) -> RegistryClient {
        RegistryClient::new(self.script.to_string_lossy().into_owned(), Vec::new())
    }

    /// Every `name#range` spec the script was invoked with, in order.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Write a manifest document into `dir` and return its path.
pub fn write_manifest(dir: &Path, document: &Value) -> Result<PathBuf> {
    let path = dir.join("manifest.json");
    fs::write(&path, serde_json::to_string_pretty(document)?)
        .with_context(|| format!("writing manifest {}", path.display()))?;
    Ok(path)
}
