//! Dependency records and their derived-field resolution.
//!
//! A `DependencyRecord` tracks one declared dependency from manifest intake
//! through registry discovery to the rendered catalog. Derived fields
//! (filename, source URL, version) use the two-state [`Resolution`] wrapper:
//! resolution is a one-way transition, so a field computed once is never
//! recomputed even if the underlying registry metadata changes later.

use crate::catalog::AssetType;
use crate::registry::RegistryInfo;
use anyhow::{Result, anyhow, bail};
use serde::{Serialize, Serializer};

/// A derived value that is either not yet computed or pinned forever.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Resolution<T> {
    #[default]
    Unresolved,
    Resolved(T),
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Unresolved => None,
        }
    }

    /// Pin a value. The first resolution wins; later calls leave the
    /// existing value untouched.
    pub fn resolve(&mut self, value: T) {
        if let Resolution::Unresolved = self {
            *self = Resolution::Resolved(value);
        }
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Resolution::Resolved(value),
            None => Resolution::Unresolved,
        }
    }
}

impl<T: Serialize> Serialize for Resolution<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolution::Resolved(value) => value.serialize(serializer),
            Resolution::Unresolved => serializer.serialize_none(),
        }
    }
}

/// One declared dependency, mutated in place as fields are derived.
///
/// Records are never deleted: a dependency that stays unresolved survives
/// into the unknown bucket so the rendered catalog shows it.
#[derive(Clone, Debug, Serialize)]
pub struct DependencyRecord {
    pub name: String,
    /// Declared version range from the manifest (`"1.2.0"`, `"*"`, ...).
    pub range: String,
    /// Resolved version, adopted from registry metadata when absent.
    pub version: Resolution<String>,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub filename: Resolution<String>,
    pub src: Resolution<String>,
    #[serde(skip)]
    pub registry_info: Option<RegistryInfo>,
}

impl DependencyRecord {
    /// Fresh record for registry-driven discovery of a manifest entry.
    pub fn discovered(name: &str, range: &str) -> Self {
        Self {
            name: name.to_string(),
            range: range.to_string(),
            version: Resolution::Unresolved,
            asset_type: AssetType::Unknown,
            filename: Resolution::Unresolved,
            src: Resolution::Unresolved,
            registry_info: None,
        }
    }

    /// Factory for pre-seeded stubs. Every stub gets its own record; there
    /// is no shared template object to alias.
    pub fn seeded(
        name: &str,
        asset_type: AssetType,
        version: Option<String>,
        src: Option<String>,
        filename: Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            range: String::new(),
            version: version.into(),
            asset_type,
            filename: filename.into(),
            src: src.into(),
            registry_info: None,
        }
    }

    /// The trailing path segment of the resolved main entry.
    ///
    /// Cached once computed. A plain-string main or a one-element list is
    /// accepted; an empty or multi-element list is a resolution failure
    /// rather than a guess at the right entry.
    pub fn resolve_filename(&mut self) -> Result<&str> {
        if !self.filename.is_resolved() {
            let main = self
                .registry_info
                .as_ref()
                .and_then(RegistryInfo::usable_main)
                .ok_or_else(|| anyhow!("could not determine filename for '{}'", self.name))?;
            let segment = main
                .rsplit('/')
                .next()
                .unwrap_or(main)
                .trim()
                .to_string();
            if segment.is_empty() {
                bail!("could not determine filename for '{}'", self.name);
            }
            self.filename.resolve(segment);
        }
        self.filename
            .value()
            .map(String::as_str)
            .ok_or_else(|| anyhow!("could not determine filename for '{}'", self.name))
    }

    /// Derive the asset source URL from the host URL and the per-type path
    /// prefix. Requires a resolvable filename.
    pub fn resolve_src(&mut self, host_url: &str, path_prefix: &str) -> Result<&str> {
        if !self.src.is_resolved() {
            let filename = self.resolve_filename()?.to_string();
            self.src
                .resolve(format!("{host_url}{path_prefix}/{filename}"));
        }
        self.src
            .value()
            .map(String::as_str)
            .ok_or_else(|| anyhow!("could not determine src for '{}'", self.name))
    }

    /// Adopt the registry-reported version when none is pinned yet. Returns
    /// `None` when the version stays unresolved; callers surface that as a
    /// warning, not a failure.
    pub fn resolve_version(&mut self) -> Option<&str> {
        if !self.version.is_resolved() {
            if let Some(version) = self
                .registry_info
                .as_ref()
                .and_then(|info| info.version.clone())
            {
                self.version.resolve(version);
            }
        }
        self.version.value().map(String::as_str)
    }

    /// Validity is re-checked on every call, never cached.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
            && self.src.value().is_some_and(|src| !src.is_empty())
            && self.version.value().is_some_and(|version| !version.is_empty())
    }

    /// Best-effort fill of src and version. Idempotent: a second call
    /// changes no field. Returned strings are warnings for the run report.
    pub fn fulfill(&mut self, host_url: &str, path_prefix: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.src.is_resolved() {
            if let Err(err) = self.resolve_src(host_url, path_prefix) {
                warnings.push(format!("{err:#}"));
            }
        }
        if self.resolve_version().is_none() {
            warnings.push(format!("could not determine version for '{}'", self.name));
        }
        warnings
    }
}
