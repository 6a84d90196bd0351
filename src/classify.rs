//! The resolution sweep: seeded matching, registry discovery, completion.
//!
//! One sequential pass over the manifest. Entries matching a pre-seeded stub
//! merge into it in place and cost no registry call; everything else goes
//! through one blocking lookup and is routed by the resolved entry file's
//! extension. The completion pass then fills missing src/version on every
//! typed record that is not yet valid. The in-progress catalog is
//! exclusively owned by this sequence; no other state crosses call
//! boundaries.

use crate::catalog::{AssetType, Catalog, DependencyRecord};
use crate::config::Options;
use crate::manifest::Manifest;
use crate::registry::RegistryClient;

/// Notices and warnings accumulated during a run. The engine never prints;
/// binaries own presentation.
#[derive(Debug, Default)]
pub struct RunReport {
    pub notices: Vec<String>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Classify then complete: the full engine pass.
pub fn resolve(
    manifest: &Manifest,
    options: &Options,
    registry: &RegistryClient,
) -> (Catalog, RunReport) {
    let mut report = RunReport::default();
    let mut catalog = classify(manifest, options, registry, &mut report);
    complete(&mut catalog, options, &mut report);
    (catalog, report)
}

/// Walk the manifest in declaration order and file every dependency.
pub fn classify(
    manifest: &Manifest,
    options: &Options,
    registry: &RegistryClient,
    report: &mut RunReport,
) -> Catalog {
    let mut catalog = seed_catalog(options);

    report.notice(format!(
        "found {} dependency(ies) in the manifest",
        manifest.entries.len()
    ));

    for entry in &manifest.entries {
        // A name seeded in both typed buckets updates both: a package may
        // legitimately ship a script and a style asset.
        let mut placed = false;
        for asset_type in AssetType::TYPED {
            for record in catalog
                .bucket_mut(asset_type)
                .iter_mut()
                .filter(|record| record.name == entry.name)
            {
                record.range = entry.range.clone();
                record.asset_type = asset_type;
                placed = true;
            }
        }
        if placed {
            report.notice(format!(
                "'{}' matched a pre-seeded dependency; no registry lookup needed",
                entry.name
            ));
            continue;
        }

        let info = match registry.lookup(&entry.name, &entry.range) {
            Ok(info) => {
                report.notice(format!("fetched info for '{}' from the registry", entry.name));
                info
            }
            Err(err) => {
                // Skipped entirely: no bucket, no retry within this run.
                report.warn(format!("could not fetch info for '{}': {err:#}", entry.name));
                continue;
            }
        };

        let mut record = DependencyRecord::discovered(&entry.name, &entry.range);
        record.registry_info = Some(info);
        place_discovered(&mut catalog, record, report);
    }

    catalog
}

/// Materialize the configured stubs into their buckets, keeping config
/// order so emission order is stable.
fn seed_catalog(options: &Options) -> Catalog {
    let mut catalog = Catalog::default();
    for asset_type in AssetType::TYPED {
        for seed in options.deps.bucket(asset_type) {
            catalog
                .bucket_mut(asset_type)
                .push(seed.materialize(asset_type));
        }
    }
    catalog
}

/// Route a registry-discovered record into a bucket by the extension of its
/// resolved entry filename. Records with no usable filename (missing,
/// empty, or ambiguous multi-entry main) land in the unknown bucket; they
/// are kept for visibility, never dropped.
fn place_discovered(catalog: &mut Catalog, mut record: DependencyRecord, report: &mut RunReport) {
    let filename = match record.resolve_filename() {
        Ok(filename) => filename.to_string(),
        Err(_) => {
            let detail = match record.registry_info.as_ref().and_then(|info| info.main.as_ref()) {
                None => "no main entry in its metadata",
                Some(_) => "ambiguous or empty main entry",
            };
            report.warn(format!(
                "could not determine the dependency type for '{}' ({detail})",
                record.name
            ));
            catalog.unknown.push(record);
            return;
        }
    };

    let asset_type = match filename.rsplit_once('.') {
        Some((_, extension)) => AssetType::from_extension(extension.to_lowercase().trim()),
        None => AssetType::Unknown,
    };
    record.asset_type = asset_type;

    match asset_type {
        AssetType::Unknown => {
            report.warn(format!(
                "could not determine the dependency type for '{}' (unrecognized entry '{filename}')",
                record.name
            ));
            catalog.unknown.push(record);
        }
        typed => {
            report.notice(format!(
                "resolved '{}' as {} from the registry",
                record.name,
                typed.as_str().to_uppercase()
            ));
            catalog.bucket_mut(typed).push(record);
        }
    }
}

/// Fill missing src/version on every typed record that is not yet valid.
/// The unknown bucket is exempt: it has no path prefix to derive from.
pub fn complete(catalog: &mut Catalog, options: &Options, report: &mut RunReport) {
    for asset_type in AssetType::TYPED {
        let Some(prefix) = options.path_prefix(asset_type) else {
            continue;
        };
        for record in catalog.bucket_mut(asset_type).iter_mut() {
            if record.is_valid() {
                continue;
            }
            report.notice(format!("fulfilling requirements for '{}'", record.name));
            for warning in record.fulfill(&options.host_url, prefix) {
                report.warn(warning);
            }
        }
    }
}
