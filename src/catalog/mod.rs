//! Typed catalog of resolved vendor assets.
//!
//! The catalog holds three discovery-ordered buckets keyed by [`AssetType`].
//! Pre-seeded stubs keep their configured positions and are merged in place
//! as manifest entries match them; registry-discovered records are appended
//! afterwards in manifest order. Emission order follows bucket order, so the
//! ordering here is part of the output contract.

pub mod record;

pub use record::{DependencyRecord, Resolution};

use serde::{Deserialize, Serialize};

/// Classification bucket for one dependency. Two recognized asset types
/// plus the overflow bucket for everything the engine could not place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "js")]
    Script,
    #[serde(rename = "css")]
    Style,
    #[serde(rename = "unknown")]
    Unknown,
}

impl AssetType {
    /// The buckets with a defined path prefix. `Unknown` has none, so its
    /// records never get a derived source URL.
    pub const TYPED: [AssetType; 2] = [AssetType::Script, AssetType::Style];

    /// Bucket for a filename extension, already lower-cased and trimmed by
    /// the caller. Unrecognized extensions (including none) overflow into
    /// `Unknown` instead of keying new buckets.
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "js" => AssetType::Script,
            "css" => AssetType::Style,
            _ => AssetType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Script => "js",
            AssetType::Style => "css",
            AssetType::Unknown => "unknown",
        }
    }
}

/// The final per-bucket collection handed to rendering.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Catalog {
    pub js: Vec<DependencyRecord>,
    pub css: Vec<DependencyRecord>,
    pub unknown: Vec<DependencyRecord>,
}

impl Catalog {
    pub fn bucket(&self, asset_type: AssetType) -> &[DependencyRecord] {
        match asset_type {
            AssetType::Script => &self.js,
            AssetType::Style => &self.css,
            AssetType::Unknown => &self.unknown,
        }
    }

    pub fn bucket_mut(&mut self, asset_type: AssetType) -> &mut Vec<DependencyRecord> {
        match asset_type {
            AssetType::Script => &mut self.js,
            AssetType::Style => &mut self.css,
            AssetType::Unknown => &mut self.unknown,
        }
    }

    /// Count of dependencies that ended up unclassified; reported in the
    /// run summary without failing the build.
    pub fn unresolved_count(&self) -> usize {
        self.unknown.len()
    }

    pub fn len(&self) -> usize {
        self.js.len() + self.css.len() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
