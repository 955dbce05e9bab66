//! Sidecar manifest for a persisted dataset.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rp_common::{Row, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{DatasetError, DatasetResult};

/// Provenance the writer cannot derive from the rows themselves.
#[derive(Debug, Clone, Default)]
pub struct ManifestInputs {
    pub seed: Option<u64>,
    pub config_hash: Option<String>,
}

/// Dataset manifest, written as `<dataset>.manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub schema_version: String,

    pub generated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// SHA-256 of the config that produced the rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,

    pub row_count: usize,

    /// Distinct (region, plan) pairs.
    pub group_count: usize,

    /// Whether every row carries an anomaly flag.
    pub tagged: bool,

    pub anomaly_count: usize,

    /// SHA-256 of the CSV bytes, hex-encoded.
    pub csv_sha256: String,
}

impl DatasetManifest {
    pub fn new(rows: &[Row], inputs: &ManifestInputs, csv_sha256: String) -> Self {
        let groups: BTreeSet<(&str, &str)> = rows
            .iter()
            .map(|r| (r.region.as_str(), r.plan.as_str()))
            .collect();
        DatasetManifest {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            seed: inputs.seed,
            config_hash: inputs.config_hash.clone(),
            row_count: rows.len(),
            group_count: groups.len(),
            tagged: !rows.is_empty() && rows.iter().all(|r| r.anomaly_flag.is_some()),
            anomaly_count: rows.iter().filter(|r| r.is_anomaly()).count(),
            csv_sha256,
        }
    }

    pub fn load(path: &Path) -> DatasetResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DatasetError::ManifestMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> DatasetResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// `data/x.csv` → `data/x.csv.manifest.json`.
pub fn manifest_path(dataset: &Path) -> PathBuf {
    let mut name = dataset.as_os_str().to_os_string();
    name.push(".manifest.json");
    PathBuf::from(name)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Recompute the dataset checksum and compare it with the manifest.
pub fn verify_manifest(dataset: &Path) -> DatasetResult<DatasetManifest> {
    let manifest = DatasetManifest::load(&manifest_path(dataset))?;
    let bytes = match fs::read(dataset) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DatasetError::NotFound {
                path: dataset.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    let actual = sha256_hex(&bytes);
    if actual != manifest.csv_sha256 {
        return Err(DatasetError::ChecksumMismatch {
            expected: manifest.csv_sha256,
            actual,
        });
    }
    Ok(manifest)
}
