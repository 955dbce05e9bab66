//! CSV dataset writer.

use std::fs;
use std::io::Write;
use std::path::Path;

use rp_common::Row;

use super::manifest::{manifest_path, sha256_hex, DatasetManifest, ManifestInputs};
use super::{DatasetError, DatasetResult};

/// Serialize rows as CSV with the canonical header.
///
/// The header is written even when `rows` is empty.
pub fn write_rows<W: Write>(sink: W, rows: &[Row]) -> DatasetResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer
        .write_record(rp_common::COLUMNS)
        .map_err(DatasetError::from_csv)?;
    for row in rows {
        writer.serialize(row).map_err(DatasetError::from_csv)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the dataset and its sidecar manifest, creating parent directories.
pub fn write_dataset(
    path: &Path,
    rows: &[Row],
    inputs: &ManifestInputs,
) -> DatasetResult<DatasetManifest> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut buf = Vec::new();
    write_rows(&mut buf, rows)?;
    fs::write(path, &buf)?;

    let manifest = DatasetManifest::new(rows, inputs, sha256_hex(&buf));
    manifest.save(&manifest_path(path))?;
    Ok(manifest)
}
