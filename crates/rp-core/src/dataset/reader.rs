//! CSV dataset reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rp_common::{Row, REQUIRED_COLUMNS};

use super::{DatasetError, DatasetResult};

/// Load a dataset file.
///
/// A missing file is [`DatasetError::NotFound`]; consumers must not
/// fabricate data in its place.
pub fn load_dataset(path: &Path) -> DatasetResult<Vec<Row>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DatasetError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    read_rows(file)
}

/// Parse rows from any CSV source with a header.
///
/// Columns are matched by name, so extra columns are ignored and
/// `anomaly_flag` may be missing.
pub fn read_rows<R: Read>(source: R) -> DatasetResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().map_err(DatasetError::from_csv)?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns { columns: missing });
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<Row>() {
        rows.push(record.map_err(DatasetError::from_csv)?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "date,region,plan,revenue_usd_mn,subscribers_mn,growth_rate_pct,marketing_spend_usd_mn,adoption_rate,retention_index,content_launch,anomaly_flag";

    #[test]
    fn test_reads_tagged_and_untagged_rows() {
        let csv = format!(
            "{HEADER}\n2022-01-01,A,Basic,101.25,8.1,0.5,12.3,0.61,0.74,none,\n2022-02-01,A,Basic,99.5,8.0,-0.25,11.9,0.6,0.73,Launch,true\n"
        );
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].anomaly_flag, None);
        assert_eq!(rows[1].anomaly_flag, Some(true));
        assert_eq!(rows[1].content_launch, "Launch");
        assert_eq!(rows[1].growth_rate_pct, -0.25);
    }

    #[test]
    fn test_flag_column_optional() {
        let header = HEADER.trim_end_matches(",anomaly_flag");
        let csv = format!("{header}\n2022-01-01,A,Basic,1,1,0,1,0.5,0.5,none\n");
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].anomaly_flag, None);
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "date,region,plan\n2022-01-01,A,Basic\n";
        match read_rows(csv.as_bytes()) {
            Err(DatasetError::MissingColumns { columns }) => {
                assert!(columns.contains(&"revenue_usd_mn".to_string()));
                assert!(!columns.contains(&"anomaly_flag".to_string()));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_number_reports_line() {
        let csv = format!(
            "{HEADER}\n2022-01-01,A,Basic,1,1,0,1,0.5,0.5,none,\n2022-02-01,A,Basic,oops,1,0,1,0.5,0.5,none,\n"
        );
        match read_rows(csv.as_bytes()) {
            Err(DatasetError::Csv { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Csv error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            load_dataset(&path),
            Err(DatasetError::NotFound { .. })
        ));
    }
}
