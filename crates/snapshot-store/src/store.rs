use crate::error::StoreError;
use core_types::Snapshot;
use std::fs;
use std::path::Path;

/// Reads and deserializes the snapshot file.
///
/// The snapshot is loaded exactly once per process and treated as immutable
/// afterwards; re-running the export and restarting is the only way data
/// changes.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        generated_at = %snapshot.generated_at,
        profit_stocks = snapshot.profit_stocks.len(),
        loss_stocks = snapshot.loss_stocks.len(),
        not_won_stocks = snapshot.not_won_stocks.len(),
        investors = snapshot.investors.len(),
        "snapshot loaded"
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ApportionBasis;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "generated_at": "2026-01-05 09:00",
        "operator_share": 0.5,
        "investor_share": 0.5,
        "profit_stocks": [
            {"name": "Alpha", "revenue": 1200.50},
            {"name": "Delta", "revenue": 900, "special_investors": true}
        ],
        "loss_stocks": [{"name": "Beta", "loss": 300}],
        "not_won_stocks": [{"name": "Gamma", "cost": 0}],
        "investors": [
            {"name": "A", "investment": 100000},
            {"name": "B", "investment": 300000}
        ],
        "special_investors": [{"name": "B", "investment": 450000}]
    }"#;

    #[test]
    fn loads_a_well_formed_snapshot_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.operator_share, dec!(0.5));
        assert_eq!(snapshot.profit_stocks[0].basis, ApportionBasis::Normal);
        assert_eq!(snapshot.profit_stocks[1].basis, ApportionBasis::Special);
        assert_eq!(snapshot.total_investment(), dec!(400000));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_snapshot(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"generated_at\": ").unwrap();

        let err = load_snapshot(file.path()).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }
}
