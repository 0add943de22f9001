//! The CSV score file: column layout, reader and writer.

use csv::{ByteRecord, StringRecord};
use std::collections::HashSet;
use std::path::Path;

use super::record::{BehavioralMetrics, FieldValue, WalletRecord};

/// Header of a score file, in column order.
pub const COLUMNS: [&str; 9] = [
    "wallet_id",
    "wallet_score",
    "illicit_ratio",
    "max_score",
    "avg_gas_paid",
    "gas_volatility",
    "gas_overpay_ratio",
    "tx_time_entropy",
    "automation_score",
];

/// Behavioral columns, read all-or-nothing.
pub const BEHAVIORAL_COLUMNS: [&str; 5] = [
    "avg_gas_paid",
    "gas_volatility",
    "gas_overpay_ratio",
    "tx_time_entropy",
    "automation_score",
];

/// Column positions resolved from a header row.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    wallet_id: usize,
    wallet_score: Option<usize>,
    illicit_ratio: Option<usize>,
    max_score: Option<usize>,
    behavior: Option<[usize; 5]>,
}

impl ColumnLayout {
    pub fn from_headers(headers: &StringRecord) -> eyre::Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let wallet_id =
            position("wallet_id").ok_or_else(|| eyre::eyre!("Missing 'wallet_id' column"))?;

        let behavior = match BEHAVIORAL_COLUMNS.map(position) {
            [Some(a), Some(b), Some(c), Some(d), Some(e)] => Some([a, b, c, d, e]),
            _ => None,
        };

        Ok(Self {
            wallet_id,
            wallet_score: position("wallet_score"),
            illicit_ratio: position("illicit_ratio"),
            max_score: position("max_score"),
            behavior,
        })
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// Build a record from one row. Also returns the names of columns whose
    /// cells failed numeric coercion.
    pub fn parse_row(&self, row: &StringRecord) -> (WalletRecord, Vec<&'static str>) {
        let mut failures = Vec::new();
        let mut numeric = |idx: Option<usize>, name: &'static str| {
            let value = idx
                .and_then(|i| row.get(i))
                .map(FieldValue::parse)
                .unwrap_or_default();
            if !value.is_parsed() {
                failures.push(name);
            }
            value
        };

        let wallet_score = numeric(self.wallet_score, "wallet_score");
        let illicit_ratio = numeric(self.illicit_ratio, "illicit_ratio");
        let max_score = numeric(self.max_score, "max_score");

        let behavior = self
            .behavior
            .and_then(|indices| {
                let cells = indices.map(|i| row.get(i));
                // A short row, or a row with the whole group blank, has no metrics
                match cells {
                    [Some(a), Some(b), Some(c), Some(d), Some(e)] => {
                        let cells = [a, b, c, d, e];
                        if cells.iter().all(|cell| cell.trim().is_empty()) {
                            None
                        } else {
                            Some(cells)
                        }
                    }
                    _ => None,
                }
            })
            .map(|cells| {
                let mut field = |i: usize| {
                    let value = FieldValue::parse(cells[i]);
                    if !value.is_parsed() {
                        failures.push(BEHAVIORAL_COLUMNS[i]);
                    }
                    value
                };
                BehavioralMetrics {
                    avg_gas_paid: field(0),
                    gas_volatility: field(1),
                    gas_overpay_ratio: field(2),
                    tx_time_entropy: field(3),
                    automation_score: field(4),
                }
            });

        let record = WalletRecord {
            wallet_id: row.get(self.wallet_id).unwrap_or("").to_string(),
            wallet_score,
            illicit_ratio,
            max_score,
            behavior,
        };
        (record, failures)
    }
}

/// Cells that are not valid UTF-8 keep their replacement-character form and
/// then fail numeric coercion like any other bad cell.
fn decode_lossy(raw: &ByteRecord) -> StringRecord {
    raw.iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}

/// Read every row of a score file, in file order.
///
/// Fails only when the file itself cannot be opened or has no usable header.
/// Bad cells, including undecodable bytes, are kept raw and logged. Only a
/// row the CSV parser cannot read at all is skipped.
pub fn read_records(path: &Path) -> eyre::Result<Vec<WalletRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("Failed to open wallet scores '{}': {}", path.display(), e))?;

    let headers = reader
        .headers()
        .map_err(|e| eyre::eyre!("Failed to read header of '{}': {}", path.display(), e))?
        .clone();
    let layout = ColumnLayout::from_headers(&headers)
        .map_err(|e| eyre::eyre!("Unusable header in '{}': {}", path.display(), e))?;

    if !layout.has_behavior() {
        tracing::warn!(
            path = %path.display(),
            "Score file has no behavioral columns, loading without behavioral metrics"
        );
    }

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped = 0usize;
    let mut coercion_failures = 0usize;

    for (idx, result) in reader.byte_records().enumerate() {
        let row = match result {
            Ok(raw) => decode_lossy(&raw),
            Err(e) => {
                tracing::warn!(row = idx + 1, error = %e, "Skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        let (record, failures) = layout.parse_row(&row);
        for column in &failures {
            tracing::warn!(
                wallet_id = %record.wallet_id,
                column,
                "Field failed numeric coercion, keeping raw value"
            );
        }
        coercion_failures += failures.len();

        if !seen.insert(record.wallet_id.clone()) {
            tracing::warn!(wallet_id = %record.wallet_id, "Duplicate wallet id in score file");
        }
        records.push(record);
    }

    tracing::info!(
        records = records.len(),
        skipped,
        coercion_failures,
        path = %path.display(),
        "Loaded wallet scores"
    );
    Ok(records)
}

/// Write records as a score file with the full header. Records without
/// behavioral metrics get blank behavioral cells.
pub fn write_records(path: &Path, records: &[WalletRecord]) -> eyre::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| eyre::eyre!("Failed to create '{}': {}", path.display(), e))?;

    writer.write_record(COLUMNS)?;
    for record in records {
        let mut row = vec![
            record.wallet_id.clone(),
            record.wallet_score.to_string(),
            record.illicit_ratio.to_string(),
            record.max_score.to_string(),
        ];
        match &record.behavior {
            Some(b) => row.extend([
                b.avg_gas_paid.to_string(),
                b.gas_volatility.to_string(),
                b.gas_overpay_ratio.to_string(),
                b.tx_time_entropy.to_string(),
                b.automation_score.to_string(),
            ]),
            None => row.extend(std::iter::repeat(String::new()).take(BEHAVIORAL_COLUMNS.len())),
        }
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .map_err(|e| eyre::eyre!("Failed to flush '{}': {}", path.display(), e))?;

    tracing::debug!(records = records.len(), path = %path.display(), "Wrote wallet scores");
    Ok(())
}
