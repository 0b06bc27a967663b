//! Delimited-text codec for decision tables and scored tables.

use crate::domain::model::{Alternative, DecisionTable, ScoredTable};
use crate::utils::error::{Result, TopsisError};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

pub const SCORE_COLUMN: &str = "Topsis Score";
pub const RANK_COLUMN: &str = "Rank";

/// Delimiter implied by a file name: tab for `.tsv`, comma otherwise.
pub fn delimiter_for(location: &str) -> u8 {
    let is_tsv = std::path::Path::new(location)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv {
        b'\t'
    } else {
        b','
    }
}

/// Parses a decision table. The first column holds identifiers, every other
/// column is a criterion.
///
/// With `has_header == None` the first record is taken as a header when none
/// of its criterion cells is numeric.
pub fn read_decision_table(data: &[u8], delimiter: u8, has_header: Option<bool>) -> Result<DecisionTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut records = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?
        .into_iter()
        .filter(|record| record.iter().any(|cell| !cell.is_empty()));

    let first = records
        .next()
        .ok_or_else(|| TopsisError::validation("table", "", "input contains no rows"))?;

    let header_present = has_header.unwrap_or_else(|| looks_like_header(&first));
    let (header, data_records): (Option<Vec<String>>, Vec<StringRecord>) = if header_present {
        (Some(first.iter().map(str::to_string).collect()), records.collect())
    } else {
        (None, std::iter::once(first).chain(records).collect())
    };

    let width = header
        .as_ref()
        .map(Vec::len)
        .or_else(|| data_records.first().map(StringRecord::len))
        .unwrap_or(0);

    let column_name = |j: usize| -> String {
        header
            .as_ref()
            .and_then(|h| h.get(j + 1))
            .cloned()
            .unwrap_or_else(|| format!("C{}", j + 1))
    };

    let mut rows = Vec::with_capacity(data_records.len());
    for (i, record) in data_records.iter().enumerate() {
        let id = record.get(0).unwrap_or("").to_string();
        let row_field = format!("table row {} ({})", i + 1, id);

        if record.len() != width {
            return Err(TopsisError::validation(
                row_field,
                record.len().to_string(),
                format!("expected {} columns", width),
            ));
        }

        let mut values = Vec::with_capacity(width.saturating_sub(1));
        let mut cells = Vec::with_capacity(width.saturating_sub(1));
        for (j, cell) in record.iter().skip(1).enumerate() {
            let value = cell.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
                TopsisError::validation(
                    format!("{}, column '{}'", row_field, column_name(j)),
                    cell,
                    "criterion values must be finite numbers",
                )
            })?;
            values.push(value);
            cells.push(cell.to_string());
        }

        rows.push(Alternative::new(id, values).with_cells(cells));
    }

    tracing::debug!(
        "Parsed {} rows (header: {})",
        rows.len(),
        if header.is_some() { "yes" } else { "no" }
    );

    DecisionTable::new(header, rows)
}

fn looks_like_header(record: &StringRecord) -> bool {
    record.len() > 1 && record.iter().skip(1).all(|cell| cell.parse::<f64>().is_err())
}

pub fn format_score(score: f64, precision: Option<usize>) -> String {
    match precision {
        Some(places) => format!("{:.*}", places, score),
        None => score.to_string(),
    }
}

/// Renders the input table followed by the score and rank columns.
pub fn write_scored_table(scored: &ScoredTable, delimiter: u8, precision: Option<usize>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    let table = scored.table();
    let mut header = vec![table.id_column_name().to_string()];
    header.extend(table.criterion_names());
    header.push(SCORE_COLUMN.to_string());
    header.push(RANK_COLUMN.to_string());
    writer.write_record(&header)?;

    for (row, outcome) in scored.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 3);
        record.push(row.id.clone());
        record.extend((0..row.values.len()).map(|j| row.cell_text(j)));
        record.push(format_score(outcome.closeness, precision));
        record.push(outcome.rank.to_string());
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| TopsisError::ProcessingError {
        message: format!("failed to flush table writer: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| TopsisError::ProcessingError {
        message: format!("table output is not valid UTF-8: {}", e),
    })
}
