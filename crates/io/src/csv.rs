// CSV/TSV import
//
// Produces the same RowTable shape as the xlsx reader so both encodings
// feed one schema layer.

use std::time::Instant;

use adspend_ingest::model::{Cell, RawRow, RowTable, SpendRow};
use adspend_ingest::normalize;
use adspend_ingest::schema::TrackerColumns;
use adspend_ingest::ParseError;

use crate::ParseReport;

/// Read delimited text bytes into a raw row table. The first physical row
/// is carried as data; header handling happens at the schema layer.
pub fn read_rows(bytes: &[u8], label: &str) -> Result<RowTable, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput { bytes: 0 });
    }
    let content = decode_text(bytes);
    let delimiter = sniff_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Io(e.to_string()))?;
        rows.push(RawRow::new(record.iter().map(to_cell).collect()));
    }
    if rows.is_empty() {
        return Err(ParseError::EmptySheet {
            sheet: label.to_string(),
        });
    }
    Ok(RowTable {
        sheet: label.to_string(),
        rows,
    })
}

/// Read a single-table CSV export of the unbilled feed into spend rows.
pub fn read_spend_rows(bytes: &[u8], label: &str) -> Result<(Vec<SpendRow>, ParseReport), ParseError> {
    let start_time = Instant::now();
    let table = read_rows(bytes, label)?;

    let Some(header_at) = table.rows.iter().position(|r| !r.is_blank()) else {
        return Err(ParseError::EmptySheet {
            sheet: label.to_string(),
        });
    };
    let columns = TrackerColumns::resolve(&table.sheet, &table.rows[header_at])?;
    let division = normalize::division_for_sheet(label).to_string();

    let mut report = ParseReport {
        sheets_read: 1,
        ..Default::default()
    };
    let mut rows = Vec::new();
    for row in &table.rows[header_at + 1..] {
        match columns.spend_row(row, &division) {
            Some(spend) => {
                report.rows_read += 1;
                rows.push(spend);
            }
            None => report.rows_skipped += 1,
        }
    }
    if rows.is_empty() {
        return Err(ParseError::EmptySheet {
            sheet: label.to_string(),
        });
    }
    report.duration_ms = start_time.elapsed().as_millis();
    Ok((rows, report))
}

fn to_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        Cell::Empty
    } else if let Ok(n) = trimmed.parse::<f64>() {
        Cell::Number(n)
    } else {
        Cell::Text(field.to_string())
    }
}

/// Decode bytes as UTF-8, falling back to Windows-1252 for legacy exports.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per
/// line. The delimiter producing the most consistent field count
/// (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        let first = counts.first().copied().unwrap_or(0);
        if first <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == first).count() as u64;
        let score = consistent * first as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}
