//! Ledger spreadsheet codec.
//!
//! Flat tabular escape hatch for inspecting and bulk-editing a package's
//! ledger outside the admin workflow. Export and import share one schema and
//! round-trip losslessly for any ledger whose entries satisfy it. Malformed
//! rows never abort an import; they come back as per-row errors alongside the
//! rows that did land.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::airport;

use super::models::PricingEntry;

pub const CSV_HEADER: [&str; 3] = ["departure_airport_code", "departure_date", "price"];

/// One import row that failed validation
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// 1-based line number in the file, counting the header as line 1
    pub row: usize,
    pub reason: String,
}

/// One import row that passed validation
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub airport_code: String,
    pub airport_name: String,
    pub travel_date: NaiveDate,
    pub price: Decimal,
}

/// Outcome of parsing an import file
#[derive(Debug)]
pub struct ImportParse {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<RowError>,
}

/// Serialize ledger entries, grouped by origin airport then chronological.
pub fn export_entries(entries: &[PricingEntry]) -> String {
    let mut ordered: Vec<&PricingEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| {
        (a.airport_code.as_str(), a.travel_date).cmp(&(b.airport_code.as_str(), b.travel_date))
    });

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).expect("write to Vec");
    for entry in ordered {
        writer
            .write_record([
                entry.airport_code.as_str(),
                &entry.travel_date.format("%Y-%m-%d").to_string(),
                &entry.price.to_string(),
            ])
            .expect("write to Vec");
    }

    let bytes = writer.into_inner().expect("flush to Vec");
    String::from_utf8(bytes).expect("csv output is UTF-8")
}

/// Parse an import file into validated rows plus per-row errors.
///
/// Extra columns are ignored; unknown airport codes, bad dates and negative
/// or unparseable prices are row-level errors. Upsert semantics live with the
/// caller - a later row for the same (airport, date) key replaces an earlier
/// one.
pub fn parse_import(text: &str) -> ImportParse {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let row = index + 2; // data starts on line 2
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                errors.push(RowError {
                    row,
                    reason: format!("unreadable row: {}", e),
                });
                continue;
            }
        };

        let (code, date, price) = match (record.get(0), record.get(1), record.get(2)) {
            (Some(code), Some(date), Some(price)) => (code, date, price),
            _ => {
                errors.push(RowError {
                    row,
                    reason: "expected departure_airport_code, departure_date, price".to_string(),
                });
                continue;
            }
        };

        let airport_name = match airport::airport_name(code) {
            Some(name) => name.to_string(),
            None => {
                errors.push(RowError {
                    row,
                    reason: format!("unknown airport code '{}'", code),
                });
                continue;
            }
        };

        let travel_date = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                errors.push(RowError {
                    row,
                    reason: format!("invalid date '{}', expected YYYY-MM-DD", date),
                });
                continue;
            }
        };

        let price = match price.parse::<Decimal>() {
            Ok(price) if price >= Decimal::ZERO => price,
            Ok(_) => {
                errors.push(RowError {
                    row,
                    reason: format!("negative price '{}'", price),
                });
                continue;
            }
            Err(_) => {
                errors.push(RowError {
                    row,
                    reason: format!("invalid price '{}'", price),
                });
                continue;
            }
        };

        rows.push(ParsedRow {
            airport_code: code.to_string(),
            airport_name,
            travel_date,
            price,
        });
    }

    ImportParse { rows, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn entry(code: &str, day: u32, price: Decimal) -> PricingEntry {
        PricingEntry {
            id: Uuid::new_v4(),
            package_id: Uuid::new_v4(),
            airport_code: code.to_string(),
            airport_name: airport::airport_name(code).unwrap_or(code).to_string(),
            travel_date: NaiveDate::from_ymd_opt(2025, 7, day).unwrap(),
            price,
            currency: "GBP".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_export_grouped_by_airport_then_date() {
        let text = export_entries(&[
            entry("MAN", 10, dec!(902)),
            entry("LGW", 17, dec!(895)),
            entry("LGW", 10, dec!(880)),
        ]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "departure_airport_code,departure_date,price");
        assert_eq!(lines[1], "LGW,2025-07-10,880");
        assert_eq!(lines[2], "LGW,2025-07-17,895");
        assert_eq!(lines[3], "MAN,2025-07-10,902");
    }

    #[test]
    fn test_round_trip() {
        let entries = vec![
            entry("LGW", 10, dec!(880)),
            entry("LGW", 17, dec!(895)),
            entry("MAN", 10, dec!(902.50)),
        ];
        let parsed = parse_import(&export_entries(&entries));

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), entries.len());
        for (row, entry) in parsed.rows.iter().zip(&entries) {
            assert_eq!(row.airport_code, entry.airport_code);
            assert_eq!(row.travel_date, entry.travel_date);
            assert_eq!(row.price, entry.price);
        }
    }

    #[test]
    fn test_partial_import_collects_row_errors() {
        let mut text = String::from("departure_airport_code,departure_date,price\n");
        for day in 1..=10 {
            text.push_str(&format!("LGW,2025-07-{:02},880\n", day));
        }
        text.push_str("XXX,2025-07-11,880\n");
        text.push_str("LGW,11-07-2025,880\n");

        let parsed = parse_import(&text);
        assert_eq!(parsed.rows.len(), 10);
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, 12);
        assert!(parsed.errors[0].reason.contains("XXX"));
        assert_eq!(parsed.errors[1].row, 13);
    }

    #[test]
    fn test_import_rejects_negative_price() {
        let text = "departure_airport_code,departure_date,price\nLGW,2025-07-10,-5\n";
        let parsed = parse_import(text);
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
    }

    #[test]
    fn test_import_ignores_extra_columns() {
        let text =
            "departure_airport_code,departure_date,price,comment\nLGW,2025-07-10,880,peak week\n";
        let parsed = parse_import(text);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].price, dec!(880));
    }

    #[test]
    fn test_import_reports_short_rows() {
        let text = "departure_airport_code,departure_date,price\nLGW,2025-07-10\n";
        let parsed = parse_import(text);
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
    }
}
