use crate::domain::health::{HealthView, PivotRow, TidyRecord};
use crate::utils::error::{DashboardError, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const MISSING_CELL: &str = "-";

pub fn years(records: &[TidyRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn locations(records: &[TidyRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 每年一列：`{year, <Location>: value}`；重複資料以後者為準
pub fn series_by_year(records: &[TidyRecord]) -> Vec<Map<String, Value>> {
    let mut by_year: BTreeMap<i32, Map<String, Value>> = BTreeMap::new();
    for record in records {
        let row = by_year.entry(record.year).or_insert_with(|| {
            let mut row = Map::new();
            row.insert("year".to_string(), Value::from(record.year));
            row
        });
        row.insert(record.location.clone(), Value::from(record.value));
    }
    by_year.into_values().collect()
}

/// Location × year table. The first value seen for a cell wins.
pub fn pivot(records: &[TidyRecord]) -> (Vec<i32>, Vec<PivotRow>) {
    let years = years(records);
    let mut cells: HashMap<(&str, i32), f64> = HashMap::new();
    for record in records {
        cells
            .entry((record.location.as_str(), record.year))
            .or_insert(record.value);
    }

    let rows = locations(records)
        .into_iter()
        .map(|location| {
            let row_cells = years
                .iter()
                .map(|year| cells.get(&(location.as_str(), *year)).copied())
                .collect();
            PivotRow {
                location,
                cells: row_cells,
            }
        })
        .collect();
    (years, rows)
}

fn pivot_row_json(years: &[i32], row: &PivotRow) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("Location".to_string(), Value::String(row.location.clone()));
    for (year, cell) in years.iter().zip(&row.cells) {
        let value = cell.map_or_else(|| Value::String(MISSING_CELL.to_string()), Value::from);
        out.insert(year.to_string(), value);
    }
    out
}

pub fn build_view(records: &[TidyRecord]) -> HealthView {
    let (years, rows) = pivot(records);
    HealthView {
        locations: rows.iter().map(|r| r.location.clone()).collect(),
        pivot: rows.iter().map(|r| pivot_row_json(&years, r)).collect(),
        series: series_by_year(records),
        years,
    }
}

/// Pivot table as CSV: a `Location` column followed by one column per year.
pub fn pivot_csv(years: &[i32], rows: &[PivotRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Location".to_string()];
    header.extend(years.iter().map(|y| y.to_string()));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.location.clone()];
        record.extend(
            row.cells
                .iter()
                .map(|c| c.map_or_else(|| MISSING_CELL.to_string(), |v| v.to_string())),
        );
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::ProcessingError {
            message: format!("CSV flush failed: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| DashboardError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(location: &str, year: i32, value: f64) -> TidyRecord {
        TidyRecord {
            location: location.to_string(),
            year,
            value,
        }
    }

    fn sample() -> Vec<TidyRecord> {
        vec![
            record("Maine", 2015, 300.0),
            record("Alabama", 2014, 250.0),
            record("Maine", 2014, 280.0),
            record("Alabama", 2015, 260.0),
            record("Tennessee", 2015, 240.0),
        ]
    }

    #[test]
    fn test_series_by_year() {
        let series = series_by_year(&sample());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0]["year"], json!(2014));
        assert_eq!(series[0]["Alabama"], json!(250.0));
        assert!(!series[0].contains_key("Tennessee"));
        assert_eq!(series[1]["Tennessee"], json!(240.0));
    }

    #[test]
    fn test_pivot_fills_missing_cells() {
        let view = build_view(&sample());
        assert_eq!(view.years, vec![2014, 2015]);
        assert_eq!(view.locations, vec!["Alabama", "Maine", "Tennessee"]);
        assert_eq!(view.pivot[2]["Location"], json!("Tennessee"));
        assert_eq!(view.pivot[2]["2014"], json!("-"));
        assert_eq!(view.pivot[2]["2015"], json!(240.0));
    }

    #[test]
    fn test_pivot_first_duplicate_wins() {
        let records = vec![record("Maine", 2014, 1.0), record("Maine", 2014, 2.0)];
        let (_, rows) = pivot(&records);
        assert_eq!(rows[0].cells, vec![Some(1.0)]);

        // series keeps the later one
        assert_eq!(series_by_year(&records)[0]["Maine"], json!(2.0));
    }

    #[test]
    fn test_pivot_csv() {
        let (years, rows) = pivot(&sample());
        let csv = pivot_csv(&years, &rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Location,2014,2015");
        assert_eq!(lines[1], "Alabama,250,260");
        assert_eq!(lines[3], "Tennessee,-,240");
    }
}
