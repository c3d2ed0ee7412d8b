use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::vacancy::VacancyRecord;

/// Written in place of any null cell.
pub const NULL_SENTINEL: &str = "NULL";

pub struct ExportService;

impl ExportService {
    /// Write `records` to `path` as fully quoted CSV, truncating any existing
    /// file. An empty set is rejected before the file is opened.
    pub fn write_csv(records: &HashSet<VacancyRecord>, path: &Path) -> Result<usize> {
        if records.is_empty() {
            return Err(Error::EmptyResult);
        }

        let file = File::create(path)?;
        let written = Self::write_to(records, file)?;
        info!(rows = written, path = %path.display(), "CSV export finished");
        Ok(written)
    }

    /// Header row, then one row per record ordered by id. Records sharing an
    /// id are ordered by timestamp, then by their rendered cells.
    pub fn write_to<W: Write>(records: &HashSet<VacancyRecord>, writer: W) -> Result<usize> {
        if records.is_empty() {
            return Err(Error::EmptyResult);
        }

        let mut csv_writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(writer);

        csv_writer.write_record(VacancyRecord::COLUMNS)?;

        let mut ordered: Vec<&VacancyRecord> = records.iter().collect();
        ordered.sort_by_cached_key(|r| (r.id(), r.published_at(), r.to_row()));

        for record in &ordered {
            let row = record.to_row();
            csv_writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or(NULL_SENTINEL)))?;
        }
        csv_writer.flush()?;

        Ok(ordered.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::hh_dto::RawVacancy;
    use serde_json::{json, Value};

    fn record(id: i64, salary: Value) -> VacancyRecord {
        let raw: RawVacancy = serde_json::from_value(json!({
            "id": id.to_string(),
            "name": format!("Vacancy {id}"),
            "area": { "name": "Санкт-Петербург" },
            "salary": salary,
            "published_at": "2024-05-20T09:00:00+0300",
            "employer": { "name": "Acme, Inc.", "accredited_it_employer": false, "trusted": true }
        }))
        .unwrap();
        VacancyRecord::try_from(raw).unwrap()
    }

    fn render(records: &HashSet<VacancyRecord>) -> String {
        let mut buffer = Vec::new();
        ExportService::write_to(records, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn header_matches_columns() {
        let records: HashSet<_> = [record(1, Value::Null)].into_iter().collect();
        let output = render(&records);
        let header = output.lines().next().unwrap();
        let expected = VacancyRecord::COLUMNS
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(header, expected);
    }

    #[test]
    fn nulls_use_sentinel_and_values_are_quoted() {
        let records: HashSet<_> = [
            record(2, json!({ "from": 500, "to": null, "currency": "EUR" })),
            record(1, Value::Null),
        ]
        .into_iter()
        .collect();
        let output = render(&records);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            r#""1","Vacancy 1","Санкт-Петербург","NULL","NULL","NULL","2024-05-20","false","true","Acme, Inc.""#
        );
        assert_eq!(
            lines[2],
            r#""2","Vacancy 2","Санкт-Петербург","500","NULL","EUR","2024-05-20","false","true","Acme, Inc.""#
        );
    }

    #[test]
    fn empty_set_is_rejected() {
        let mut buffer = Vec::new();
        let err = ExportService::write_to(&HashSet::new(), &mut buffer).unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
        assert!(buffer.is_empty());
    }

    #[test]
    fn empty_set_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vacancies.csv");
        let err = ExportService::write_csv(&HashSet::new(), &path).unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
        assert!(!path.exists());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vacancies.csv");
        std::fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

        let records: HashSet<_> = [record(10, Value::Null)].into_iter().collect();
        let written = ExportService::write_csv(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, 1);
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("stale"));
    }

    #[test]
    fn same_id_rows_have_a_stable_order() {
        let variants = [
            record(7, json!({ "from": 300, "to": null, "currency": "RUR" })),
            record(7, Value::Null),
            record(7, json!({ "from": 100, "to": 200, "currency": "USD" })),
            record(3, Value::Null),
        ];

        let first = render(&variants.iter().cloned().collect());
        for _ in 0..16 {
            let reversed: HashSet<_> = variants.iter().rev().cloned().collect();
            assert_eq!(render(&reversed), first);
        }

        let lines: Vec<&str> = first.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with(r#""3","#));
        assert!(lines[2].contains(r#""NULL","NULL","NULL""#));
        assert!(lines[3].contains(r#""100","200","USD""#));
        assert!(lines[4].contains(r#""300","NULL","RUR""#));
    }
}
