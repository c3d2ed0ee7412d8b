use chrono::{DateTime, FixedOffset};

use crate::dto::hh_dto::{RawSalary, RawVacancy};
use crate::error::{Error, Result};
use crate::utils::time::{parse_published_at, to_calendar_date};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Salary {
    start: Option<i64>,
    to: Option<i64>,
    currency: Option<String>,
}

impl Salary {
    pub fn start(&self) -> Option<i64> {
        self.start
    }

    pub fn to(&self) -> Option<i64> {
        self.to
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

impl From<RawSalary> for Salary {
    fn from(raw: RawSalary) -> Self {
        Self {
            start: raw.from,
            to: raw.to,
            currency: raw.currency,
        }
    }
}

/// One validated vacancy listing.
///
/// Fields are read-only once built; equality and hashing cover every field,
/// so collecting into a `HashSet` drops exact duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VacancyRecord {
    id: i64,
    vacancy_name: String,
    city_name: String,
    salary_full: Option<Salary>,
    published_at: DateTime<FixedOffset>,
    accredited_it_employer: bool,
    trusted_employer: bool,
    employer_name: String,
}

impl VacancyRecord {
    /// Output columns in declared field order, with the salary flattened.
    ///
    /// The header intentionally departs from the field names: `salary_full`
    /// becomes `salary_start`, `salary_to` and `salary_currency`, so a missing
    /// bound is written as the null sentinel in its own cell.
    pub const COLUMNS: [&'static str; 10] = [
        "id",
        "vacancy_name",
        "city_name",
        "salary_start",
        "salary_to",
        "salary_currency",
        "published_at",
        "accredited_it_employer",
        "trusted_employer",
        "employer_name",
    ];

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn vacancy_name(&self) -> &str {
        &self.vacancy_name
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    pub fn salary_full(&self) -> Option<&Salary> {
        self.salary_full.as_ref()
    }

    pub fn published_at(&self) -> DateTime<FixedOffset> {
        self.published_at
    }

    pub fn accredited_it_employer(&self) -> bool {
        self.accredited_it_employer
    }

    pub fn trusted_employer(&self) -> bool {
        self.trusted_employer
    }

    pub fn employer_name(&self) -> &str {
        &self.employer_name
    }

    /// Cell values aligned with [`Self::COLUMNS`]; `None` marks a null.
    pub fn to_row(&self) -> [Option<String>; 10] {
        let salary = self.salary_full.as_ref();
        [
            Some(self.id.to_string()),
            Some(self.vacancy_name.clone()),
            Some(self.city_name.clone()),
            salary.and_then(|s| s.start).map(|v| v.to_string()),
            salary.and_then(|s| s.to).map(|v| v.to_string()),
            salary.and_then(|s| s.currency.clone()),
            Some(to_calendar_date(&self.published_at)),
            Some(self.accredited_it_employer.to_string()),
            Some(self.trusted_employer.to_string()),
            Some(self.employer_name.clone()),
        ]
    }
}

impl TryFrom<RawVacancy> for VacancyRecord {
    type Error = Error;

    fn try_from(raw: RawVacancy) -> Result<Self> {
        let id = raw.id;
        let published_at = parse_published_at(&raw.published_at).ok_or_else(|| {
            Error::invalid_vacancy(id, format!("unparseable published_at {:?}", raw.published_at))
        })?;
        let accredited_it_employer = raw
            .employer
            .accredited_it_employer
            .ok_or_else(|| Error::invalid_vacancy(id, "employer.accredited_it_employer is missing"))?;
        let trusted_employer = raw
            .employer
            .trusted
            .ok_or_else(|| Error::invalid_vacancy(id, "employer.trusted is missing"))?;

        Ok(Self {
            id,
            vacancy_name: raw.name,
            city_name: raw.area.name,
            salary_full: raw.salary.map(Salary::from),
            published_at,
            accredited_it_employer,
            trusted_employer,
            employer_name: raw.employer.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashSet;

    fn raw(value: Value) -> RawVacancy {
        serde_json::from_value(value).unwrap()
    }

    fn item(id: &str, salary: Value) -> Value {
        json!({
            "id": id,
            "name": "Rust engineer",
            "area": { "name": "Москва" },
            "salary": salary,
            "published_at": "2024-03-01T10:15:00+0300",
            "employer": {
                "name": "Acme",
                "accredited_it_employer": true,
                "trusted": false
            }
        })
    }

    #[test]
    fn row_round_trips_raw_fields() {
        let record = VacancyRecord::try_from(raw(item(
            "42",
            json!({ "from": 1000, "to": null, "currency": "RUR" }),
        )))
        .unwrap();

        assert_eq!(
            record.to_row(),
            [
                Some("42".to_string()),
                Some("Rust engineer".to_string()),
                Some("Москва".to_string()),
                Some("1000".to_string()),
                None,
                Some("RUR".to_string()),
                Some("2024-03-01".to_string()),
                Some("true".to_string()),
                Some("false".to_string()),
                Some("Acme".to_string()),
            ]
        );
        assert_eq!(record.salary_full().and_then(Salary::start), Some(1000));
        assert_eq!(record.published_at().to_rfc3339(), "2024-03-01T10:15:00+03:00");
    }

    #[test]
    fn missing_salary_nulls_all_salary_cells() {
        let record = VacancyRecord::try_from(raw(item("1", Value::Null))).unwrap();
        let row = record.to_row();
        assert!(record.salary_full().is_none());
        assert!(row[3..6].iter().all(Option::is_none));
    }

    #[test]
    fn identical_items_collapse_in_set() {
        let a = VacancyRecord::try_from(raw(item("5", Value::Null))).unwrap();
        let b = VacancyRecord::try_from(raw(item("5", Value::Null))).unwrap();
        let c = VacancyRecord::try_from(raw(item("6", Value::Null))).unwrap();
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn same_id_with_different_fields_stays_distinct() {
        let a = VacancyRecord::try_from(raw(item("5", Value::Null))).unwrap();
        let b = VacancyRecord::try_from(raw(item(
            "5",
            json!({ "from": null, "to": 3000, "currency": "USD" }),
        )))
        .unwrap();

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn missing_employer_flag_is_invalid() {
        let mut value = item("9", Value::Null);
        value["employer"] = json!({ "name": "Anonymous" });
        let err = VacancyRecord::try_from(raw(value)).unwrap_err();
        assert!(matches!(err, Error::InvalidVacancy { id: 9, .. }));
    }

    #[test]
    fn bad_timestamp_is_invalid() {
        let mut value = item("3", Value::Null);
        value["published_at"] = json!("01.03.2024");
        let err = VacancyRecord::try_from(raw(value)).unwrap_err();
        assert!(matches!(err, Error::InvalidVacancy { id: 3, reason } if reason.contains("published_at")));
    }

    #[test]
    fn columns_follow_row_layout() {
        assert_eq!(VacancyRecord::COLUMNS.len(), 10);
        assert_eq!(VacancyRecord::COLUMNS[0], "id");
        assert_eq!(VacancyRecord::COLUMNS[6], "published_at");
    }

    #[test]
    fn salary_is_split_into_three_columns() {
        assert_eq!(
            VacancyRecord::COLUMNS[3..6],
            ["salary_start", "salary_to", "salary_currency"]
        );
        assert!(!VacancyRecord::COLUMNS.contains(&"salary_full"));

        let row = VacancyRecord::try_from(raw(item(
            "5",
            json!({ "from": 10, "to": null, "currency": "KZT" }),
        )))
        .unwrap()
        .to_row();
        assert_eq!(row[3].as_deref(), Some("10"));
        assert_eq!(row[4], None);
        assert_eq!(row[5].as_deref(), Some("KZT"));
    }
}
