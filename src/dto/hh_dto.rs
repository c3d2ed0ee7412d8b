use serde::{Deserialize, Deserializer};
use validator::Validate;

/// hh.ru sends vacancy ids as numeric strings; plain integers are accepted too.
fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(i) => Ok(i),
        IntOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid vacancy id: {}", s))),
    }
}

/// Search parameters for `GET /vacancies`.
#[derive(Debug, Clone, Default, Validate)]
pub struct VacancySearchQuery {
    #[validate(length(min = 1))]
    pub text: String,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub area: Option<String>,
    #[validate(range(max = 100))]
    pub per_page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationInfo {
    pub pages: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VacancyPage {
    pub items: Vec<RawVacancy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVacancy {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: i64,
    pub name: String,
    pub area: RawArea,
    #[serde(default)]
    pub salary: Option<RawSalary>,
    pub published_at: String,
    pub employer: RawEmployer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArea {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSalary {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
}

/// Anonymous employers omit the flags, so they are optional here and
/// checked when the record is built.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEmployer {
    pub name: String,
    #[serde(default)]
    pub accredited_it_employer: Option<bool>,
    #[serde(default)]
    pub trusted: Option<bool>,
}
