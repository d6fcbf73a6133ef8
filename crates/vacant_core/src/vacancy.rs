use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::VacancyError;

/// Maximum number of characters kept from a listing description.
pub const DESCRIPTION_LIMIT: usize = 200;

/// Stored in place of a description the source did not provide.
pub const MISSING_DESCRIPTION: &str = "Missing description";

const SEPARATOR: &str = "___________________________________________________________";

/// Constructor arguments for a [`VacancyRecord`].
///
/// `vacancy_id` stays an untyped JSON value until construction because the
/// platforms disagree on it (HH.ru sends strings, SuperJob sends numbers).
#[derive(Debug, Clone, PartialEq)]
pub struct VacancyFields {
    pub platform: String,
    pub vacancy_id: Value,
    pub title: String,
    pub url: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: Option<String>,
    pub description: Option<String>,
}

/// A record as read back from the store.
///
/// Looser than [`VacancyFields`]: a salary that is not a whole JSON integer
/// counts as absent and a null title or url becomes empty, so only an id
/// that cannot be coerced loses the record. A stored `avg_salary` is
/// ignored and recomputed.
#[derive(Debug, Deserialize)]
struct StoredFields {
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    vacancy_id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    salary_from: Option<Value>,
    #[serde(default)]
    salary_to: Option<Value>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<StoredFields> for VacancyFields {
    fn from(stored: StoredFields) -> Self {
        Self {
            platform: stored.platform.unwrap_or_default(),
            vacancy_id: stored.vacancy_id,
            title: stored.title.unwrap_or_default(),
            url: stored.url.unwrap_or_default(),
            salary_from: integer_salary(stored.salary_from.as_ref()),
            salary_to: integer_salary(stored.salary_to.as_ref()),
            currency: stored.currency,
            description: stored.description,
        }
    }
}

impl VacancyFields {
    pub fn new(
        platform: impl Into<String>,
        vacancy_id: impl Into<Value>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            vacancy_id: vacancy_id.into(),
            title: title.into(),
            url: url.into(),
            salary_from: None,
            salary_to: None,
            currency: None,
            description: None,
        }
    }

    pub fn salary(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.salary_from = from;
        self.salary_to = to;
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One job listing, normalized across platforms.
///
/// Immutable once built. `PartialEq` here is full structural equality over
/// every field, which is what the store uses to find a record to delete.
/// Salary-based comparison lives in [`crate::compare_by_salary`] and
/// [`crate::BySalary`] instead, where two records with different titles but
/// the same `avg_salary` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VacancyRecord {
    platform: String,
    vacancy_id: i64,
    title: String,
    url: String,
    salary_from: Option<i64>,
    salary_to: Option<i64>,
    currency: Option<String>,
    description: String,
    avg_salary: i64,
}

impl VacancyRecord {
    /// Builds a record, coercing the id and deriving `avg_salary`.
    ///
    /// Fails with [`VacancyError::TypeConversion`] when the id is not an
    /// integer, an integral string or a finite float.
    pub fn new(fields: VacancyFields) -> Result<Self, VacancyError> {
        let vacancy_id = coerce_vacancy_id(&fields.vacancy_id)?;
        let avg_salary = derive_avg_salary(fields.salary_from, fields.salary_to);
        Ok(Self {
            platform: fields.platform,
            vacancy_id,
            title: fields.title,
            url: fields.url,
            salary_from: fields.salary_from,
            salary_to: fields.salary_to,
            currency: fields.currency,
            description: truncate_description(fields.description),
            avg_salary,
        })
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn vacancy_id(&self) -> i64 {
        self.vacancy_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn salary_from(&self) -> Option<i64> {
        self.salary_from
    }

    pub fn salary_to(&self) -> Option<i64> {
        self.salary_to
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The higher of the two salary bounds, or the only one present, or 0.
    ///
    /// Despite the name this is a maximum, not a mean. The salary filter
    /// and every salary comparison are defined on this value, so it is kept
    /// as-is rather than turned into an average.
    pub fn avg_salary(&self) -> i64 {
        self.avg_salary
    }

    /// Flat JSON object in the store layout.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl TryFrom<VacancyFields> for VacancyRecord {
    type Error = VacancyError;

    fn try_from(fields: VacancyFields) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl<'de> Deserialize<'de> for VacancyRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredFields::deserialize(deserializer)?;
        Self::new(stored.into()).map_err(de::Error::custom)
    }
}

impl fmt::Display for VacancyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let currency = OrNone(self.currency.as_deref());
        writeln!(f, "Platform: {}", self.platform)?;
        writeln!(f, "ID: {}", self.vacancy_id)?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(
            f,
            "Salary: {} {currency} - {} {currency} ",
            OrNone(self.salary_from),
            OrNone(self.salary_to),
        )?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Link: {}", self.url)?;
        writeln!(f, "{SEPARATOR}")
    }
}

/// Renders an absent value as `None` in the display block.
struct OrNone<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for OrNone<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

/// `max(from, to)` when both are present, the present one otherwise, else 0.
pub fn derive_avg_salary(salary_from: Option<i64>, salary_to: Option<i64>) -> i64 {
    match (salary_from, salary_to) {
        (Some(from), Some(to)) => from.max(to),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => 0,
    }
}

/// Coerces a raw id into an integer.
///
/// Accepts JSON integers, strings holding an integer (surrounding
/// whitespace allowed) and finite floats, which truncate toward zero.
pub fn coerce_vacancy_id(value: &Value) -> Result<i64, VacancyError> {
    let coerced = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| VacancyError::TypeConversion {
        field: "vacancy_id",
        value: value.to_string(),
    })
}

/// Only whole JSON integers count as a salary.
pub(crate) fn integer_salary(value: Option<&Value>) -> Option<i64> {
    value.and_then(Value::as_i64)
}

fn truncate_description(description: Option<String>) -> String {
    match description {
        None => MISSING_DESCRIPTION.to_string(),
        Some(text) => match text.char_indices().nth(DESCRIPTION_LIMIT) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let cyrillic = "ж".repeat(DESCRIPTION_LIMIT + 5);
        let kept = truncate_description(Some(cyrillic));
        assert_eq!(kept.chars().count(), DESCRIPTION_LIMIT);
    }

    #[test]
    fn exactly_limit_is_kept_whole() {
        let text = "a".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(Some(text.clone())), text);
    }

    #[test]
    fn non_integer_salaries_are_absent() {
        use serde_json::json;
        assert_eq!(integer_salary(Some(&json!(100))), Some(100));
        assert_eq!(integer_salary(Some(&json!(100.5))), None);
        assert_eq!(integer_salary(Some(&json!(50000.0))), None);
        assert_eq!(integer_salary(Some(&json!("100"))), None);
        assert_eq!(integer_salary(Some(&json!(true))), None);
        assert_eq!(integer_salary(Some(&Value::Null)), None);
        assert_eq!(integer_salary(None), None);
    }

    #[test]
    fn none_renders_as_none() {
        assert_eq!(OrNone::<i64>(None).to_string(), "None");
        assert_eq!(OrNone(Some(5)).to_string(), "5");
    }
}
