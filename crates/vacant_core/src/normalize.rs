//! Mapping from each platform's native listing JSON onto [`VacancyFields`].
use serde::Deserialize;
use serde_json::Value;

use crate::vacancy::integer_salary;
use crate::{Platform, VacancyError, VacancyFields, VacancyRecord};

/// An item of the HH.ru `/vacancies` response.
#[derive(Debug, Clone, Deserialize)]
pub struct HhListing {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub salary: Option<HhSalary>,
    #[serde(default)]
    pub snippet: Option<HhSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhSalary {
    #[serde(default)]
    pub from: Option<Value>,
    #[serde(default)]
    pub to: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhSnippet {
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub responsibility: Option<String>,
}

impl HhListing {
    pub fn into_fields(self) -> VacancyFields {
        let (salary_from, salary_to, currency) = match self.salary {
            Some(salary) => (
                integer_salary(salary.from.as_ref()),
                integer_salary(salary.to.as_ref()),
                salary.currency,
            ),
            None => (None, None, None),
        };
        // Requirement wins unless it is empty.
        let description = self.snippet.and_then(|snippet| {
            snippet
                .requirement
                .filter(|text| !text.is_empty())
                .or(snippet.responsibility)
        });

        VacancyFields {
            platform: Platform::HeadHunter.name().to_string(),
            vacancy_id: self.id,
            title: self.name.unwrap_or_default(),
            url: self.alternate_url.unwrap_or_default(),
            salary_from,
            salary_to,
            currency,
            description,
        }
    }
}

/// An item of the SuperJob `/2.0/vacancies/` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SuperJobListing {
    pub id: Value,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub payment_from: Option<Value>,
    #[serde(default)]
    pub payment_to: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "vacancyRichText")]
    pub vacancy_rich_text: Option<String>,
}

impl SuperJobListing {
    pub fn into_fields(self) -> VacancyFields {
        VacancyFields {
            platform: Platform::SuperJob.name().to_string(),
            vacancy_id: self.id,
            title: self.profession.unwrap_or_default(),
            url: self.link.unwrap_or_default(),
            salary_from: integer_salary(self.payment_from.as_ref()),
            salary_to: integer_salary(self.payment_to.as_ref()),
            currency: self.currency,
            description: self.vacancy_rich_text,
        }
    }
}

/// Maps one raw listing of `platform` to a record.
///
/// A listing whose shape does not match is `InvalidListing`; an id that
/// cannot be coerced is `TypeConversion`. Either way only this listing is
/// lost, the caller decides whether to carry on.
pub fn normalize_listing(platform: Platform, raw: &Value) -> Result<VacancyRecord, VacancyError> {
    let invalid = |err: serde_json::Error| VacancyError::InvalidListing {
        platform: platform.name().to_string(),
        message: err.to_string(),
    };
    let fields = match platform {
        Platform::HeadHunter => HhListing::deserialize(raw).map_err(invalid)?.into_fields(),
        Platform::SuperJob => SuperJobListing::deserialize(raw)
            .map_err(invalid)?
            .into_fields(),
    };
    VacancyRecord::new(fields)
}
