use crate::VacancyRecord;

/// Salary bounds; `None` leaves that side unbounded.
///
/// Both bounds are exclusive: a salary equal to `min` or `max` is outside
/// the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl SalaryRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether a record with this `avg_salary` passes the filter.
    ///
    /// Zero means "no salary known" and never passes, even when unbounded.
    pub fn admits(&self, avg_salary: i64) -> bool {
        if avg_salary == 0 {
            return false;
        }
        if self.min.is_some_and(|min| avg_salary <= min) {
            return false;
        }
        if self.max.is_some_and(|max| avg_salary >= max) {
            return false;
        }
        true
    }
}

pub trait VacancyFilter: Send + Sync {
    fn filter_vacancies(&self, vacancies: &[VacancyRecord]) -> Vec<VacancyRecord>;
}

/// Keeps the records whose `avg_salary` lies strictly inside a [`SalaryRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalaryRangeFilter {
    range: SalaryRange,
}

impl SalaryRangeFilter {
    pub fn new(range: SalaryRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> SalaryRange {
        self.range
    }
}

impl VacancyFilter for SalaryRangeFilter {
    fn filter_vacancies(&self, vacancies: &[VacancyRecord]) -> Vec<VacancyRecord> {
        filter_by_salary(vacancies, self.range)
    }
}

/// Order-preserving salary filter. The input is left untouched.
pub fn filter_by_salary(vacancies: &[VacancyRecord], range: SalaryRange) -> Vec<VacancyRecord> {
    vacancies
        .iter()
        .filter(|vacancy| range.admits(vacancy.avg_salary()))
        .cloned()
        .collect()
}
