//! Vacant core: the normalized vacancy model, salary filtering and the
//! per-platform field mapping. Pure, no IO.
mod error;
mod filter;
mod normalize;
mod ordering;
mod platform;
mod vacancy;

pub use error::VacancyError;
pub use filter::{filter_by_salary, SalaryRange, SalaryRangeFilter, VacancyFilter};
pub use normalize::{normalize_listing, HhListing, HhSalary, HhSnippet, SuperJobListing};
pub use ordering::{compare_by_salary, same_salary, BySalary};
pub use platform::{group_by_platform, ParsePlatformError, Platform, PlatformVacancies};
pub use vacancy::{
    coerce_vacancy_id, derive_avg_salary, VacancyFields, VacancyRecord, DESCRIPTION_LIMIT,
    MISSING_DESCRIPTION,
};
