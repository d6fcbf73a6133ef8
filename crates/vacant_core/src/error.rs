use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VacancyError {
    /// A required numeric field could not be coerced to an integer.
    #[error("cannot convert {field} value {value} to an integer")]
    TypeConversion { field: &'static str, value: String },
    /// A raw listing did not have the shape its platform promises.
    #[error("invalid {platform} listing: {message}")]
    InvalidListing { platform: String, message: String },
}
