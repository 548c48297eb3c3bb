//! Request validation errors.

use thiserror::Error;

/// Problems with a search request, caught before any feed is fetched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Keyword, start date or end date was missing or blank.
    #[error("Please fill in the keyword, start date and end date.")]
    MissingFields,

    /// A date was not in `YYYY-MM-DD` form.
    #[error("Invalid date '{0}', please use the YYYY-MM-DD format.")]
    InvalidDate(String),

    /// The start date is after the end date.
    #[error("The start date cannot be later than the end date.")]
    InvertedRange,

    /// The logic field was neither AND nor OR.
    #[error("Unknown logic mode '{0}', expected AND or OR.")]
    InvalidLogic(String),
}
