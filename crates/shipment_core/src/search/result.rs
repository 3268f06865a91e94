//! Search result contracts.
//!
//! # Responsibility
//! - Define the filterable, paginated result seam used by `get_list`.
//! - Define the factory seam producing fresh result objects.
//!
//! # Invariants
//! - Configuring a result never executes a query.
//! - Filters accumulate in insertion order and are AND-combined.

use crate::db::DbError;
use crate::search::criteria::{Condition, SearchCriteria};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for search execution.
pub type SearchResult<T> = Result<T, SearchError>;

/// Error raised when a configured result is materialized.
#[derive(Debug)]
pub enum SearchError {
    /// Field is not a known shipment column.
    UnknownField(String),
    /// Condition value does not fit its operator.
    InvalidCondition { field: String, message: String },
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(field) => write!(f, "unknown shipment field `{field}`"),
            Self::InvalidCondition { field, message } => {
                write!(f, "invalid condition on `{field}`: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid shipment row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UnknownField(_) | Self::InvalidCondition { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SearchError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filterable, paginated shipment collection.
///
/// Implementations decide when the query runs; the repository only
/// configures the object.
pub trait ShipmentSearchResult {
    /// Adds one AND-combined constraint on `field`.
    fn add_field_to_filter(&mut self, field: &str, condition: Condition);
    fn set_search_criteria(&mut self, criteria: SearchCriteria);
    fn set_cur_page(&mut self, page: Option<u32>);
    fn set_page_size(&mut self, size: Option<u32>);

    /// Constraints added so far, in insertion order.
    fn filters(&self) -> &[(String, Condition)];
    fn search_criteria(&self) -> Option<&SearchCriteria>;
    fn cur_page(&self) -> Option<u32>;
    fn page_size(&self) -> Option<u32>;
}

/// Produces blank search results.
pub trait SearchResultFactory {
    type Output: ShipmentSearchResult;

    fn create(&self) -> Self::Output;
}
