//! Shipment data access for the order-management core.
//! This crate owns the shipment repository, its collaborator seams and the
//! SQLite implementations of those seams.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::shipment::{Shipment, ShipmentId};
pub use repo::metadata::{MapperError, MapperResult, ShipmentMapper, ShipmentMetadata};
pub use repo::shipment_repo::{parse_shipment_id, RepoError, RepoResult, ShipmentRepository};
pub use repo::sqlite_mapper::{SqliteShipmentMapper, SqliteShipmentMetadata};
pub use repo::{sqlite_shipment_repository, SqliteShipmentRepository};
pub use search::criteria::{
    Condition, ConditionType, Filter, FilterGroup, FilterValue, SearchCriteria, SortDirection,
    SortOrder,
};
pub use search::result::{SearchError, SearchResult, SearchResultFactory, ShipmentSearchResult};
pub use search::sqlite::{SqliteShipmentSearchResult, SqliteShipmentSearchResultFactory};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
