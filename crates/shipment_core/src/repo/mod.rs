//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the collaborator seams the shipment repository is composed with.
//! - Isolate SQLite query details from repository orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidArgument`, `NotFound`)
//!   and wrap storage failures instead of swallowing them.

pub mod metadata;
pub mod shipment_repo;
pub mod sqlite_mapper;

use crate::db::DbResult;
use crate::search::sqlite::SqliteShipmentSearchResultFactory;
use rusqlite::Connection;
use shipment_repo::ShipmentRepository;
use sqlite_mapper::SqliteShipmentMetadata;

/// Shipment repository wired to SQLite collaborators.
pub type SqliteShipmentRepository<'conn> =
    ShipmentRepository<SqliteShipmentMetadata<'conn>, SqliteShipmentSearchResultFactory<'conn>>;

/// Builds a repository over a bootstrapped connection.
pub fn sqlite_shipment_repository(conn: &Connection) -> DbResult<SqliteShipmentRepository<'_>> {
    Ok(ShipmentRepository::new(
        SqliteShipmentMetadata::try_new(conn)?,
        SqliteShipmentSearchResultFactory::new(conn),
    ))
}
