//! Persistence collaborator contracts for the shipment repository.
//!
//! # Responsibility
//! - Define the mapper seam performing load/save/delete against storage.
//! - Define the metadata seam providing blank entities and the mapper.
//!
//! # Invariants
//! - `load` leaves the entity blank when no record exists; it is not an error.
//! - `save` assigns `entity_id` on the passed entity when storage creates a row.

use crate::db::DbError;
use crate::model::shipment::{Shipment, ShipmentId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MapperResult<T> = Result<T, MapperError>;

/// Failure reported by a mapper implementation.
#[derive(Debug)]
pub enum MapperError {
    Db(DbError),
    /// Operation needs a persisted entity but `entity_id` is `None`.
    MissingIdentifier,
    InvalidData(String),
    /// Storage refused the operation for a non-database reason.
    Rejected(String),
}

impl Display for MapperError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingIdentifier => write!(f, "shipment has no entity id"),
            Self::InvalidData(message) => write!(f, "invalid shipment data: {message}"),
            Self::Rejected(message) => write!(f, "shipment operation rejected: {message}"),
        }
    }
}

impl Error for MapperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingIdentifier | Self::InvalidData(_) | Self::Rejected(_) => None,
        }
    }
}

impl From<DbError> for MapperError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MapperError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage mapper for shipment records.
pub trait ShipmentMapper {
    /// Populates `entity` from the record stored under `id`, if any.
    fn load(&self, entity: &mut Shipment, id: ShipmentId) -> MapperResult<()>;
    /// Inserts or updates `entity`, assigning `entity_id` on insert.
    fn save(&self, entity: &mut Shipment) -> MapperResult<()>;
    fn delete(&self, entity: &Shipment) -> MapperResult<()>;
}

/// Entity and mapper provisioning for the shipment repository.
pub trait ShipmentMetadata {
    type Mapper: ShipmentMapper;

    /// Returns a blank, unsaved shipment.
    fn new_instance(&self) -> Shipment;
    fn mapper(&self) -> &Self::Mapper;
}
