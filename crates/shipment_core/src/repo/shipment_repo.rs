//! Shipment repository with a per-instance identity cache.
//!
//! # Responsibility
//! - Resolve shipments by id through the metadata mapper, memoizing results.
//! - Translate search criteria into a configured search result.
//! - Wrap mapper save/delete failures into repository errors.
//!
//! # Invariants
//! - After `get`/`save` succeeds the registry holds the canonical copy for that id.
//! - After `delete` succeeds the id is absent from the registry.
//! - The registry never evicts otherwise; use one repository per unit of work.
//! - Not thread-safe: cached entries are `Rc`, so the repository is `!Send`.

use crate::model::shipment::{Shipment, ShipmentId};
use crate::repo::metadata::{MapperError, ShipmentMapper, ShipmentMetadata};
use crate::search::criteria::SearchCriteria;
use crate::search::result::{SearchResultFactory, ShipmentSearchResult};
use log::{debug, info};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level error for shipment lookups and writes.
#[derive(Debug)]
pub enum RepoError {
    /// Missing, empty or zero identifier.
    InvalidArgument(String),
    NotFound(ShipmentId),
    CouldNotSave(MapperError),
    CouldNotDelete(MapperError),
    /// Mapper failed while loading for `get`.
    Storage(MapperError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFound(id) => write!(f, "shipment not found: {id}"),
            Self::CouldNotSave(_) => write!(f, "could not save shipment"),
            Self::CouldNotDelete(_) => write!(f, "could not delete shipment"),
            Self::Storage(err) => write!(f, "could not load shipment: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CouldNotSave(err) | Self::CouldNotDelete(err) | Self::Storage(err) => Some(err),
            Self::InvalidArgument(_) | Self::NotFound(_) => None,
        }
    }
}

/// Parses a caller-supplied shipment id.
///
/// Empty, zero and non-numeric input is rejected the same way `get` rejects
/// a zero id.
pub fn parse_shipment_id(raw: &str) -> RepoResult<ShipmentId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidArgument("id required".to_string()));
    }
    let id = trimmed
        .parse::<ShipmentId>()
        .map_err(|_| RepoError::InvalidArgument(format!("invalid shipment id `{trimmed}`")))?;
    if id == 0 {
        return Err(RepoError::InvalidArgument("id required".to_string()));
    }
    Ok(id)
}

/// Data-access repository for shipment records.
pub struct ShipmentRepository<M, F>
where
    M: ShipmentMetadata,
    F: SearchResultFactory,
{
    metadata: M,
    search_result_factory: F,
    registry: HashMap<ShipmentId, Rc<Shipment>>,
}

impl<M, F> ShipmentRepository<M, F>
where
    M: ShipmentMetadata,
    F: SearchResultFactory,
{
    pub fn new(metadata: M, search_result_factory: F) -> Self {
        Self {
            metadata,
            search_result_factory,
            registry: HashMap::new(),
        }
    }

    /// Loads a shipment by id, serving repeated lookups from the registry.
    ///
    /// # Errors
    /// - `InvalidArgument` when `id` is zero; no load is attempted.
    /// - `NotFound` when the mapper finds no record.
    /// - `Storage` when the mapper load itself fails.
    pub fn get(&mut self, id: ShipmentId) -> RepoResult<Rc<Shipment>> {
        if id == 0 {
            return Err(RepoError::InvalidArgument("id required".to_string()));
        }

        if let Some(cached) = self.registry.get(&id) {
            debug!("event=shipment_get module=repo status=ok cache=hit id={id}");
            return Ok(Rc::clone(cached));
        }

        let mut entity = self.metadata.new_instance();
        self.metadata
            .mapper()
            .load(&mut entity, id)
            .map_err(RepoError::Storage)?;
        if entity.entity_id.is_none() {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=shipment_get module=repo status=ok cache=miss id={id}");
        let entity = Rc::new(entity);
        self.registry.insert(id, Rc::clone(&entity));
        Ok(entity)
    }

    /// Builds a search result configured from `criteria`.
    ///
    /// Every filter of every group becomes one constraint, using `eq` when
    /// the filter has no condition type. The query is not executed here.
    pub fn get_list(&self, criteria: &SearchCriteria) -> F::Output {
        let mut search_result = self.search_result_factory.create();

        for filter_group in &criteria.filter_groups {
            for filter in &filter_group.filters {
                search_result.add_field_to_filter(&filter.field, filter.to_condition());
            }
        }
        search_result.set_search_criteria(criteria.clone());
        search_result.set_cur_page(criteria.current_page);
        search_result.set_page_size(criteria.page_size);

        search_result
    }

    /// Deletes `entity` and drops its id from the registry.
    ///
    /// Returns `true` on success; a missing row is not distinguished.
    pub fn delete(&mut self, entity: &Shipment) -> RepoResult<bool> {
        self.metadata
            .mapper()
            .delete(entity)
            .map_err(RepoError::CouldNotDelete)?;

        if let Some(id) = entity.entity_id {
            self.registry.remove(&id);
            info!("event=shipment_delete module=repo status=ok id={id}");
        }
        Ok(true)
    }

    /// Resolves `id` via [`Self::get`] and deletes the result.
    pub fn delete_by_id(&mut self, id: ShipmentId) -> RepoResult<bool> {
        let entity = self.get(id)?;
        self.delete(&entity)
    }

    /// Persists `entity` and caches a canonical copy under its id.
    ///
    /// The mapper may assign `entity_id` and timestamps on `entity` itself;
    /// the returned `Rc` is the instance later `get` calls hand out.
    ///
    /// # Errors
    /// - `CouldNotSave(InvalidData)` when `entity_id` is `Some(0)`, which `get`
    ///   rejects; the mapper is not called.
    /// - `CouldNotSave` wrapping the mapper failure, or `MissingIdentifier`
    ///   when the mapper reported success without assigning an id.
    pub fn save(&mut self, entity: &mut Shipment) -> RepoResult<Rc<Shipment>> {
        if entity.entity_id == Some(0) {
            return Err(RepoError::CouldNotSave(MapperError::InvalidData(
                "entity_id 0 is reserved".to_string(),
            )));
        }

        self.metadata
            .mapper()
            .save(entity)
            .map_err(RepoError::CouldNotSave)?;
        let id = entity
            .entity_id
            .ok_or(RepoError::CouldNotSave(MapperError::MissingIdentifier))?;

        let canonical = Rc::new(entity.clone());
        self.registry.insert(id, Rc::clone(&canonical));
        info!("event=shipment_save module=repo status=ok id={id}");
        Ok(canonical)
    }

    /// Returns a blank shipment from the metadata provider; the registry is untouched.
    pub fn create(&self) -> Shipment {
        self.metadata.new_instance()
    }

    pub fn is_cached(&self, id: ShipmentId) -> bool {
        self.registry.contains_key(&id)
    }

    pub fn cached_len(&self) -> usize {
        self.registry.len()
    }
}
