//! In-memory collaborators for repository tests.

#![allow(dead_code)]

use shipment_core::{
    Condition, MapperError, MapperResult, SearchCriteria, SearchResultFactory, Shipment,
    ShipmentId, ShipmentMapper, ShipmentMetadata, ShipmentRepository, ShipmentSearchResult,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Mapper over a `HashMap` with call counters and failure switches.
#[derive(Default)]
pub struct InMemoryMapper {
    rows: RefCell<HashMap<ShipmentId, Shipment>>,
    last_id: Cell<ShipmentId>,
    pub load_calls: Cell<usize>,
    pub save_calls: Cell<usize>,
    pub delete_calls: Cell<usize>,
    pub fail_load: RefCell<Option<String>>,
    pub fail_save: RefCell<Option<String>>,
    pub fail_delete: RefCell<Option<String>>,
}

impl InMemoryMapper {
    /// Stores `shipment` directly, bypassing counters.
    pub fn seed(&self, shipment: Shipment) {
        let id = shipment.entity_id.expect("seeded shipments need an id");
        self.last_id.set(self.last_id.get().max(id));
        self.rows.borrow_mut().insert(id, shipment);
    }

    pub fn contains(&self, id: ShipmentId) -> bool {
        self.rows.borrow().contains_key(&id)
    }
}

impl ShipmentMapper for InMemoryMapper {
    fn load(&self, entity: &mut Shipment, id: ShipmentId) -> MapperResult<()> {
        self.load_calls.set(self.load_calls.get() + 1);
        if let Some(message) = self.fail_load.borrow().clone() {
            return Err(MapperError::Rejected(message));
        }
        if let Some(row) = self.rows.borrow().get(&id) {
            *entity = row.clone();
        }
        Ok(())
    }

    fn save(&self, entity: &mut Shipment) -> MapperResult<()> {
        self.save_calls.set(self.save_calls.get() + 1);
        if let Some(message) = self.fail_save.borrow().clone() {
            return Err(MapperError::Rejected(message));
        }
        let id = match entity.entity_id {
            Some(id) => id,
            None => self.last_id.get() + 1,
        };
        self.last_id.set(self.last_id.get().max(id));
        entity.entity_id = Some(id);
        self.rows.borrow_mut().insert(id, entity.clone());
        Ok(())
    }

    fn delete(&self, entity: &Shipment) -> MapperResult<()> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        if let Some(message) = self.fail_delete.borrow().clone() {
            return Err(MapperError::Rejected(message));
        }
        let id = entity.entity_id.ok_or(MapperError::MissingIdentifier)?;
        self.rows.borrow_mut().remove(&id);
        Ok(())
    }
}

/// Metadata provider sharing its mapper with the test body.
pub struct InMemoryMetadata {
    mapper: Rc<InMemoryMapper>,
}

impl ShipmentMetadata for InMemoryMetadata {
    type Mapper = InMemoryMapper;

    fn new_instance(&self) -> Shipment {
        Shipment::blank()
    }

    fn mapper(&self) -> &Self::Mapper {
        &self.mapper
    }
}

/// Search result that only records how it was configured.
#[derive(Debug, Default)]
pub struct RecordingSearchResult {
    filters: Vec<(String, Condition)>,
    criteria: Option<SearchCriteria>,
    cur_page: Option<u32>,
    page_size: Option<u32>,
}

impl ShipmentSearchResult for RecordingSearchResult {
    fn add_field_to_filter(&mut self, field: &str, condition: Condition) {
        self.filters.push((field.to_string(), condition));
    }

    fn set_search_criteria(&mut self, criteria: SearchCriteria) {
        self.criteria = Some(criteria);
    }

    fn set_cur_page(&mut self, page: Option<u32>) {
        self.cur_page = page;
    }

    fn set_page_size(&mut self, size: Option<u32>) {
        self.page_size = size;
    }

    fn filters(&self) -> &[(String, Condition)] {
        &self.filters
    }

    fn search_criteria(&self) -> Option<&SearchCriteria> {
        self.criteria.as_ref()
    }

    fn cur_page(&self) -> Option<u32> {
        self.cur_page
    }

    fn page_size(&self) -> Option<u32> {
        self.page_size
    }
}

#[derive(Default)]
pub struct RecordingSearchResultFactory {
    pub created: Cell<usize>,
}

impl SearchResultFactory for RecordingSearchResultFactory {
    type Output = RecordingSearchResult;

    fn create(&self) -> Self::Output {
        self.created.set(self.created.get() + 1);
        RecordingSearchResult::default()
    }
}

pub type TestRepository = ShipmentRepository<InMemoryMetadata, RecordingSearchResultFactory>;

/// Returns a repository plus a handle on its mapper for assertions.
pub fn in_memory_repository() -> (TestRepository, Rc<InMemoryMapper>) {
    let mapper = Rc::new(InMemoryMapper::default());
    let metadata = InMemoryMetadata {
        mapper: Rc::clone(&mapper),
    };
    (
        ShipmentRepository::new(metadata, RecordingSearchResultFactory::default()),
        mapper,
    )
}

pub fn shipment_with_id(id: ShipmentId, order_id: i64) -> Shipment {
    Shipment {
        entity_id: Some(id),
        ..Shipment::for_order(order_id)
    }
}
