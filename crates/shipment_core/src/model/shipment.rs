//! Shipment domain model.
//!
//! # Responsibility
//! - Define the canonical shipment record persisted in `sales_shipment`.
//! - Provide blank-instance constructors used by metadata providers.
//!
//! # Invariants
//! - `entity_id` is `None` until storage assigns an identifier on save.
//! - `entity_id` is stable and never reused for another shipment.
//! - `created_at`/`updated_at` are storage-managed; callers do not set them.

use serde::{Deserialize, Serialize};

/// Integer identity of a persisted shipment.
pub type ShipmentId = i64;

/// Canonical shipment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Storage-assigned identifier. `None` for unsaved or not-found records.
    pub entity_id: Option<ShipmentId>,
    pub store_id: Option<i64>,
    /// Owning order. Zero on a blank instance.
    pub order_id: i64,
    pub customer_id: Option<i64>,
    /// Human-facing shipment number, unique when set.
    pub increment_id: Option<String>,
    pub shipment_status: Option<i64>,
    pub total_qty: Option<f64>,
    pub total_weight: Option<f64>,
    pub email_sent: bool,
    pub customer_note: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds.
    pub updated_at: Option<i64>,
}

impl Shipment {
    /// Returns an unsaved record with every optional field unset.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Returns an unsaved record attached to `order_id`.
    pub fn for_order(order_id: i64) -> Self {
        Self {
            order_id,
            ..Self::default()
        }
    }

    /// Returns the identifier, if storage has assigned one.
    pub fn id(&self) -> Option<ShipmentId> {
        self.entity_id
    }

    /// Returns whether this record has been persisted or loaded.
    pub fn is_persisted(&self) -> bool {
        self.entity_id.is_some()
    }
}
