//! Domain model for shipment records.
//!
//! # Responsibility
//! - Define canonical data structures used by repository and storage code.
//!
//! # Invariants
//! - Every persisted shipment is identified by a stable `ShipmentId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod shipment;
