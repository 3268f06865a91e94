//! Search criteria and result collections.
//!
//! # Responsibility
//! - Define criteria value objects and the search result seam.
//! - Provide the SQLite-backed result used in production.

pub mod criteria;
pub mod result;
pub mod sqlite;
