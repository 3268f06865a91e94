//! SQLite-backed shipment mapper and metadata provider.
//!
//! # Responsibility
//! - Keep `sales_shipment` SQL inside the persistence boundary.
//! - Provide the production `ShipmentMetadata` implementation.
//!
//! # Invariants
//! - Only bootstrapped connections are accepted (`ensure_connection_ready`).
//! - `save` is an upsert keyed by `entity_id`; `NULL` ids are assigned by SQLite.
//! - Storage-managed timestamps are refreshed on the entity after save.

use crate::db::{ensure_connection_ready, DbResult};
use crate::model::shipment::{Shipment, ShipmentId};
use crate::repo::metadata::{MapperError, MapperResult, ShipmentMapper, ShipmentMetadata};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Columns of `sales_shipment`, usable in filters and sort orders.
pub(crate) const SHIPMENT_COLUMNS: &[&str] = &[
    "entity_id",
    "store_id",
    "order_id",
    "customer_id",
    "increment_id",
    "shipment_status",
    "total_qty",
    "total_weight",
    "email_sent",
    "customer_note",
    "created_at",
    "updated_at",
];

pub(crate) const SHIPMENT_SELECT_SQL: &str = "SELECT
    entity_id,
    store_id,
    order_id,
    customer_id,
    increment_id,
    shipment_status,
    total_qty,
    total_weight,
    email_sent,
    customer_note,
    created_at,
    updated_at
FROM sales_shipment";

/// SQLite mapper over the `sales_shipment` table.
pub struct SqliteShipmentMapper<'conn> {
    conn: &'conn Connection,
}

impl ShipmentMapper for SqliteShipmentMapper<'_> {
    fn load(&self, entity: &mut Shipment, id: ShipmentId) -> MapperResult<()> {
        let loaded = self
            .conn
            .query_row(
                &format!("{SHIPMENT_SELECT_SQL} WHERE entity_id = ?1;"),
                [id],
                parse_shipment_row,
            )
            .optional()?;

        if let Some(loaded) = loaded {
            *entity = loaded;
        }
        Ok(())
    }

    fn save(&self, entity: &mut Shipment) -> MapperResult<()> {
        self.conn.execute(
            "INSERT INTO sales_shipment (
                entity_id,
                store_id,
                order_id,
                customer_id,
                increment_id,
                shipment_status,
                total_qty,
                total_weight,
                email_sent,
                customer_note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(entity_id) DO UPDATE SET
                store_id = excluded.store_id,
                order_id = excluded.order_id,
                customer_id = excluded.customer_id,
                increment_id = excluded.increment_id,
                shipment_status = excluded.shipment_status,
                total_qty = excluded.total_qty,
                total_weight = excluded.total_weight,
                email_sent = excluded.email_sent,
                customer_note = excluded.customer_note,
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER);",
            params![
                entity.entity_id,
                entity.store_id,
                entity.order_id,
                entity.customer_id,
                entity.increment_id.as_deref(),
                entity.shipment_status,
                entity.total_qty,
                entity.total_weight,
                entity.email_sent,
                entity.customer_note.as_deref(),
            ],
        )?;

        let id = match entity.entity_id {
            Some(id) => id,
            None => self.conn.last_insert_rowid(),
        };

        let (created_at, updated_at) = self.conn.query_row(
            "SELECT created_at, updated_at FROM sales_shipment WHERE entity_id = ?1;",
            [id],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;

        entity.entity_id = Some(id);
        entity.created_at = Some(created_at);
        entity.updated_at = Some(updated_at);
        Ok(())
    }

    fn delete(&self, entity: &Shipment) -> MapperResult<()> {
        let id = entity.entity_id.ok_or(MapperError::MissingIdentifier)?;
        self.conn
            .execute("DELETE FROM sales_shipment WHERE entity_id = ?1;", [id])?;
        Ok(())
    }
}

/// Production metadata provider backed by one SQLite connection.
pub struct SqliteShipmentMetadata<'conn> {
    mapper: SqliteShipmentMapper<'conn>,
}

impl<'conn> SqliteShipmentMetadata<'conn> {
    /// Constructs a provider from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            mapper: SqliteShipmentMapper { conn },
        })
    }
}

impl<'conn> ShipmentMetadata for SqliteShipmentMetadata<'conn> {
    type Mapper = SqliteShipmentMapper<'conn>;

    fn new_instance(&self) -> Shipment {
        Shipment::blank()
    }

    fn mapper(&self) -> &Self::Mapper {
        &self.mapper
    }
}

pub(crate) fn parse_shipment_row(row: &Row<'_>) -> rusqlite::Result<Shipment> {
    Ok(Shipment {
        entity_id: Some(row.get("entity_id")?),
        store_id: row.get("store_id")?,
        order_id: row.get("order_id")?,
        customer_id: row.get("customer_id")?,
        increment_id: row.get("increment_id")?,
        shipment_status: row.get("shipment_status")?,
        total_qty: row.get("total_qty")?,
        total_weight: row.get("total_weight")?,
        email_sent: row.get("email_sent")?,
        customer_note: row.get("customer_note")?,
        created_at: Some(row.get("created_at")?),
        updated_at: Some(row.get("updated_at")?),
    })
}

#[cfg(test)]
mod tests {
    use super::{SqliteShipmentMetadata, SHIPMENT_COLUMNS};
    use crate::db::{open_db_in_memory, DbError};
    use crate::model::shipment::Shipment;
    use crate::repo::metadata::{MapperError, ShipmentMapper, ShipmentMetadata};
    use rusqlite::Connection;

    #[test]
    fn save_assigns_id_and_timestamps() {
        let conn = open_db_in_memory().expect("open in-memory db");
        let metadata = SqliteShipmentMetadata::try_new(&conn).expect("build sqlite metadata");

        let mut shipment = Shipment::for_order(10);
        metadata.mapper().save(&mut shipment).unwrap();

        assert!(shipment.entity_id.unwrap() > 0);
        assert!(shipment.created_at.is_some());
        assert!(shipment.updated_at.is_some());
    }

    #[test]
    fn load_missing_row_leaves_entity_blank() {
        let conn = open_db_in_memory().expect("open in-memory db");
        let metadata = SqliteShipmentMetadata::try_new(&conn).expect("build sqlite metadata");

        let mut shipment = metadata.new_instance();
        metadata.mapper().load(&mut shipment, 999).unwrap();
        assert_eq!(shipment, Shipment::blank());
    }

    #[test]
    fn delete_without_id_is_rejected() {
        let conn = open_db_in_memory().expect("open in-memory db");
        let metadata = SqliteShipmentMetadata::try_new(&conn).expect("build sqlite metadata");

        let err = metadata.mapper().delete(&Shipment::blank()).unwrap_err();
        assert!(matches!(err, MapperError::MissingIdentifier));
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().expect("open raw in-memory connection");
        let result = SqliteShipmentMetadata::try_new(&conn);
        assert!(matches!(
            result,
            Err(DbError::UninitializedConnection {
                actual_version: 0,
                ..
            })
        ));
    }

    #[test]
    fn column_whitelist_matches_select_list() {
        let conn = open_db_in_memory().expect("open in-memory db");
        let stmt = conn.prepare(super::SHIPMENT_SELECT_SQL).unwrap();
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(names, SHIPMENT_COLUMNS);
    }
}
