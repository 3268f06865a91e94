//! SQLite-backed shipment search result.
//!
//! # Responsibility
//! - Record filters and paging handed over by the repository.
//! - Translate them into parameterized SQL when materialized.
//!
//! # Invariants
//! - Nothing touches the database until `items()` or `total_count()` runs.
//! - Field names are checked against the `sales_shipment` column whitelist;
//!   values are always bound, never interpolated.
//! - Result ordering is deterministic: requested sort orders, then `entity_id`.

use crate::model::shipment::Shipment;
use crate::repo::sqlite_mapper::{parse_shipment_row, SHIPMENT_COLUMNS, SHIPMENT_SELECT_SQL};
use crate::search::criteria::{Condition, ConditionType, FilterValue, SearchCriteria};
use crate::search::result::{
    SearchError, SearchResult, SearchResultFactory, ShipmentSearchResult,
};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Lazily executed shipment collection.
pub struct SqliteShipmentSearchResult<'conn> {
    conn: &'conn Connection,
    filters: Vec<(String, Condition)>,
    criteria: Option<SearchCriteria>,
    cur_page: Option<u32>,
    page_size: Option<u32>,
}

impl<'conn> SqliteShipmentSearchResult<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            filters: Vec::new(),
            criteria: None,
            cur_page: None,
            page_size: None,
        }
    }

    /// Runs the configured query and returns the requested page.
    ///
    /// # Errors
    /// - `UnknownField` for filter or sort fields outside the column whitelist.
    /// - `InvalidCondition` when a value does not fit its operator.
    pub fn items(&self) -> SearchResult<Vec<Shipment>> {
        let mut bind_values = Vec::new();
        let mut sql = format!(
            "{SHIPMENT_SELECT_SQL}{}",
            self.where_clause(&mut bind_values)?
        );
        sql.push_str(&self.order_clause()?);

        if let Some((limit, offset)) = self.limit_offset() {
            sql.push_str(" LIMIT ? OFFSET ?");
            bind_values.push(Value::Integer(limit));
            bind_values.push(Value::Integer(offset));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut shipments = Vec::new();
        while let Some(row) = rows.next()? {
            shipments.push(parse_shipment_row(row)?);
        }

        debug!(
            "event=shipment_search module=search status=ok filters={} rows={}",
            self.filters.len(),
            shipments.len()
        );
        Ok(shipments)
    }

    /// Counts all matching rows, ignoring paging.
    pub fn total_count(&self) -> SearchResult<u64> {
        let mut bind_values = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM sales_shipment{}",
            self.where_clause(&mut bind_values)?
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| SearchError::InvalidData(format!("negative row count `{count}`")))
    }

    fn where_clause(&self, bind_values: &mut Vec<Value>) -> SearchResult<String> {
        if self.filters.is_empty() {
            return Ok(String::new());
        }

        let clauses = self
            .filters
            .iter()
            .map(|(field, condition)| condition_clause(field, condition, bind_values))
            .collect::<SearchResult<Vec<_>>>()?;
        Ok(format!(" WHERE {}", clauses.join(" AND ")))
    }

    fn order_clause(&self) -> SearchResult<String> {
        let mut terms = Vec::new();
        let mut has_entity_id = false;
        if let Some(criteria) = &self.criteria {
            for order in &criteria.sort_orders {
                let column = checked_column(&order.field)?;
                has_entity_id |= column == "entity_id";
                terms.push(format!("{column} {}", order.direction.as_sql()));
            }
        }
        if !has_entity_id {
            terms.push("entity_id ASC".to_string());
        }
        Ok(format!(" ORDER BY {}", terms.join(", ")))
    }

    /// Page size `0` means unlimited; pages below 1 are treated as page 1.
    fn limit_offset(&self) -> Option<(i64, i64)> {
        let size = self.page_size.filter(|size| *size > 0)?;
        let page = self.cur_page.unwrap_or(1).max(1);
        let offset = i64::from(page - 1) * i64::from(size);
        Some((i64::from(size), offset))
    }
}

impl ShipmentSearchResult for SqliteShipmentSearchResult<'_> {
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

/// Creates SQLite search results bound to one connection.
pub struct SqliteShipmentSearchResultFactory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShipmentSearchResultFactory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl<'conn> SearchResultFactory for SqliteShipmentSearchResultFactory<'conn> {
    type Output = SqliteShipmentSearchResult<'conn>;

    fn create(&self) -> Self::Output {
        SqliteShipmentSearchResult::new(self.conn)
    }
}

fn checked_column(field: &str) -> SearchResult<&'static str> {
    SHIPMENT_COLUMNS
        .iter()
        .copied()
        .find(|column| *column == field)
        .ok_or_else(|| SearchError::UnknownField(field.to_string()))
}

fn condition_clause(
    field: &str,
    condition: &Condition,
    bind_values: &mut Vec<Value>,
) -> SearchResult<String> {
    let column = checked_column(field)?;

    let operator = match condition.kind {
        ConditionType::Null => return Ok(format!("{column} IS NULL")),
        ConditionType::NotNull => return Ok(format!("{column} IS NOT NULL")),
        ConditionType::In | ConditionType::Nin => {
            let values = list_values(field, &condition.value)?;
            if values.is_empty() {
                // An empty set matches nothing; its negation matches everything.
                let always = if condition.kind == ConditionType::In {
                    "0 = 1"
                } else {
                    "1 = 1"
                };
                return Ok(always.to_string());
            }
            let placeholders = vec!["?"; values.len()].join(", ");
            bind_values.extend(values);
            let keyword = if condition.kind == ConditionType::In {
                "IN"
            } else {
                "NOT IN"
            };
            return Ok(format!("{column} {keyword} ({placeholders})"));
        }
        ConditionType::Finset => {
            // Exact member match; `%` and `_` in the value are literal.
            bind_values.push(scalar_value(field, &condition.value)?);
            return Ok(format!(
                "instr(',' || {column} || ',', ',' || ? || ',') > 0"
            ));
        }
        ConditionType::Eq => "=",
        ConditionType::Neq => "!=",
        ConditionType::Like => "LIKE",
        ConditionType::Nlike => "NOT LIKE",
        ConditionType::Gt => ">",
        ConditionType::Lt => "<",
        ConditionType::Gteq | ConditionType::From => ">=",
        ConditionType::Lteq | ConditionType::To => "<=",
    };

    bind_values.push(scalar_value(field, &condition.value)?);
    Ok(format!("{column} {operator} ?"))
}

fn scalar_value(field: &str, value: &FilterValue) -> SearchResult<Value> {
    match value {
        FilterValue::Null => Ok(Value::Null),
        FilterValue::Integer(value) => Ok(Value::Integer(*value)),
        FilterValue::Real(value) => Ok(Value::Real(*value)),
        FilterValue::Text(value) => Ok(Value::Text(value.clone())),
        FilterValue::List(_) => Err(SearchError::InvalidCondition {
            field: field.to_string(),
            message: "list values are only valid with `in`/`nin`".to_string(),
        }),
    }
}

fn list_values(field: &str, value: &FilterValue) -> SearchResult<Vec<Value>> {
    match value {
        FilterValue::List(items) => items
            .iter()
            .map(|item| scalar_value(field, item))
            .collect(),
        other => Ok(vec![scalar_value(field, other)?]),
    }
}
