//! Command-line driver for the shipment repository.
//!
//! # Responsibility
//! - Resolve database and logging settings from flags or environment.
//! - Map subcommands onto repository operations and print JSON results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use shipment_core::db::open_db;
use shipment_core::{
    default_log_level, init_logging, parse_shipment_id, sqlite_shipment_repository, ConditionType,
    Filter, FilterValue, LogLevel, SearchCriteria, Shipment, SortDirection, SortOrder,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shipment", version, about = "Inspect and edit stored shipments")]
struct Cli {
    /// SQLite database file; created and migrated when missing.
    #[arg(long, env = "SHIPMENT_DB")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "SHIPMENT_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[arg(long, env = "SHIPMENT_LOG_LEVEL", default_value_t = default_log_level())]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one shipment.
    Get { id: String },
    /// List shipments matching filters.
    List {
        /// `field:condition:value`; condition may be empty for `eq`.
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// `field` or `field:asc|desc`.
        #[arg(long = "sort")]
        sorts: Vec<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Create a shipment for an order.
    Create {
        #[arg(long)]
        order_id: i64,
        #[arg(long)]
        increment_id: Option<String>,
        #[arg(long)]
        qty: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Insert or update a shipment given as JSON.
    Save { json: String },
    /// Delete one shipment.
    Delete { id: String },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Get { .. } => "get",
            Self::List { .. } => "list",
            Self::Create { .. } => "create",
            Self::Save { .. } => "save",
            Self::Delete { .. } => "delete",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(cli.log_level.as_str(), log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let mut repo = sqlite_shipment_repository(&conn)?;

    let command_name = cli.command.name();
    let output = match cli.command {
        Command::Get { id } => {
            let shipment = repo.get(parse_shipment_id(&id)?)?;
            serde_json::to_value(&*shipment)?
        }
        Command::List {
            filters,
            sorts,
            page,
            page_size,
        } => {
            let criteria = build_criteria(&filters, &sorts, page, page_size)?;
            let result = repo.get_list(&criteria);
            json!({
                "items": result.items()?,
                "total_count": result.total_count()?,
            })
        }
        Command::Create {
            order_id,
            increment_id,
            qty,
            weight,
            note,
        } => {
            let mut shipment = repo.create();
            shipment.order_id = order_id;
            shipment.increment_id = increment_id;
            shipment.total_qty = qty;
            shipment.total_weight = weight;
            shipment.customer_note = note;
            let saved = repo.save(&mut shipment)?;
            serde_json::to_value(&*saved)?
        }
        Command::Save { json } => {
            let mut shipment: Shipment =
                serde_json::from_str(&json).context("shipment JSON is malformed")?;
            let saved = repo.save(&mut shipment)?;
            serde_json::to_value(&*saved)?
        }
        Command::Delete { id } => {
            let deleted = repo.delete_by_id(parse_shipment_id(&id)?)?;
            json!({ "deleted": deleted })
        }
    };

    info!("event=cli_command module=cli status=ok command={command_name}");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_criteria(
    filters: &[String],
    sorts: &[String],
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<SearchCriteria> {
    let mut criteria = SearchCriteria::new();
    for raw in filters {
        criteria = criteria.with_filter(parse_filter(raw)?);
    }
    for raw in sorts {
        criteria = criteria.with_sort_order(parse_sort(raw)?);
    }
    criteria.current_page = page;
    criteria.page_size = page_size;
    Ok(criteria)
}

fn parse_filter(raw: &str) -> Result<Filter> {
    let mut parts = raw.splitn(3, ':');
    let (Some(field), Some(condition), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        bail!("filter `{raw}` must look like field:condition:value");
    };
    if field.is_empty() {
        bail!("filter `{raw}` has an empty field");
    }

    let condition_type = if condition.is_empty() {
        None
    } else {
        Some(condition.parse::<ConditionType>()?)
    };
    let value = match condition_type {
        Some(ConditionType::Null | ConditionType::NotNull) => FilterValue::Null,
        Some(ConditionType::In | ConditionType::Nin) => FilterValue::List(
            value
                .split(',')
                .filter(|item| !item.is_empty())
                .map(parse_scalar)
                .collect(),
        ),
        _ => parse_scalar(value),
    };
    Ok(Filter::new(field, value, condition_type))
}

/// Values stay text; SQLite column affinity converts them for numeric columns.
fn parse_scalar(raw: &str) -> FilterValue {
    FilterValue::Text(raw.to_string())
}

fn parse_sort(raw: &str) -> Result<SortOrder> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, direction)) => (field, direction),
        None => (raw, "asc"),
    };
    let direction = match direction.to_ascii_lowercase().as_str() {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        other => bail!("sort direction `{other}` must be asc or desc"),
    };
    Ok(SortOrder::new(field, direction))
}

#[cfg(test)]
mod tests {
    use super::{build_criteria, parse_filter, parse_sort};
    use shipment_core::{ConditionType, FilterValue, SortDirection};

    #[test]
    fn filter_without_condition_keeps_it_unset() {
        let filter = parse_filter("increment_id::000000042").unwrap();
        assert_eq!(filter.field, "increment_id");
        assert_eq!(filter.condition_type, None);
        assert_eq!(filter.value, FilterValue::Text("000000042".to_string()));
    }

    #[test]
    fn in_filter_splits_list_values() {
        let filter = parse_filter("order_id:in:1,2,x").unwrap();
        assert_eq!(filter.condition_type, Some(ConditionType::In));
        assert_eq!(
            filter.value,
            FilterValue::List(vec![
                FilterValue::Text("1".to_string()),
                FilterValue::Text("2".to_string()),
                FilterValue::Text("x".to_string()),
            ])
        );
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(parse_filter("order_id").is_err());
        assert!(parse_filter(":eq:1").is_err());
        assert!(parse_filter("order_id:between:1").is_err());
    }

    #[test]
    fn sort_defaults_to_ascending() {
        assert_eq!(parse_sort("total_qty").unwrap().direction, SortDirection::Asc);
        assert_eq!(
            parse_sort("created_at:DESC").unwrap().direction,
            SortDirection::Desc
        );
        assert!(parse_sort("created_at:sideways").is_err());
    }

    #[test]
    fn criteria_carries_paging() {
        let criteria =
            build_criteria(&["status::shipped".to_string()], &[], Some(3), Some(25)).unwrap();
        assert_eq!(criteria.filter_groups.len(), 1);
        assert_eq!(criteria.current_page, Some(3));
        assert_eq!(criteria.page_size, Some(25));
    }
}
