//! Search criteria value objects.
//!
//! # Responsibility
//! - Describe filter groups, sort orders and paging for list queries.
//! - Name the condition operators understood by search results.
//!
//! # Invariants
//! - Criteria are plain values; they never touch storage.
//! - Pages are 1-based.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Comparison operator applied to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    Eq,
    Neq,
    Like,
    Nlike,
    In,
    Nin,
    Gt,
    Lt,
    Gteq,
    Lteq,
    Null,
    NotNull,
    From,
    To,
    /// Membership in a comma-separated set column.
    Finset,
}

impl ConditionType {
    /// Returns the stable lowercase name (`eq`, `gteq`, `notnull`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Like => "like",
            Self::Nlike => "nlike",
            Self::In => "in",
            Self::Nin => "nin",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gteq => "gteq",
            Self::Lteq => "lteq",
            Self::Null => "null",
            Self::NotNull => "notnull",
            Self::From => "from",
            Self::To => "to",
            Self::Finset => "finset",
        }
    }
}

impl Display for ConditionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown condition name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConditionType(pub String);

impl Display for UnknownConditionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown condition type `{}`", self.0)
    }
}

impl std::error::Error for UnknownConditionType {}

impl FromStr for ConditionType {
    type Err = UnknownConditionType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "like" => Ok(Self::Like),
            "nlike" => Ok(Self::Nlike),
            "in" => Ok(Self::In),
            "nin" => Ok(Self::Nin),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            "gteq" => Ok(Self::Gteq),
            "lteq" => Ok(Self::Lteq),
            "null" => Ok(Self::Null),
            "notnull" => Ok(Self::NotNull),
            "from" => Ok(Self::From),
            "to" => Ok(Self::To),
            "finset" => Ok(Self::Finset),
            other => Err(UnknownConditionType(other.to_string())),
        }
    }
}

/// Value compared against a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Used by `in`/`nin`.
    List(Vec<FilterValue>),
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// One `{condition => value}` constraint on a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub kind: ConditionType,
    pub value: FilterValue,
}

impl Condition {
    pub fn new(kind: ConditionType, value: impl Into<FilterValue>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Single field filter as supplied by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: FilterValue,
    /// `None` means equality.
    pub condition_type: Option<ConditionType>,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<FilterValue>,
        condition_type: Option<ConditionType>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            condition_type,
        }
    }

    /// Returns the condition this filter contributes, defaulting to `eq`.
    pub fn to_condition(&self) -> Condition {
        Condition {
            kind: self.condition_type.unwrap_or(ConditionType::Eq),
            value: self.value.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    pub filters: Vec<Filter>,
}

impl FilterGroup {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Caller-supplied description of a list query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub filter_groups: Vec<FilterGroup>,
    pub sort_orders: Vec<SortOrder>,
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group containing a single filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter_groups.push(FilterGroup::new(vec![filter]));
        self
    }

    pub fn with_filter_group(mut self, group: FilterGroup) -> Self {
        self.filter_groups.push(group);
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_orders.push(order);
        self
    }

    pub fn with_current_page(mut self, page: u32) -> Self {
        self.current_page = Some(page);
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ConditionType, Filter, FilterValue};

    #[test]
    fn condition_type_names_round_trip_through_from_str() {
        for kind in [
            ConditionType::Eq,
            ConditionType::Nin,
            ConditionType::Gteq,
            ConditionType::NotNull,
            ConditionType::Finset,
        ] {
            assert_eq!(kind.as_str().parse::<ConditionType>().unwrap(), kind);
        }
    }

    #[test]
    fn condition_type_parsing_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(" LIKE ".parse::<ConditionType>().unwrap(), ConditionType::Like);
        let err = "between".parse::<ConditionType>().unwrap_err();
        assert!(err.to_string().contains("between"));
    }

    #[test]
    fn filter_without_condition_defaults_to_eq() {
        let filter = Filter::new("status", "shipped", None);
        let condition = filter.to_condition();
        assert_eq!(condition.kind, ConditionType::Eq);
        assert_eq!(condition.value, FilterValue::Text("shipped".to_string()));
    }

    #[test]
    fn vec_values_become_lists() {
        let value = FilterValue::from(vec![1_i64, 2, 3]);
        assert_eq!(
            value,
            FilterValue::List(vec![
                FilterValue::Integer(1),
                FilterValue::Integer(2),
                FilterValue::Integer(3)
            ])
        );
    }
}
