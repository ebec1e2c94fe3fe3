//! Table query description shared by every data backend.
//!
//! DESIGN
//! ======
//! Screens compose a `Query` with chained builder calls (one conditional call
//! per active filter) and hand it to a `DataBackend`. The HTTP client renders
//! it as PostgREST query parameters; the in-memory backend evaluates it
//! directly, so both agree on one description of "which rows".

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use serde_json::Value;

/// Row predicate on a single column.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Column equals the value.
    Eq { column: String, value: Value },
    /// Case-insensitive substring match on a text column.
    ILike { column: String, needle: String },
    /// Column is greater than or equal to the value.
    Gte { column: String, value: Value },
    /// Column is less than or equal to the value.
    Lte { column: String, value: Value },
    /// Array column contains every listed value.
    Contains { column: String, values: Vec<String> },
    /// Column equals one of the values.
    In { column: String, values: Vec<Value> },
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. }
            | Self::ILike { column, .. }
            | Self::Gte { column, .. }
            | Self::Lte { column, .. }
            | Self::Contains { column, .. }
            | Self::In { column, .. } => column,
        }
    }

    fn to_param_value(&self) -> String {
        match self {
            Self::Eq { value, .. } => format!("eq.{}", scalar_text(value)),
            Self::ILike { needle, .. } => format!("ilike.*{}*", sanitize_needle(needle)),
            Self::Gte { value, .. } => format!("gte.{}", scalar_text(value)),
            Self::Lte { value, .. } => format!("lte.{}", scalar_text(value)),
            Self::Contains { values, .. } => {
                let quoted: Vec<String> = values.iter().map(String::as_str).map(quote_array_item).collect();
                format!("cs.{{{}}}", quoted.join(","))
            }
            Self::In { values, .. } => {
                let items: Vec<String> = values
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => quote_array_item(s),
                        other => scalar_text(other),
                    })
                    .collect();
                format!("in.({})", items.join(","))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A select/update/delete target: one table plus row filters and ordering.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    table: String,
    filters: Vec<Filter>,
    order: Vec<Order>,
    limit: Option<usize>,
}

impl Query {
    pub fn from(table: &str) -> Self {
        Self { table: table.to_owned(), filters: Vec::new(), order: Vec::new(), limit: None }
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq { column: column.to_owned(), value: value.into() });
        self
    }

    #[must_use]
    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.filters.push(Filter::ILike { column: column.to_owned(), needle: needle.to_owned() });
        self
    }

    #[must_use]
    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte { column: column.to_owned(), value: value.into() });
        self
    }

    #[must_use]
    pub fn lte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte { column: column.to_owned(), value: value.into() });
        self
    }

    #[must_use]
    pub fn contains(mut self, column: &str, values: Vec<String>) -> Self {
        self.filters.push(Filter::Contains { column: column.to_owned(), values });
        self
    }

    #[must_use]
    pub fn is_in(mut self, column: &str, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In { column: column.to_owned(), values });
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(Order { column: column.to_owned(), direction });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn orders(&self) -> &[Order] {
        &self.order
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// PostgREST parameters for the row filters only.
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|f| (f.column().to_owned(), f.to_param_value()))
            .collect()
    }

    /// PostgREST query parameters, excluding `select`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self.filter_params();
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| match o.direction {
                    Direction::Ascending => format!("{}.asc", o.column),
                    Direction::Descending => format!("{}.desc", o.column),
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_owned(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }
}

/// Render a JSON scalar the way PostgREST expects it in a filter value.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_owned(),
        other => other.to_string(),
    }
}

// `*` and `%` are wildcards on the wire; a literal search never carries them.
fn sanitize_needle(needle: &str) -> String {
    needle.chars().filter(|c| !matches!(c, '*' | '%')).collect()
}

fn quote_array_item(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
