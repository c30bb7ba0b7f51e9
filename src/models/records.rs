use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Whether the instance returns raw field values, display values, or both.
///
/// Maps to the `sysparm_display_value` parameter, which the Table API expects
/// as the literal strings `false`, `true`, or `all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayValue {
    #[default]
    #[serde(rename = "false")]
    Actual,
    #[serde(rename = "true")]
    Display,
    #[serde(rename = "all")]
    All,
}

impl Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Actual => write!(f, "false"),
            DisplayValue::Display => write!(f, "true"),
            DisplayValue::All => write!(f, "all"),
        }
    }
}

/// Query parameters for listing records from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsQuery {
    /// Encoded query string, e.g. `active=true^priority=1`.
    pub query: Option<String>,
    /// Comma-separated list of fields to include in each record.
    pub fields: Option<String>,
    pub display_value: DisplayValue,
    /// Maximum number of records to retrieve.
    pub limit: u32,
}

impl Default for RecordsQuery {
    fn default() -> Self {
        Self {
            query: None,
            fields: None,
            display_value: DisplayValue::default(),
            limit: 10,
        }
    }
}

impl RecordsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_display_value(mut self, display_value: DisplayValue) -> Self {
        self.display_value = display_value;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Render the `sysparm_*` parameters in the fixed order the instance expects.
    pub(crate) fn to_query_string(&self) -> String {
        let mut params = String::new();
        if let Some(query) = &self.query {
            params.push_str(&format!("sysparm_query={query}&"));
        }
        if let Some(fields) = &self.fields {
            params.push_str(&format!("sysparm_fields={fields}&"));
        }
        params.push_str(&format!("sysparm_display_value={}&", self.display_value));
        params.push_str(&format!("sysparm_limit={}", self.limit));
        params
    }
}

/// Options shared by the single-record operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOptions {
    /// Comma-separated list of fields to include in the record.
    pub fields: Option<String>,
    pub display_value: DisplayValue,
}

impl RecordOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_display_value(mut self, display_value: DisplayValue) -> Self {
        self.display_value = display_value;
        self
    }

    pub(crate) fn to_query_string(&self) -> String {
        let mut params = String::new();
        if let Some(fields) = &self.fields {
            params.push_str(&format!("sysparm_fields={fields}&"));
        }
        params.push_str(&format!("sysparm_display_value={}", self.display_value));
        params
    }
}
