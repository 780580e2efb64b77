//! Table mode engine: the policy for how a TABLE layout's data reaches the
//! client.
//!
//! Four modes exist. SIMPLE and INTERACTIVE tables carry item-placed rows;
//! BULK_DATA embeds its rows as a JSON payload for the client library to
//! paginate; SERVER_SIDE embeds nothing and points the client at an API
//! endpoint. An older single-field config (`"basic"` / `"advanced"`) is still
//! accepted and translated once, at construction, never in the render path.

use serde_json::{Map, Value, json};

use crate::error::{DisplayError, Result};
use crate::resources::ResourceSet;

const DATATABLES_CSS: &str = "https://cdn.datatables.net/1.13.8/css/jquery.dataTables.min.css";
const DATATABLES_JS: &str = "https://cdn.datatables.net/1.13.8/js/jquery.dataTables.min.js";

/// Rendering strategy for one TABLE layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Simple,
    Interactive,
    BulkData,
    ServerSide,
}

impl TableMode {
    /// Discriminator written into the table manifest. The template renderer
    /// pattern-matches on these strings.
    pub fn label(self) -> &'static str {
        match self {
            TableMode::Simple => "simple",
            TableMode::Interactive => "interactive",
            TableMode::BulkData => "bulk_data",
            TableMode::ServerSide => "server_side",
        }
    }
}

/// Column-to-field binding for BULK_DATA and SERVER_SIDE tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub data: String,
}

impl ColumnBinding {
    pub fn new(field: impl Into<String>) -> Self {
        Self { data: field.into() }
    }
}

/// Resolved configuration of one TABLE layout.
///
/// Constructed through the per-mode constructors, which validate that the
/// fields the mode requires are present. `extra` carries sub-fields of a
/// legacy config that the translation did not recognize; they are preserved
/// into the manifest rather than dropped.
#[derive(Debug, Clone)]
pub struct TableConfig {
    mode: TableMode,
    table_id: Option<String>,
    searchable_columns: Vec<usize>,
    data: Option<Vec<Map<String, Value>>>,
    columns: Option<Vec<ColumnBinding>>,
    api_endpoint: Option<String>,
    refresh_interval: Option<u64>,
    extra: Map<String, Value>,
}

impl TableConfig {
    /// Plain markup, no client-side library, rows via item placement.
    pub fn simple() -> Self {
        Self {
            mode: TableMode::Simple,
            table_id: None,
            searchable_columns: Vec::new(),
            data: None,
            columns: None,
            api_endpoint: None,
            refresh_interval: None,
            extra: Map::new(),
        }
    }

    /// Client-side enhanced table; rows still come from item placement.
    pub fn interactive(
        table_id: impl Into<String>,
        searchable_columns: Vec<usize>,
    ) -> Result<Self> {
        let table_id = non_empty_id(table_id)?;
        Ok(Self {
            table_id: Some(table_id),
            searchable_columns,
            mode: TableMode::Interactive,
            ..Self::simple()
        })
    }

    /// Rows embedded as a JSON payload; item placement is ignored.
    pub fn bulk_data(
        table_id: impl Into<String>,
        data: Vec<Map<String, Value>>,
        columns: Vec<ColumnBinding>,
        searchable_columns: Vec<usize>,
    ) -> Result<Self> {
        let table_id = non_empty_id(table_id)?;
        if columns.is_empty() {
            return Err(DisplayError::InvalidTableConfig(
                "bulk_data requires column bindings".into(),
            ));
        }
        Ok(Self {
            table_id: Some(table_id),
            searchable_columns,
            data: Some(data),
            columns: Some(columns),
            mode: TableMode::BulkData,
            ..Self::simple()
        })
    }

    /// No rows embedded; the client fetches (and optionally polls) the
    /// endpoint.
    pub fn server_side(
        table_id: impl Into<String>,
        api_endpoint: impl Into<String>,
        columns: Vec<ColumnBinding>,
        refresh_interval: Option<u64>,
    ) -> Result<Self> {
        let table_id = non_empty_id(table_id)?;
        let api_endpoint = api_endpoint.into();
        if api_endpoint.is_empty() {
            return Err(DisplayError::InvalidTableConfig(
                "server_side requires an api endpoint".into(),
            ));
        }
        Ok(Self {
            table_id: Some(table_id),
            columns: Some(columns),
            api_endpoint: Some(api_endpoint),
            refresh_interval,
            mode: TableMode::ServerSide,
            ..Self::simple()
        })
    }

    /// Translate the deprecated single-field form. `"basic"` maps to
    /// INTERACTIVE; `"advanced"` maps to BULK_DATA when it embeds `data`,
    /// otherwise to SERVER_SIDE when it names an endpoint. Unrecognized
    /// sub-fields land in `extra`. Returns the config plus the deprecation
    /// notice the composition root logs when the layout is registered.
    pub fn from_legacy(table_id: impl Into<String>, legacy: &Value) -> Result<(Self, String)> {
        let table_id = table_id.into();
        let fields = legacy.as_object().ok_or_else(|| {
            DisplayError::InvalidTableConfig("legacy table config must be a mapping".into())
        })?;
        let kind = fields
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DisplayError::InvalidTableConfig("legacy table config missing `type`".into())
            })?;

        let mut config = match kind {
            "basic" => {
                let searchable = fields
                    .get("columns")
                    .map(index_list)
                    .transpose()?
                    .unwrap_or_default();
                Self::interactive(table_id.clone(), searchable)?
            }
            "advanced" => {
                if let Some(data) = fields.get("data") {
                    let data = row_list(data)?;
                    let columns = fields
                        .get("columns")
                        .map(binding_list)
                        .transpose()?
                        .unwrap_or_else(|| infer_bindings(&data));
                    if columns.is_empty() {
                        return Err(DisplayError::InvalidTableConfig(
                            "legacy advanced config has no derivable columns".into(),
                        ));
                    }
                    Self::bulk_data(table_id.clone(), data, columns, Vec::new())?
                } else if let Some(endpoint) = fields
                    .get("api")
                    .or_else(|| fields.get("endpoint"))
                    .and_then(Value::as_str)
                {
                    let columns = fields
                        .get("columns")
                        .map(binding_list)
                        .transpose()?
                        .unwrap_or_default();
                    let refresh = fields
                        .get("refresh")
                        .or_else(|| fields.get("refresh_interval"))
                        .and_then(Value::as_u64);
                    Self::server_side(table_id.clone(), endpoint, columns, refresh)?
                } else {
                    return Err(DisplayError::InvalidTableConfig(
                        "legacy advanced config needs embedded `data` or an `api` endpoint".into(),
                    ));
                }
            }
            other => {
                return Err(DisplayError::InvalidTableConfig(format!(
                    "unknown legacy table type `{other}`"
                )));
            }
        };

        const CONSUMED: [&str; 7] = [
            "type",
            "columns",
            "data",
            "api",
            "endpoint",
            "refresh",
            "refresh_interval",
        ];
        for (key, value) in fields {
            if !CONSUMED.contains(&key.as_str()) {
                config.extra.insert(key.clone(), value.clone());
            }
        }

        let notice = format!(
            "legacy `{kind}` table config for `{table_id}` is deprecated; build a TableConfig with an explicit mode"
        );
        Ok((config, notice))
    }

    pub fn mode(&self) -> TableMode {
        self.mode
    }

    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    pub fn searchable_columns(&self) -> &[usize] {
        &self.searchable_columns
    }

    /// Whether serialization emits the item-placed rows. BULK_DATA and
    /// SERVER_SIDE tables skip them entirely.
    pub(crate) fn emits_placed_rows(&self) -> bool {
        matches!(self.mode, TableMode::Simple | TableMode::Interactive)
    }

    pub(crate) fn resources(&self) -> ResourceSet {
        match self.mode {
            TableMode::Simple => ResourceSet::new(),
            TableMode::Interactive | TableMode::BulkData => ResourceSet::new()
                .cdn_css(DATATABLES_CSS)
                .cdn_js(DATATABLES_JS)
                .js("js/tables.js"),
            TableMode::ServerSide => ResourceSet::new()
                .cdn_css(DATATABLES_CSS)
                .cdn_js(DATATABLES_JS)
                .js("js/tables.js")
                .js("js/table_poll.js"),
        }
    }

    /// Entry for the page-level table manifest, keyed by `table_id`. SIMPLE
    /// tables have no id and no entry.
    pub(crate) fn manifest_entry(&self) -> Option<(String, Value)> {
        let table_id = self.table_id.clone()?;
        let mut entry = Map::new();
        entry.insert("type".into(), json!(self.mode.label()));
        if !self.searchable_columns.is_empty() {
            entry.insert("searchable_columns".into(), json!(self.searchable_columns));
        }
        if let Some(columns) = &self.columns {
            let bindings: Vec<Value> = columns.iter().map(|c| json!({ "data": c.data })).collect();
            entry.insert("columns".into(), json!(bindings));
        }
        if let Some(data) = &self.data {
            entry.insert("data".into(), json!(data));
        }
        if let Some(endpoint) = &self.api_endpoint {
            entry.insert("api".into(), json!(endpoint));
        }
        if let Some(refresh) = self.refresh_interval {
            entry.insert("refresh_interval".into(), json!(refresh));
        }
        for (key, value) in &self.extra {
            entry.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Some((table_id, Value::Object(entry)))
    }
}

fn non_empty_id(table_id: impl Into<String>) -> Result<String> {
    let table_id = table_id.into();
    if table_id.is_empty() {
        return Err(DisplayError::InvalidTableConfig(
            "table_id must not be empty".into(),
        ));
    }
    Ok(table_id)
}

fn index_list(value: &Value) -> Result<Vec<usize>> {
    let entries = value.as_array().ok_or_else(|| {
        DisplayError::InvalidTableConfig("legacy `columns` must be a list".into())
    })?;
    entries
        .iter()
        .map(|v| {
            v.as_u64().map(|n| n as usize).ok_or_else(|| {
                DisplayError::InvalidTableConfig(format!("expected a column index, got {v}"))
            })
        })
        .collect()
}

fn binding_list(value: &Value) -> Result<Vec<ColumnBinding>> {
    let entries = value.as_array().ok_or_else(|| {
        DisplayError::InvalidTableConfig("legacy `columns` must be a list".into())
    })?;
    entries
        .iter()
        .map(|entry| {
            if let Some(field) = entry.as_str() {
                return Ok(ColumnBinding::new(field));
            }
            entry
                .get("data")
                .and_then(Value::as_str)
                .map(ColumnBinding::new)
                .ok_or_else(|| {
                    DisplayError::InvalidTableConfig(format!(
                        "expected a column binding, got {entry}"
                    ))
                })
        })
        .collect()
}

fn row_list(value: &Value) -> Result<Vec<Map<String, Value>>> {
    let rows = value.as_array().ok_or_else(|| {
        DisplayError::InvalidTableConfig("legacy `data` must be a list of rows".into())
    })?;
    rows.iter()
        .map(|row| {
            row.as_object().cloned().ok_or_else(|| {
                DisplayError::InvalidTableConfig(format!("expected a row mapping, got {row}"))
            })
        })
        .collect()
}

/// Derive bindings from the first row when a legacy bulk config omits them.
fn infer_bindings(data: &[Map<String, Value>]) -> Vec<ColumnBinding> {
    data.first()
        .map(|row| row.keys().map(ColumnBinding::new).collect())
        .unwrap_or_default()
}
