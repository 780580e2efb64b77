use serde_json::{Map, Value, json};

use crate::error::{DisplayError, Result};
use crate::graph::{LayoutGraph, LayoutId};
use crate::item::Item;
use crate::layout::grid::GridConfig;
use crate::layout::table::TableConfig;
use crate::resources::ResourceSet;

/// Row-level organizational strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Vertical,
    Horizontal,
    Table,
    Tabs,
    Spacer,
    Grid,
    UserDefined,
}

impl LayoutKind {
    /// Discriminator emitted in serialized output. The template renderer
    /// pattern-matches on these strings.
    pub fn label(self) -> &'static str {
        match self {
            LayoutKind::Vertical => "VERTICAL",
            LayoutKind::Horizontal => "HORIZONTAL",
            LayoutKind::Table => "TABLE",
            LayoutKind::Tabs => "TABS",
            LayoutKind::Spacer => "SPACER",
            LayoutKind::Grid => "GRID",
            LayoutKind::UserDefined => "USER_DEFINED",
        }
    }
}

/// Per-column content alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn label(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Column descriptor: grid widths for flow layouts, labels for TABLE/TABS,
/// named slots for GRID/USER_DEFINED.
#[derive(Debug, Clone)]
pub enum Columns {
    Widths(Vec<u8>),
    Labels(Vec<String>),
    Slots(GridConfig),
}

impl Columns {
    pub fn count(&self) -> usize {
        match self {
            Columns::Widths(widths) => widths.len(),
            Columns::Labels(labels) => labels.len(),
            Columns::Slots(config) => config.len(),
        }
    }

    fn serialize(&self) -> Value {
        match self {
            Columns::Widths(widths) => json!(widths),
            Columns::Labels(labels) => json!(labels),
            Columns::Slots(config) => config.serialize(),
        }
    }
}

/// Addressable slot of a layout: either a flow of items or exactly one
/// nested layout, never a mix.
#[derive(Debug, Clone)]
pub enum Cell {
    Items(Vec<Item>),
    Nested(LayoutId),
}

impl Cell {
    fn empty() -> Self {
        Cell::Items(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Items(items) if items.is_empty())
    }
}

/// One row-level organizational unit of a page.
///
/// A layout starts open, accumulates items and nested layouts, and freezes
/// when its displayer serializes. Frozen layouts reject all mutation; there
/// is no way back to the open state.
#[derive(Debug, Clone)]
pub struct Layout {
    kind: LayoutKind,
    columns: Columns,
    subtitle: Option<String>,
    spacing: u8,
    background_style: Option<String>,
    alignment: Vec<Alignment>,
    table: Option<TableConfig>,
    table_config_set: bool,
    legacy_notice: Option<String>,
    lines: Vec<Vec<Cell>>,
    pub(crate) id: Option<LayoutId>,
    pub(crate) frozen: bool,
}

impl Layout {
    fn new(kind: LayoutKind, columns: Columns) -> Self {
        Self {
            kind,
            columns,
            subtitle: None,
            spacing: 0,
            background_style: None,
            alignment: Vec::new(),
            table: None,
            table_config_set: false,
            legacy_notice: None,
            lines: Vec::new(),
            id: None,
            frozen: false,
        }
    }

    /// Row-flow layout: small items in the same cell share a row.
    pub fn vertical(widths: impl IntoIterator<Item = u8>) -> Result<Self> {
        Ok(Self::new(
            LayoutKind::Vertical,
            Columns::Widths(validated_widths(widths)?),
        ))
    }

    /// Forced-stacked layout: every item lands on its own row.
    pub fn horizontal(widths: impl IntoIterator<Item = u8>) -> Result<Self> {
        Ok(Self::new(
            LayoutKind::Horizontal,
            Columns::Widths(validated_widths(widths)?),
        ))
    }

    /// Table layout with SIMPLE mode; use [`Layout::with_table_config`] or
    /// [`Layout::with_legacy_table_config`] for the richer modes.
    pub fn table<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Result<Self> {
        let mut layout = Self::new(
            LayoutKind::Table,
            Columns::Labels(validated_labels(labels)?),
        );
        layout.table = Some(TableConfig::simple());
        Ok(layout)
    }

    pub fn tabs<S: Into<String>>(titles: impl IntoIterator<Item = S>) -> Result<Self> {
        Ok(Self::new(
            LayoutKind::Tabs,
            Columns::Labels(validated_labels(titles)?),
        ))
    }

    /// Content-free vertical gap between adjacent master layouts.
    pub fn spacer(spacing: u8) -> Self {
        let mut layout = Self::new(LayoutKind::Spacer, Columns::Widths(vec![12]));
        layout.spacing = spacing;
        layout
    }

    pub fn grid(config: GridConfig) -> Result<Self> {
        if config.is_empty() {
            return Err(DisplayError::EmptyColumns);
        }
        Ok(Self::new(LayoutKind::Grid, Columns::Slots(config)))
    }

    pub fn user_defined(config: GridConfig) -> Result<Self> {
        if config.is_empty() {
            return Err(DisplayError::EmptyColumns);
        }
        Ok(Self::new(LayoutKind::UserDefined, Columns::Slots(config)))
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_spacing(mut self, spacing: u8) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_background(mut self, style: impl Into<String>) -> Self {
        self.background_style = Some(style.into());
        self
    }

    /// One alignment entry per column.
    pub fn with_alignment(mut self, alignment: Vec<Alignment>) -> Result<Self> {
        if alignment.len() != self.columns.count() {
            return Err(DisplayError::AlignmentMismatch {
                expected: self.columns.count(),
                got: alignment.len(),
            });
        }
        self.alignment = alignment;
        Ok(self)
    }

    /// Attach an explicit table mode. Mixing this with a legacy config on
    /// the same layout is a construction-time error.
    pub fn with_table_config(mut self, config: TableConfig) -> Result<Self> {
        if self.kind != LayoutKind::Table {
            return Err(DisplayError::InvalidTableConfig(
                "table config on a non-table layout".into(),
            ));
        }
        if self.legacy_notice.is_some() {
            return Err(DisplayError::ConflictingTableConfig);
        }
        self.table = Some(config);
        self.table_config_set = true;
        Ok(self)
    }

    /// Accept the deprecated single-field config, translated immediately.
    /// The deprecation notice is logged when the layout is registered.
    pub fn with_legacy_table_config(
        mut self,
        table_id: impl Into<String>,
        legacy: &Value,
    ) -> Result<Self> {
        if self.kind != LayoutKind::Table {
            return Err(DisplayError::InvalidTableConfig(
                "table config on a non-table layout".into(),
            ));
        }
        if self.table_config_set || self.legacy_notice.is_some() {
            return Err(DisplayError::ConflictingTableConfig);
        }
        let (config, notice) = TableConfig::from_legacy(table_id, legacy)?;
        self.table = Some(config);
        self.legacy_notice = Some(notice);
        Ok(self)
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.count()
    }

    pub fn table_config(&self) -> Option<&TableConfig> {
        self.table.as_ref()
    }

    pub fn lines(&self) -> &[Vec<Cell>] {
        &self.lines
    }

    /// Cell lookup for collaborators introspecting already-built structure.
    pub fn cell(&self, column: usize, line: usize) -> Option<&Cell> {
        self.lines.get(line).and_then(|row| row.get(column))
    }

    pub(crate) fn take_legacy_notice(&mut self) -> Option<String> {
        self.legacy_notice.take()
    }

    /// Place `item` in the named cell.
    ///
    /// With `line = None`, VERTICAL layouts flow the item into the last
    /// row's cell while HORIZONTAL layouts force a fresh row. An explicit
    /// `line` beyond the current row count auto-extends with empty rows;
    /// rows are never truncated.
    pub fn add_item(&mut self, item: Item, column: usize, line: Option<usize>) -> Result<()> {
        self.ensure_open()?;
        if self.kind == LayoutKind::Spacer {
            return Err(DisplayError::SpacerContent);
        }
        self.ensure_column(column)?;

        let line = match line {
            Some(line) => {
                self.ensure_line(line);
                line
            }
            None if self.kind == LayoutKind::Horizontal => {
                let line = self.lines.len();
                self.ensure_line(line);
                line
            }
            None => {
                if self.lines.is_empty() {
                    self.ensure_line(0);
                }
                self.lines.len() - 1
            }
        };

        match &mut self.lines[line][column] {
            Cell::Items(items) => {
                items.push(item);
                Ok(())
            }
            Cell::Nested(_) => Err(DisplayError::CellOccupied {
                column,
                line,
                held: "a nested layout",
            }),
        }
    }

    /// Record a slave layout as the sole content of the named cell. The cell
    /// must be empty: items and nested layouts never mix, and conflicting
    /// use of a cell is an error rather than a silent overwrite.
    pub(crate) fn attach_nested(
        &mut self,
        child: LayoutId,
        column: usize,
        line: usize,
    ) -> Result<()> {
        self.ensure_open()?;
        if self.kind == LayoutKind::Spacer {
            return Err(DisplayError::SpacerContent);
        }
        self.ensure_column(column)?;
        self.ensure_line(line);

        let cell = &mut self.lines[line][column];
        match cell {
            Cell::Items(items) if items.is_empty() => {
                *cell = Cell::Nested(child);
                Ok(())
            }
            Cell::Items(_) => Err(DisplayError::CellOccupied {
                column,
                line,
                held: "items",
            }),
            Cell::Nested(_) => Err(DisplayError::CellOccupied {
                column,
                line,
                held: "a nested layout",
            }),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.frozen {
            return Err(DisplayError::FrozenLayout(self.id.unwrap_or_default()));
        }
        Ok(())
    }

    fn ensure_column(&self, column: usize) -> Result<()> {
        let count = self.columns.count();
        if column >= count {
            return Err(DisplayError::ColumnOutOfRange { column, count });
        }
        Ok(())
    }

    /// Append empty rows until `line` exists.
    fn ensure_line(&mut self, line: usize) {
        let columns = self.columns.count();
        while self.lines.len() <= line {
            self.lines.push((0..columns).map(|_| Cell::empty()).collect());
        }
    }

    /// Assets implied by the layout itself; item assets are registered as
    /// items are placed.
    pub fn required_resources(&self) -> ResourceSet {
        let mut set = match self.kind {
            LayoutKind::Tabs => ResourceSet::new().js("js/tabs.js"),
            LayoutKind::Grid | LayoutKind::UserDefined => ResourceSet::new().css("css/grid.css"),
            _ => ResourceSet::new(),
        };
        if let Some(table) = &self.table {
            set.merge(&table.resources());
        }
        set
    }

    /// Serialize this layout and everything nested under it. Each resolved
    /// table merges its entry into `manifest` by key; the manifest is shared
    /// across the whole traversal so sibling tables all survive.
    pub(crate) fn serialize(
        &self,
        graph: &LayoutGraph,
        manifest: &mut Map<String, Value>,
    ) -> Result<Value> {
        let mut map = Map::new();
        if let Some(id) = self.id {
            map.insert("layout_id".into(), json!(id));
        }
        map.insert("type".into(), json!(self.kind.label()));
        map.insert("columns".into(), self.columns.serialize());
        if let Some(subtitle) = &self.subtitle {
            map.insert("subtitle".into(), json!(subtitle));
        }
        map.insert("spacing".into(), json!(self.spacing));
        if let Some(background) = &self.background_style {
            map.insert("background".into(), json!(background));
        }
        if !self.alignment.is_empty() {
            let labels: Vec<&str> = self.alignment.iter().map(|a| a.label()).collect();
            map.insert("alignment".into(), json!(labels));
        }

        let mut emit_rows = true;
        if let Some(table) = &self.table {
            if let Some((table_id, entry)) = table.manifest_entry() {
                map.insert("table_id".into(), json!(table_id));
                manifest.entry(table_id).or_insert(entry);
            }
            map.insert("table_mode".into(), json!(table.mode().label()));
            emit_rows = table.emits_placed_rows();
        }

        let lines = if emit_rows {
            self.serialize_lines(graph, manifest)?
        } else {
            Value::Array(Vec::new())
        };
        map.insert("lines".into(), lines);

        Ok(Value::Object(map))
    }

    fn serialize_lines(
        &self,
        graph: &LayoutGraph,
        manifest: &mut Map<String, Value>,
    ) -> Result<Value> {
        let mut rows = Vec::with_capacity(self.lines.len());
        for row in &self.lines {
            let mut cells = Vec::with_capacity(row.len());
            for cell in row {
                let value = match cell {
                    // Insertion order is visual order.
                    Cell::Items(items) => {
                        Value::Array(items.iter().map(Item::serialize).collect())
                    }
                    Cell::Nested(child) => graph.serialize_layout(*child, manifest)?,
                };
                cells.push(value);
            }
            rows.push(Value::Array(cells));
        }
        Ok(Value::Array(rows))
    }
}

fn validated_widths(widths: impl IntoIterator<Item = u8>) -> Result<Vec<u8>> {
    let widths: Vec<u8> = widths.into_iter().collect();
    if widths.is_empty() {
        return Err(DisplayError::EmptyColumns);
    }
    if widths.iter().map(|w| u32::from(*w)).sum::<u32>() != 12 {
        return Err(DisplayError::InvalidColumns(widths));
    }
    Ok(widths)
}

fn validated_labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Result<Vec<String>> {
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    if labels.is_empty() {
        return Err(DisplayError::EmptyColumns);
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_must_sum_to_twelve() {
        assert!(Layout::vertical([4, 4, 4]).is_ok());
        assert!(Layout::vertical([6, 6]).is_ok());
        let err = Layout::vertical([5, 5]).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidColumns(_)));
        let err = Layout::horizontal([]).unwrap_err();
        assert!(matches!(err, DisplayError::EmptyColumns));
    }

    #[test]
    fn label_layouts_only_require_nonempty_columns() {
        assert!(Layout::tabs(["X", "Y"]).is_ok());
        let err = Layout::table(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, DisplayError::EmptyColumns));
    }

    #[test]
    fn vertical_items_flow_into_the_last_row() {
        let mut layout = Layout::vertical([4, 4, 4]).unwrap();
        layout.add_item(Item::text("A"), 0, None).unwrap();
        layout.add_item(Item::text("B"), 0, None).unwrap();
        layout.add_item(Item::text("C"), 1, None).unwrap();
        assert_eq!(layout.lines().len(), 1);
        match layout.cell(0, 0).unwrap() {
            Cell::Items(items) => assert_eq!(items.len(), 2),
            Cell::Nested(_) => panic!("expected items"),
        }
    }

    #[test]
    fn horizontal_forces_each_item_onto_its_own_row() {
        let mut layout = Layout::horizontal([12]).unwrap();
        layout.add_item(Item::text("A"), 0, None).unwrap();
        layout.add_item(Item::text("B"), 0, None).unwrap();
        assert_eq!(layout.lines().len(), 2);
    }

    #[test]
    fn explicit_line_auto_extends_rows() {
        let mut layout = Layout::vertical([6, 6]).unwrap();
        layout.add_item(Item::text("r0"), 0, Some(0)).unwrap();
        layout.add_item(Item::text("r1"), 0, Some(1)).unwrap();
        layout.add_item(Item::text("r5"), 1, Some(5)).unwrap();
        assert_eq!(layout.lines().len(), 6);
        assert!(layout.cell(1, 3).unwrap().is_empty());
        assert!(!layout.cell(1, 5).unwrap().is_empty());
    }

    #[test]
    fn column_out_of_range_is_rejected() {
        let mut layout = Layout::vertical([6, 6]).unwrap();
        let err = layout.add_item(Item::text("x"), 2, None).unwrap_err();
        assert!(matches!(err, DisplayError::ColumnOutOfRange { .. }));
    }

    #[test]
    fn spacer_accepts_no_items() {
        let mut layout = Layout::spacer(2);
        let err = layout.add_item(Item::text("x"), 0, None).unwrap_err();
        assert!(matches!(err, DisplayError::SpacerContent));
    }

    #[test]
    fn frozen_layout_rejects_items() {
        let mut layout = Layout::vertical([12]).unwrap();
        layout.frozen = true;
        let err = layout.add_item(Item::text("x"), 0, None).unwrap_err();
        assert!(matches!(err, DisplayError::FrozenLayout(_)));
    }

    #[test]
    fn nested_cell_rejects_items() {
        let mut layout = Layout::tabs(["X", "Y"]).unwrap();
        layout.attach_nested(7, 1, 0).unwrap();
        let err = layout.add_item(Item::text("x"), 1, Some(0)).unwrap_err();
        assert!(matches!(err, DisplayError::CellOccupied { .. }));
    }

    #[test]
    fn occupied_cell_rejects_nested_layout() {
        let mut layout = Layout::vertical([12]).unwrap();
        layout.add_item(Item::text("x"), 0, Some(0)).unwrap();
        let err = layout.attach_nested(3, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            DisplayError::CellOccupied { held: "items", .. }
        ));
    }

    #[test]
    fn alignment_length_is_validated() {
        let err = Layout::vertical([6, 6])
            .unwrap()
            .with_alignment(vec![Alignment::Left])
            .unwrap_err();
        assert!(matches!(err, DisplayError::AlignmentMismatch { .. }));
    }

    #[test]
    fn legacy_after_explicit_config_conflicts() {
        let config = TableConfig::interactive("t1", vec![0]).unwrap();
        let err = Layout::table(["A"])
            .unwrap()
            .with_table_config(config)
            .unwrap()
            .with_legacy_table_config("t1", &json!({ "type": "basic" }))
            .unwrap_err();
        assert!(matches!(err, DisplayError::ConflictingTableConfig));
    }

    #[test]
    fn explicit_after_legacy_config_conflicts() {
        let config = TableConfig::interactive("t1", vec![0]).unwrap();
        let err = Layout::table(["A"])
            .unwrap()
            .with_legacy_table_config("t1", &json!({ "type": "basic" }))
            .unwrap()
            .with_table_config(config)
            .unwrap_err();
        assert!(matches!(err, DisplayError::ConflictingTableConfig));
    }

    #[test]
    fn second_legacy_config_conflicts() {
        let err = Layout::table(["A"])
            .unwrap()
            .with_legacy_table_config("t1", &json!({ "type": "basic" }))
            .unwrap()
            .with_legacy_table_config("t2", &json!({ "type": "basic" }))
            .unwrap_err();
        assert!(matches!(err, DisplayError::ConflictingTableConfig));
    }

    #[test]
    fn table_config_rejected_on_flow_layouts() {
        let config = TableConfig::interactive("t1", vec![0]).unwrap();
        let err = Layout::vertical([12])
            .unwrap()
            .with_table_config(config)
            .unwrap_err();
        assert!(matches!(err, DisplayError::InvalidTableConfig(_)));
    }

    #[test]
    fn tabs_layout_pulls_tab_assets() {
        let layout = Layout::tabs(["X"]).unwrap();
        assert!(layout.required_resources().js_entries().any(|p| p == "js/tabs.js"));
    }
}
