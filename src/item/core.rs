use serde_json::{Map, Value, json};

use crate::error::{DisplayError, Result};
use crate::resources::ResourceSet;

/// Catalog grouping for the component showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Input,
    Display,
    Button,
    Media,
    Layout,
    Advanced,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 6] = [
        ItemCategory::Input,
        ItemCategory::Display,
        ItemCategory::Button,
        ItemCategory::Media,
        ItemCategory::Layout,
        ItemCategory::Advanced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Input => "input",
            ItemCategory::Display => "display",
            ItemCategory::Button => "button",
            ItemCategory::Media => "media",
            ItemCategory::Layout => "layout",
            ItemCategory::Advanced => "advanced",
        }
    }
}

/// Closed set of renderable item kinds.
///
/// The discriminant is separate from the payload so callers can enumerate the
/// catalogue (`ItemKind::ALL`) and ask for per-kind metadata without holding
/// an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Text,
    Alert,
    Badge,
    TableCellBadge,
    CodeBlock,
    InputString,
    InputNumber,
    Select,
    Checkbox,
    Button,
    LinkButton,
    Image,
    Icon,
    Divider,
    Chart,
}

impl ItemKind {
    pub const ALL: [ItemKind; 15] = [
        ItemKind::Text,
        ItemKind::Alert,
        ItemKind::Badge,
        ItemKind::TableCellBadge,
        ItemKind::CodeBlock,
        ItemKind::InputString,
        ItemKind::InputNumber,
        ItemKind::Select,
        ItemKind::Checkbox,
        ItemKind::Button,
        ItemKind::LinkButton,
        ItemKind::Image,
        ItemKind::Icon,
        ItemKind::Divider,
        ItemKind::Chart,
    ];

    /// Discriminator emitted in serialized output. The template renderer
    /// pattern-matches on these strings.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Text => "TEXT",
            ItemKind::Alert => "ALERT",
            ItemKind::Badge => "BADGE",
            ItemKind::TableCellBadge => "TABLE_CELL_BADGE",
            ItemKind::CodeBlock => "CODE_BLOCK",
            ItemKind::InputString => "INPUT_STRING",
            ItemKind::InputNumber => "INPUT_NUMBER",
            ItemKind::Select => "SELECT",
            ItemKind::Checkbox => "CHECKBOX",
            ItemKind::Button => "BUTTON",
            ItemKind::LinkButton => "LINK_BUTTON",
            ItemKind::Image => "IMAGE",
            ItemKind::Icon => "ICON",
            ItemKind::Divider => "DIVIDER",
            ItemKind::Chart => "CHART",
        }
    }

    pub fn category(self) -> ItemCategory {
        match self {
            ItemKind::Text
            | ItemKind::Alert
            | ItemKind::Badge
            | ItemKind::TableCellBadge
            | ItemKind::CodeBlock => ItemCategory::Display,
            ItemKind::InputString | ItemKind::InputNumber | ItemKind::Select | ItemKind::Checkbox => {
                ItemCategory::Input
            }
            ItemKind::Button | ItemKind::LinkButton => ItemCategory::Button,
            ItemKind::Image | ItemKind::Icon => ItemCategory::Media,
            ItemKind::Divider => ItemCategory::Layout,
            ItemKind::Chart => ItemCategory::Advanced,
        }
    }

    /// Assets this kind needs in the page head. Most kinds ride on the base
    /// stylesheet and declare nothing.
    pub fn resources(self) -> ResourceSet {
        match self {
            ItemKind::Badge | ItemKind::TableCellBadge => {
                ResourceSet::new().css("css/badges.css")
            }
            ItemKind::CodeBlock => ResourceSet::new()
                .cdn_css("https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/default.min.css")
                .cdn_js("https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js"),
            ItemKind::Select => ResourceSet::new()
                .css("css/choices.css")
                .js("js/choices.js"),
            ItemKind::Icon => ResourceSet::new()
                .cdn_css("https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css"),
            ItemKind::Chart => ResourceSet::new()
                .css("css/charts.css")
                .cdn_js("https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js"),
            _ => ResourceSet::new(),
        }
    }

    /// Minimal valid instance of this kind with representative defaults.
    ///
    /// Backs the automated test suite and the live component showcase, so it
    /// must succeed for every kind.
    pub fn self_test(self) -> Item {
        let payload = match self {
            ItemKind::Text => ItemPayload::Text {
                text: "Sample text".into(),
                style: None,
            },
            ItemKind::Alert => ItemPayload::Alert {
                text: "Sample alert".into(),
                severity: AlertSeverity::Info,
            },
            ItemKind::Badge => ItemPayload::Badge {
                text: "new".into(),
                style: None,
            },
            ItemKind::TableCellBadge => ItemPayload::TableCellBadge {
                text: "ok".into(),
                style: Some("success".into()),
            },
            ItemKind::CodeBlock => ItemPayload::CodeBlock {
                code: "fn main() {}".into(),
                language: Some("rust".into()),
            },
            ItemKind::InputString => ItemPayload::InputString {
                name: "sample_string".into(),
                label: "Sample string".into(),
                value: None,
            },
            ItemKind::InputNumber => ItemPayload::InputNumber {
                name: "sample_number".into(),
                label: "Sample number".into(),
                value: Some(42.0),
            },
            ItemKind::Select => ItemPayload::Select {
                name: "sample_select".into(),
                label: "Sample select".into(),
                choices: vec!["One".into(), "Two".into()],
                selected: Some(0),
            },
            ItemKind::Checkbox => ItemPayload::Checkbox {
                name: "sample_checkbox".into(),
                label: "Sample checkbox".into(),
                checked: false,
            },
            ItemKind::Button => ItemPayload::Button {
                label: "Submit".into(),
                action: "sample_action".into(),
                style: None,
            },
            ItemKind::LinkButton => ItemPayload::LinkButton {
                label: "Open".into(),
                link: "/sample".into(),
                style: None,
            },
            ItemKind::Image => ItemPayload::Image {
                src: "/static/sample.png".into(),
                alt: Some("Sample image".into()),
            },
            ItemKind::Icon => ItemPayload::Icon {
                name: "fa-gear".into(),
            },
            ItemKind::Divider => ItemPayload::Divider,
            ItemKind::Chart => ItemPayload::Chart {
                chart_id: "sample_chart".into(),
                flavor: ChartFlavor::Line,
                series: vec![ChartSeries {
                    name: "samples".into(),
                    values: vec![1.0, 2.0, 3.0],
                }],
            },
        };
        Item { id: None, payload }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Info,
    Success,
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn label(self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Success => "success",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFlavor {
    Line,
    Bar,
    Pie,
}

impl ChartFlavor {
    pub fn label(self) -> &'static str {
        match self {
            ChartFlavor::Line => "line",
            ChartFlavor::Bar => "bar",
            ChartFlavor::Pie => "pie",
        }
    }
}

/// One named series of a chart item.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Kind-specific payload data.
#[derive(Debug, Clone)]
pub enum ItemPayload {
    Text {
        text: String,
        style: Option<String>,
    },
    Alert {
        text: String,
        severity: AlertSeverity,
    },
    Badge {
        text: String,
        style: Option<String>,
    },
    TableCellBadge {
        text: String,
        style: Option<String>,
    },
    CodeBlock {
        code: String,
        language: Option<String>,
    },
    InputString {
        name: String,
        label: String,
        value: Option<String>,
    },
    InputNumber {
        name: String,
        label: String,
        value: Option<f64>,
    },
    Select {
        name: String,
        label: String,
        choices: Vec<String>,
        selected: Option<usize>,
    },
    Checkbox {
        name: String,
        label: String,
        checked: bool,
    },
    Button {
        label: String,
        action: String,
        style: Option<String>,
    },
    LinkButton {
        label: String,
        link: String,
        style: Option<String>,
    },
    Image {
        src: String,
        alt: Option<String>,
    },
    Icon {
        name: String,
    },
    Divider,
    Chart {
        chart_id: String,
        flavor: ChartFlavor,
        series: Vec<ChartSeries>,
    },
}

/// A renderable unit placed into exactly one layout cell.
///
/// The optional `id` makes the item addressable for partial-page reloads;
/// items without one are anonymous.
#[derive(Debug, Clone)]
pub struct Item {
    id: Option<String>,
    payload: ItemPayload,
}

impl Item {
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_payload(ItemPayload::Text {
            text: text.into(),
            style: None,
        })
    }

    pub fn styled_text(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self::from_payload(ItemPayload::Text {
            text: text.into(),
            style: Some(style.into()),
        })
    }

    pub fn alert(text: impl Into<String>, severity: AlertSeverity) -> Self {
        Self::from_payload(ItemPayload::Alert {
            text: text.into(),
            severity,
        })
    }

    pub fn badge(text: impl Into<String>, style: Option<String>) -> Self {
        Self::from_payload(ItemPayload::Badge {
            text: text.into(),
            style,
        })
    }

    pub fn table_cell_badge(text: impl Into<String>, style: Option<String>) -> Self {
        Self::from_payload(ItemPayload::TableCellBadge {
            text: text.into(),
            style,
        })
    }

    pub fn code_block(code: impl Into<String>, language: Option<String>) -> Self {
        Self::from_payload(ItemPayload::CodeBlock {
            code: code.into(),
            language,
        })
    }

    pub fn input_string(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::from_payload(ItemPayload::InputString {
            name: name.into(),
            label: label.into(),
            value: None,
        })
    }

    pub fn input_number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::from_payload(ItemPayload::InputNumber {
            name: name.into(),
            label: label.into(),
            value: None,
        })
    }

    /// Fails fast when `choices` is empty or `selected` falls outside it.
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        choices: Vec<String>,
        selected: Option<usize>,
    ) -> Result<Self> {
        if choices.is_empty() {
            return Err(DisplayError::InvalidItem(
                "select requires at least one choice".into(),
            ));
        }
        if let Some(idx) = selected {
            if idx >= choices.len() {
                return Err(DisplayError::InvalidItem(format!(
                    "selected index {idx} outside {} choices",
                    choices.len()
                )));
            }
        }
        Ok(Self::from_payload(ItemPayload::Select {
            name: name.into(),
            label: label.into(),
            choices,
            selected,
        }))
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self::from_payload(ItemPayload::Checkbox {
            name: name.into(),
            label: label.into(),
            checked,
        })
    }

    pub fn button(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self::from_payload(ItemPayload::Button {
            label: label.into(),
            action: action.into(),
            style: None,
        })
    }

    pub fn link_button(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self::from_payload(ItemPayload::LinkButton {
            label: label.into(),
            link: link.into(),
            style: None,
        })
    }

    pub fn image(src: impl Into<String>, alt: Option<String>) -> Self {
        Self::from_payload(ItemPayload::Image {
            src: src.into(),
            alt,
        })
    }

    pub fn icon(name: impl Into<String>) -> Self {
        Self::from_payload(ItemPayload::Icon { name: name.into() })
    }

    pub fn divider() -> Self {
        Self::from_payload(ItemPayload::Divider)
    }

    /// Fails fast on an empty series list.
    pub fn chart(
        chart_id: impl Into<String>,
        flavor: ChartFlavor,
        series: Vec<ChartSeries>,
    ) -> Result<Self> {
        if series.is_empty() {
            return Err(DisplayError::InvalidItem(
                "chart requires at least one series".into(),
            ));
        }
        Ok(Self::from_payload(ItemPayload::Chart {
            chart_id: chart_id.into(),
            flavor,
            series,
        }))
    }

    fn from_payload(payload: ItemPayload) -> Self {
        Self { id: None, payload }
    }

    /// Attach a stable identifier for later partial-page addressing.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn kind(&self) -> ItemKind {
        match self.payload {
            ItemPayload::Text { .. } => ItemKind::Text,
            ItemPayload::Alert { .. } => ItemKind::Alert,
            ItemPayload::Badge { .. } => ItemKind::Badge,
            ItemPayload::TableCellBadge { .. } => ItemKind::TableCellBadge,
            ItemPayload::CodeBlock { .. } => ItemKind::CodeBlock,
            ItemPayload::InputString { .. } => ItemKind::InputString,
            ItemPayload::InputNumber { .. } => ItemKind::InputNumber,
            ItemPayload::Select { .. } => ItemKind::Select,
            ItemPayload::Checkbox { .. } => ItemKind::Checkbox,
            ItemPayload::Button { .. } => ItemKind::Button,
            ItemPayload::LinkButton { .. } => ItemKind::LinkButton,
            ItemPayload::Image { .. } => ItemKind::Image,
            ItemPayload::Icon { .. } => ItemKind::Icon,
            ItemPayload::Divider => ItemKind::Divider,
            ItemPayload::Chart { .. } => ItemKind::Chart,
        }
    }

    pub fn category(&self) -> ItemCategory {
        self.kind().category()
    }

    pub fn payload(&self) -> &ItemPayload {
        &self.payload
    }

    pub fn required_resources(&self) -> ResourceSet {
        self.kind().resources()
    }

    /// Pure serialization to a plain mapping with no remaining object
    /// references. Always carries the `kind` discriminator.
    pub fn serialize(&self) -> Value {
        let mut map = Map::new();
        map.insert("kind".into(), json!(self.kind().label()));
        map.insert("category".into(), json!(self.category().label()));
        if let Some(id) = &self.id {
            map.insert("id".into(), json!(id));
        }
        match &self.payload {
            ItemPayload::Text { text, style } => {
                map.insert("text".into(), json!(text));
                if let Some(style) = style {
                    map.insert("style".into(), json!(style));
                }
            }
            ItemPayload::Alert { text, severity } => {
                map.insert("text".into(), json!(text));
                map.insert("severity".into(), json!(severity.label()));
            }
            ItemPayload::Badge { text, style } | ItemPayload::TableCellBadge { text, style } => {
                map.insert("text".into(), json!(text));
                if let Some(style) = style {
                    map.insert("style".into(), json!(style));
                }
            }
            ItemPayload::CodeBlock { code, language } => {
                map.insert("code".into(), json!(code));
                if let Some(language) = language {
                    map.insert("language".into(), json!(language));
                }
            }
            ItemPayload::InputString { name, label, value } => {
                map.insert("name".into(), json!(name));
                map.insert("label".into(), json!(label));
                map.insert("value".into(), json!(value));
            }
            ItemPayload::InputNumber { name, label, value } => {
                map.insert("name".into(), json!(name));
                map.insert("label".into(), json!(label));
                map.insert("value".into(), json!(value));
            }
            ItemPayload::Select {
                name,
                label,
                choices,
                selected,
            } => {
                map.insert("name".into(), json!(name));
                map.insert("label".into(), json!(label));
                map.insert("choices".into(), json!(choices));
                map.insert("selected".into(), json!(selected));
            }
            ItemPayload::Checkbox {
                name,
                label,
                checked,
            } => {
                map.insert("name".into(), json!(name));
                map.insert("label".into(), json!(label));
                map.insert("checked".into(), json!(checked));
            }
            ItemPayload::Button {
                label,
                action,
                style,
            } => {
                map.insert("label".into(), json!(label));
                map.insert("action".into(), json!(action));
                if let Some(style) = style {
                    map.insert("style".into(), json!(style));
                }
            }
            ItemPayload::LinkButton { label, link, style } => {
                map.insert("label".into(), json!(label));
                map.insert("link".into(), json!(link));
                if let Some(style) = style {
                    map.insert("style".into(), json!(style));
                }
            }
            ItemPayload::Image { src, alt } => {
                map.insert("src".into(), json!(src));
                if let Some(alt) = alt {
                    map.insert("alt".into(), json!(alt));
                }
            }
            ItemPayload::Icon { name } => {
                map.insert("name".into(), json!(name));
            }
            ItemPayload::Divider => {}
            ItemPayload::Chart {
                chart_id,
                flavor,
                series,
            } => {
                map.insert("chart_id".into(), json!(chart_id));
                map.insert("flavor".into(), json!(flavor.label()));
                let series: Vec<Value> = series
                    .iter()
                    .map(|s| json!({ "name": s.name, "values": s.values }))
                    .collect();
                map.insert("series".into(), json!(series));
            }
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_self_tests_and_serializes() {
        for kind in ItemKind::ALL {
            let item = kind.self_test();
            assert_eq!(item.kind(), kind);
            let value = item.serialize();
            let map = value.as_object().expect("item serializes to a mapping");
            assert_eq!(map["kind"], json!(kind.label()));
            assert_eq!(map["category"], json!(kind.category().label()));
        }
    }

    #[test]
    fn select_rejects_empty_choices() {
        let err = Item::select("s", "Select", Vec::new(), None).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidItem(_)));
    }

    #[test]
    fn select_rejects_out_of_range_selection() {
        let err = Item::select("s", "Select", vec!["a".into()], Some(3)).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidItem(_)));
    }

    #[test]
    fn chart_rejects_empty_series() {
        let err = Item::chart("c", ChartFlavor::Bar, Vec::new()).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidItem(_)));
    }

    #[test]
    fn item_id_survives_serialization() {
        let value = Item::text("hello").with_id("greeting").serialize();
        assert_eq!(value["id"], json!("greeting"));
        assert_eq!(value["text"], json!("hello"));
    }

    #[test]
    fn categories_cover_whole_catalogue() {
        for category in ItemCategory::ALL {
            assert!(
                ItemKind::ALL.iter().any(|k| k.category() == category),
                "category {:?} has no kinds",
                category
            );
        }
    }
}
