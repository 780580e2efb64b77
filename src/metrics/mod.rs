use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Saturating counters for one composition pass.
#[derive(Debug, Default, Clone)]
pub struct CompositionMetrics {
    modules: u64,
    master_layouts: u64,
    slave_layouts: u64,
    items: u64,
    displays: u64,
}

impl CompositionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_module(&mut self) {
        self.modules = self.modules.saturating_add(1);
    }

    pub fn record_master_layout(&mut self) {
        self.master_layouts = self.master_layouts.saturating_add(1);
    }

    pub fn record_slave_layout(&mut self) {
        self.slave_layouts = self.slave_layouts.saturating_add(1);
    }

    pub fn record_item(&mut self) {
        self.items = self.items.saturating_add(1);
    }

    pub fn record_display(&mut self) {
        self.displays = self.displays.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            modules: self.modules,
            master_layouts: self.master_layouts,
            slave_layouts: self.slave_layouts,
            items: self.items,
            displays: self.displays,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub modules: u64,
    pub master_layouts: u64,
    pub slave_layouts: u64,
    pub items: u64,
    pub displays: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "composition_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("modules".to_string(), json!(self.modules));
        map.insert("master_layouts".to_string(), json!(self.master_layouts));
        map.insert("slave_layouts".to_string(), json!(self.slave_layouts));
        map.insert("items".to_string(), json!(self.items));
        map.insert("displays".to_string(), json!(self.displays));
        map
    }
}
