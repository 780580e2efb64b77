//! Composition root: one `Displayer` instance owns one page's modules,
//! layouts, and items for one render pass.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value, json};

use crate::error::{DisplayError, Result};
use crate::graph::{LayoutGraph, LayoutId};
use crate::item::Item;
use crate::layout::Layout;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::CompositionMetrics;
use crate::resources::ResourceRegistry;

pub mod showcase;

/// Configuration knobs for a composition pass.
#[derive(Clone)]
pub struct DisplayerConfig {
    /// Optional structured logger used by the composition root.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the embedding application.
    pub metrics: Option<Arc<Mutex<CompositionMetrics>>>,
    /// Target field used when emitting the metrics snapshot at display time.
    pub metrics_target: String,
}

impl Default for DisplayerConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_target: "displayer::compose.metrics".to_string(),
        }
    }
}

impl DisplayerConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(CompositionMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<CompositionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Named, permission-aware section of a page. The access flag and reason are
/// supplied by an external authorization collaborator; the engine carries
/// and serializes them without interpreting them.
#[derive(Debug, Clone)]
pub struct ModuleSpec {
    pub name: String,
    pub access_denied: bool,
    pub denied_reason: Option<String>,
}

impl ModuleSpec {
    pub fn allowed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access_denied: false,
            denied_reason: None,
        }
    }

    pub fn denied(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access_denied: true,
            denied_reason: Some(reason.into()),
        }
    }
}

impl From<&str> for ModuleSpec {
    fn from(name: &str) -> Self {
        Self::allowed(name)
    }
}

impl From<String> for ModuleSpec {
    fn from(name: String) -> Self {
        Self::allowed(name)
    }
}

/// Page-metadata breadcrumb, serialized in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub link: Option<String>,
}

struct Module {
    spec: ModuleSpec,
    masters: Vec<LayoutId>,
}

/// Builds one page: modules in order, layouts addressed by id, items placed
/// into `(layout, column, line)` cells, resources accumulated as kinds are
/// used.
///
/// Instances are single-threaded and throwaway; background emitters build
/// their own short-lived instance rather than sharing one.
pub struct Displayer {
    graph: LayoutGraph,
    registry: ResourceRegistry,
    modules: Vec<Module>,
    title: Option<String>,
    breadcrumbs: Vec<Breadcrumb>,
    cursor: Option<LayoutId>,
    displayed: bool,
    config: DisplayerConfig,
}

impl Default for Displayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Displayer {
    pub fn new() -> Self {
        Self::with_config(DisplayerConfig::default())
    }

    pub fn with_config(config: DisplayerConfig) -> Self {
        let mut registry = ResourceRegistry::new();
        registry.reset();
        Self {
            graph: LayoutGraph::new(),
            registry,
            modules: Vec::new(),
            title: None,
            breadcrumbs: Vec::new(),
            cursor: None,
            displayed: false,
            config,
        }
    }

    pub fn config_mut(&mut self) -> &mut DisplayerConfig {
        &mut self.config
    }

    /// Begin a new named section. Subsequent layout and item calls target
    /// this module until another is added.
    pub fn add_module(&mut self, spec: impl Into<ModuleSpec>) -> Result<()> {
        self.ensure_mutable()?;
        let spec = spec.into();
        self.log_compose(
            LogLevel::Debug,
            "displayer::compose",
            "module_opened",
            [
                json_kv("module", json!(spec.name)),
                json_kv("access_denied", json!(spec.access_denied)),
            ],
        );
        self.modules.push(Module {
            spec,
            masters: Vec::new(),
        });
        self.cursor = None;
        self.record_metric(CompositionMetrics::record_module);
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.ensure_mutable()?;
        self.title = Some(title.into());
        Ok(())
    }

    pub fn add_breadcrumb(&mut self, label: impl Into<String>, link: Option<String>) -> Result<()> {
        self.ensure_mutable()?;
        self.breadcrumbs.push(Breadcrumb {
            label: label.into(),
            link,
        });
        Ok(())
    }

    /// Append a layout to the current module's page order.
    pub fn add_master_layout(&mut self, layout: Layout) -> Result<LayoutId> {
        self.ensure_mutable()?;
        if self.modules.is_empty() {
            return Err(DisplayError::NoCurrentModule);
        }
        let layout = self.intake_layout(layout);
        let id = self.graph.register_master(layout);
        self.modules
            .last_mut()
            .ok_or(DisplayError::NoCurrentModule)?
            .masters
            .push(id);
        self.cursor = Some(id);
        self.record_metric(CompositionMetrics::record_master_layout);
        self.log_compose(
            LogLevel::Debug,
            "displayer::graph",
            "master_registered",
            [json_kv("layout_id", json!(id))],
        );
        Ok(id)
    }

    /// Nest a layout inside line 0 of the named cell. With `layout_id =
    /// None` the parent resolves to the most recently registered layout.
    pub fn add_slave_layout(
        &mut self,
        layout: Layout,
        column: usize,
        layout_id: Option<LayoutId>,
    ) -> Result<LayoutId> {
        self.add_slave_layout_at(layout, column, 0, layout_id)
    }

    /// Nest a layout inside an explicit `(column, line)` cell. Collaborators
    /// building structure out of call order pass the parent id explicitly.
    pub fn add_slave_layout_at(
        &mut self,
        layout: Layout,
        column: usize,
        line: usize,
        layout_id: Option<LayoutId>,
    ) -> Result<LayoutId> {
        self.ensure_mutable()?;
        let parent = self.resolve_layout_id(layout_id)?;
        let layout = self.intake_layout(layout);
        let id = self.graph.register_slave(layout, parent, column, line)?;
        self.cursor = Some(id);
        self.record_metric(CompositionMetrics::record_slave_layout);
        self.log_compose(
            LogLevel::Debug,
            "displayer::graph",
            "slave_registered",
            [
                json_kv("layout_id", json!(id)),
                json_kv("parent", json!(parent)),
                json_kv("column", json!(column)),
            ],
        );
        Ok(id)
    }

    /// Place an item. With `layout_id = None` the target resolves to the
    /// most recently registered layout.
    pub fn add_display_item(
        &mut self,
        item: Item,
        column: usize,
        line: Option<usize>,
        layout_id: Option<LayoutId>,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let target = self.resolve_layout_id(layout_id)?;
        self.registry.require(&item.required_resources());
        self.graph.place_item(target, item, column, line)?;
        self.record_metric(CompositionMetrics::record_item);
        Ok(())
    }

    /// O(1) lookup for collaborators introspecting structure built by
    /// earlier application code.
    pub fn find_layout(&self, id: LayoutId) -> Option<&Layout> {
        self.graph.find_layout(id)
    }

    /// Serialize the whole composition. Freezes every layout; mutating the
    /// displayer afterwards is rejected, while calling `display` again
    /// returns the same value.
    ///
    /// Denied modules keep their flag and reason in the output but drop
    /// their layouts unless `bypass_auth` is set (background emitters
    /// re-rendering fragments set it).
    pub fn display(&mut self, bypass_auth: bool) -> Result<Value> {
        self.graph.freeze_all();
        self.displayed = true;

        let mut manifest = Map::new();
        let mut modules = Map::new();
        for module in &self.modules {
            let mut entry = Map::new();
            entry.insert("access_denied".into(), json!(module.spec.access_denied));
            if let Some(reason) = &module.spec.denied_reason {
                entry.insert("denied_reason".into(), json!(reason));
            }
            let layouts: Vec<Value> = if module.spec.access_denied && !bypass_auth {
                Vec::new()
            } else {
                module
                    .masters
                    .iter()
                    .map(|id| self.graph.serialize_layout(*id, &mut manifest))
                    .collect::<Result<_>>()?
            };
            entry.insert("layouts".into(), Value::Array(layouts));
            modules.insert(module.spec.name.clone(), Value::Object(entry));
        }

        let mut out = Map::new();
        out.insert("title".into(), json!(self.title));
        let breadcrumbs: Vec<Value> = self
            .breadcrumbs
            .iter()
            .map(|b| json!({ "label": b.label, "link": b.link }))
            .collect();
        out.insert("breadcrumbs".into(), json!(breadcrumbs));
        out.insert("modules".into(), Value::Object(modules));
        self.registry.required().write_manifest(&mut out);
        out.insert("tables".into(), Value::Object(manifest));

        self.record_metric(CompositionMetrics::record_display);
        self.log_compose(
            LogLevel::Info,
            "displayer::compose",
            "display_completed",
            [
                json_kv("modules", json!(self.modules.len())),
                json_kv("layouts", json!(self.graph.len())),
                json_kv("bypass_auth", json!(bypass_auth)),
            ],
        );
        self.emit_metrics_snapshot();

        Ok(Value::Object(out))
    }

    /// Register layout-level resources and surface the deprecation notice a
    /// legacy table config carried.
    fn intake_layout(&mut self, mut layout: Layout) -> Layout {
        self.registry.require(&layout.required_resources());
        if let Some(notice) = layout.take_legacy_notice() {
            self.log_compose(
                LogLevel::Warn,
                "displayer::table",
                "legacy_table_config",
                [json_kv("notice", json!(notice))],
            );
        }
        layout
    }

    fn resolve_layout_id(&self, layout_id: Option<LayoutId>) -> Result<LayoutId> {
        layout_id
            .or(self.cursor)
            .ok_or(DisplayError::NoCurrentLayout)
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.displayed {
            return Err(DisplayError::AlreadyDisplayed);
        }
        Ok(())
    }

    fn log_compose<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_metric(&self, record: impl FnOnce(&mut CompositionMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn emit_metrics_snapshot(&self) {
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let _ = logger.log_event(guard.snapshot().to_log_event(target));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Cell;

    #[test]
    fn layouts_require_an_open_module() {
        let mut displayer = Displayer::new();
        let err = displayer
            .add_master_layout(Layout::vertical([12]).unwrap())
            .unwrap_err();
        assert!(matches!(err, DisplayError::NoCurrentModule));
    }

    #[test]
    fn items_without_cursor_need_an_explicit_id() {
        let mut displayer = Displayer::new();
        displayer.add_module("home").unwrap();
        let err = displayer
            .add_display_item(Item::text("x"), 0, None, None)
            .unwrap_err();
        assert!(matches!(err, DisplayError::NoCurrentLayout));
    }

    #[test]
    fn cursor_follows_most_recent_layout() {
        let mut displayer = Displayer::new();
        displayer.add_module("home").unwrap();
        let first = displayer
            .add_master_layout(Layout::vertical([12]).unwrap())
            .unwrap();
        let second = displayer
            .add_master_layout(Layout::vertical([12]).unwrap())
            .unwrap();
        displayer
            .add_display_item(Item::text("latest"), 0, None, None)
            .unwrap();
        displayer
            .add_display_item(Item::text("first"), 0, None, Some(first))
            .unwrap();

        match displayer.find_layout(second).unwrap().cell(0, 0).unwrap() {
            Cell::Items(items) => assert_eq!(items.len(), 1),
            Cell::Nested(_) => panic!("expected items"),
        }
    }

    #[test]
    fn mutation_after_display_is_rejected() {
        let mut displayer = Displayer::new();
        displayer.add_module("home").unwrap();
        displayer
            .add_master_layout(Layout::vertical([12]).unwrap())
            .unwrap();
        displayer.display(false).unwrap();

        let err = displayer.add_module("late").unwrap_err();
        assert!(matches!(err, DisplayError::AlreadyDisplayed));
        let err = displayer
            .add_display_item(Item::text("x"), 0, None, None)
            .unwrap_err();
        assert!(matches!(err, DisplayError::AlreadyDisplayed));
    }

    #[test]
    fn display_is_repeatable_without_mutation() {
        let mut displayer = Displayer::new();
        displayer.add_module("home").unwrap();
        displayer
            .add_master_layout(Layout::vertical([12]).unwrap())
            .unwrap();
        displayer
            .add_display_item(Item::text("A"), 0, None, None)
            .unwrap();
        let first = displayer.display(false).unwrap();
        let second = displayer.display(false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn denied_module_keeps_flag_and_drops_layouts() {
        let mut displayer = Displayer::new();
        displayer
            .add_module(ModuleSpec::denied("admin", "missing role"))
            .unwrap();
        displayer
            .add_master_layout(Layout::vertical([12]).unwrap())
            .unwrap();
        let out = displayer.display(false).unwrap();

        let module = &out["modules"]["admin"];
        assert_eq!(module["access_denied"], json!(true));
        assert_eq!(module["denied_reason"], json!("missing role"));
        assert_eq!(module["layouts"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn bypass_auth_serializes_denied_layouts() {
        let mut displayer = Displayer::new();
        displayer
            .add_module(ModuleSpec::denied("admin", "missing role"))
            .unwrap();
        displayer
            .add_master_layout(Layout::vertical([12]).unwrap())
            .unwrap();
        let out = displayer.display(true).unwrap();
        assert_eq!(out["modules"]["admin"]["layouts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn breadcrumbs_preserve_insertion_order() {
        let mut displayer = Displayer::new();
        displayer.add_module("home").unwrap();
        displayer.add_breadcrumb("Home", Some("/".into())).unwrap();
        displayer.add_breadcrumb("Hosts", None).unwrap();
        let out = displayer.display(false).unwrap();
        let crumbs = out["breadcrumbs"].as_array().unwrap();
        assert_eq!(crumbs[0]["label"], json!("Home"));
        assert_eq!(crumbs[1]["label"], json!("Hosts"));
    }
}
