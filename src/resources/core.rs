use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

/// Bundle of CSS/JS assets a component kind needs in the rendered page.
///
/// Backed by ordered sets so repeated registration is idempotent and the
/// serialized manifest is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet {
    css: BTreeSet<String>,
    js: BTreeSet<String>,
    cdn_css: BTreeSet<String>,
    cdn_js: BTreeSet<String>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn css(mut self, path: impl Into<String>) -> Self {
        self.css.insert(path.into());
        self
    }

    pub fn js(mut self, path: impl Into<String>) -> Self {
        self.js.insert(path.into());
        self
    }

    pub fn cdn_css(mut self, url: impl Into<String>) -> Self {
        self.cdn_css.insert(url.into());
        self
    }

    pub fn cdn_js(mut self, url: impl Into<String>) -> Self {
        self.cdn_js.insert(url.into());
        self
    }

    /// Union `other` into this set. Duplicate entries collapse.
    pub fn merge(&mut self, other: &ResourceSet) {
        self.css.extend(other.css.iter().cloned());
        self.js.extend(other.js.iter().cloned());
        self.cdn_css.extend(other.cdn_css.iter().cloned());
        self.cdn_js.extend(other.cdn_js.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.css.is_empty() && self.js.is_empty() && self.cdn_css.is_empty() && self.cdn_js.is_empty()
    }

    /// Total number of distinct assets across all four buckets.
    pub fn len(&self) -> usize {
        self.css.len() + self.js.len() + self.cdn_css.len() + self.cdn_js.len()
    }

    pub fn css_entries(&self) -> impl Iterator<Item = &str> {
        self.css.iter().map(String::as_str)
    }

    pub fn js_entries(&self) -> impl Iterator<Item = &str> {
        self.js.iter().map(String::as_str)
    }

    pub fn cdn_css_entries(&self) -> impl Iterator<Item = &str> {
        self.cdn_css.iter().map(String::as_str)
    }

    pub fn cdn_js_entries(&self) -> impl Iterator<Item = &str> {
        self.cdn_js.iter().map(String::as_str)
    }

    /// Manifest fields consumed by the template renderer. Key names are a
    /// stable contract.
    pub(crate) fn write_manifest(&self, out: &mut Map<String, Value>) {
        out.insert("required_css".into(), json!(self.css));
        out.insert("required_js".into(), json!(self.js));
        out.insert("required_cdn_css".into(), json!(self.cdn_css));
        out.insert("required_cdn_js".into(), json!(self.cdn_js));
    }
}

/// Accumulator for the resources actually used during one composition.
///
/// Owned by each [`crate::Displayer`] instance rather than living in process
/// state, so two compositions can never leak requirements into each other.
/// `reset` is called at composition start.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    required: ResourceSet,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything accumulated so far. Called when a composition begins.
    pub fn reset(&mut self) {
        self.required = ResourceSet::new();
    }

    /// Record that the current composition needs `set`. Idempotent.
    pub fn require(&mut self, set: &ResourceSet) {
        self.required.merge(set);
    }

    pub fn required(&self) -> &ResourceSet {
        &self.required
    }
}
