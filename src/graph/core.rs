use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{DisplayError, Result};
use crate::item::Item;
use crate::layout::Layout;

/// Identifier assigned to a layout at registration, strictly increasing from
/// zero within one graph.
pub type LayoutId = usize;

/// Ownership arena for every layout of one composition, master and slave
/// alike.
///
/// Masters keep their page order in the owning module; slaves are reachable
/// through the `Cell::Nested` reference of their parent cell. Ids from a
/// different (typically already-serialized) graph simply miss the lookup and
/// surface as [`DisplayError::LayoutNotFound`].
#[derive(Debug, Default)]
pub struct LayoutGraph {
    layouts: HashMap<LayoutId, Layout>,
    next_id: LayoutId,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level layout. The caller records the returned id in
    /// its page-ordered sequence.
    pub fn register_master(&mut self, mut layout: Layout) -> LayoutId {
        let id = self.next_id;
        self.next_id += 1;
        layout.id = Some(id);
        self.layouts.insert(id, layout);
        id
    }

    /// Register `layout` as the sole content of the named cell of
    /// `parent_id`. The parent must exist and still be open; the cell must
    /// not already hold items or another nested layout.
    pub fn register_slave(
        &mut self,
        mut layout: Layout,
        parent_id: LayoutId,
        column: usize,
        line: usize,
    ) -> Result<LayoutId> {
        let id = self.next_id;
        {
            let parent = self
                .layouts
                .get_mut(&parent_id)
                .ok_or(DisplayError::LayoutNotFound(parent_id))?;
            if parent.frozen {
                return Err(DisplayError::FrozenLayout(parent_id));
            }
            parent.attach_nested(id, column, line)?;
        }
        self.next_id += 1;
        layout.id = Some(id);
        self.layouts.insert(id, layout);
        Ok(id)
    }

    /// Place an item into the named cell of a registered layout.
    pub fn place_item(
        &mut self,
        id: LayoutId,
        item: Item,
        column: usize,
        line: Option<usize>,
    ) -> Result<()> {
        let layout = self
            .layouts
            .get_mut(&id)
            .ok_or(DisplayError::LayoutNotFound(id))?;
        if layout.frozen {
            return Err(DisplayError::FrozenLayout(id));
        }
        layout.add_item(item, column, line)
    }

    /// O(1) lookup used by collaborators introspecting structure built by
    /// earlier application code.
    pub fn find_layout(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Freeze every registered layout. Serialization calls this first; the
    /// transition is one-way.
    pub(crate) fn freeze_all(&mut self) {
        for layout in self.layouts.values_mut() {
            layout.frozen = true;
        }
    }

    pub(crate) fn serialize_layout(
        &self,
        id: LayoutId,
        manifest: &mut Map<String, Value>,
    ) -> Result<Value> {
        self.layouts
            .get(&id)
            .ok_or(DisplayError::LayoutNotFound(id))?
            .serialize(self, manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::layout::Cell;

    #[test]
    fn master_ids_increase_from_zero() {
        let mut graph = LayoutGraph::new();
        let first = graph.register_master(Layout::vertical([12]).unwrap());
        let second = graph.register_master(Layout::vertical([6, 6]).unwrap());
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn slave_registration_links_the_parent_cell() {
        let mut graph = LayoutGraph::new();
        let tabs = graph.register_master(Layout::tabs(["X", "Y"]).unwrap());
        let table = graph
            .register_slave(Layout::table(["Name"]).unwrap(), tabs, 1, 0)
            .unwrap();

        let parent = graph.find_layout(tabs).unwrap();
        match parent.cell(1, 0).unwrap() {
            Cell::Nested(child) => assert_eq!(*child, table),
            Cell::Items(_) => panic!("expected a nested layout"),
        }
    }

    #[test]
    fn slave_against_unknown_parent_fails() {
        let mut graph = LayoutGraph::new();
        let err = graph
            .register_slave(Layout::vertical([12]).unwrap(), 42, 0, 0)
            .unwrap_err();
        assert!(matches!(err, DisplayError::LayoutNotFound(42)));
    }

    #[test]
    fn slave_against_frozen_parent_fails() {
        let mut graph = LayoutGraph::new();
        let parent = graph.register_master(Layout::vertical([12]).unwrap());
        graph.freeze_all();
        let err = graph
            .register_slave(Layout::vertical([12]).unwrap(), parent, 0, 0)
            .unwrap_err();
        assert!(matches!(err, DisplayError::FrozenLayout(_)));
    }

    #[test]
    fn failed_slave_registration_consumes_no_id() {
        let mut graph = LayoutGraph::new();
        let parent = graph.register_master(Layout::vertical([12]).unwrap());
        graph
            .place_item(parent, Item::text("occupied"), 0, Some(0))
            .unwrap();
        let err = graph
            .register_slave(Layout::vertical([12]).unwrap(), parent, 0, 0)
            .unwrap_err();
        assert!(matches!(err, DisplayError::CellOccupied { .. }));

        let next = graph.register_master(Layout::vertical([12]).unwrap());
        assert_eq!(next, 1);
    }

    #[test]
    fn place_item_on_unknown_layout_fails() {
        let mut graph = LayoutGraph::new();
        let err = graph.place_item(9, Item::text("x"), 0, None).unwrap_err();
        assert!(matches!(err, DisplayError::LayoutNotFound(9)));
    }

    #[test]
    fn place_item_on_frozen_layout_fails() {
        let mut graph = LayoutGraph::new();
        let id = graph.register_master(Layout::vertical([12]).unwrap());
        graph.freeze_all();
        let err = graph.place_item(id, Item::text("x"), 0, None).unwrap_err();
        assert!(matches!(err, DisplayError::FrozenLayout(_)));
    }
}
