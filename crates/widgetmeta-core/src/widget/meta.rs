//! Accessor bound to a single widget's meta entry.

use serde_json::Value;

use crate::action::{MetaAction, PanePosition};
use crate::state::WidgetMetaProps;
use crate::store::MetaStore;

/// Read/write access to one widget's meta properties.
pub struct WidgetMeta<'a> {
    store: &'a mut MetaStore,
    widget_id: String,
}

impl<'a> WidgetMeta<'a> {
    pub(crate) fn new(store: &'a mut MetaStore, widget_id: String) -> Self {
        Self { store, widget_id }
    }

    /// The widget this accessor is bound to.
    pub fn id(&self) -> &str {
        &self.widget_id
    }

    /// True if the widget has an entry, even an empty one.
    pub fn is_present(&self) -> bool {
        self.store.state().contains(&self.widget_id)
    }

    /// All meta properties, `None` if the widget has no meta yet.
    pub fn props(&self) -> Option<&WidgetMetaProps> {
        self.store.widget_meta(&self.widget_id)
    }

    /// One property by dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.store.state().get(&self.widget_id, path)
    }

    /// Set one property by dotted path (user interaction).
    pub fn set(&mut self, path: &str, value: Value) {
        self.store
            .dispatch(MetaAction::set(self.widget_id.clone(), path, value));
    }

    /// Clear all of this widget's meta properties.
    ///
    /// The entry is emptied, not removed: [`is_present`](Self::is_present)
    /// stays true afterwards.
    pub fn reset(&mut self) {
        self.store
            .dispatch(MetaAction::reset(self.widget_id.clone()));
    }

    /// Record that the widget's floating pane moved.
    pub fn moved(&mut self, position: PanePosition) {
        self.store.dispatch(MetaAction::PaneMoved {
            widget_id: self.widget_id.clone(),
            position,
        });
    }
}
