//! Meta-state snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::PropertyPath;

/// Opaque widget identifier, unique within a loaded page.
pub type WidgetId = String;

/// Schema-less meta properties of one widget.
pub type WidgetMetaProps = Map<String, Value>;

/// An immutable snapshot of every mounted widget's meta properties.
///
/// Cloning is cheap: the index and each widget's properties sit behind
/// `Arc`s, and transitions copy only what they touch. A snapshot handed
/// out earlier never observes later transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaState {
    widgets: Arc<BTreeMap<WidgetId, Arc<WidgetMetaProps>>>,
}

impl MetaState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from a JSON object keyed by widget id.
    ///
    /// Entries whose value is not an object are skipped.
    pub fn from_value(value: &Value) -> Self {
        let mut widgets = BTreeMap::new();
        if let Value::Object(map) = value {
            for (id, props) in map {
                if let Value::Object(props) = props {
                    widgets.insert(id.clone(), Arc::new(props.clone()));
                }
            }
        }
        Self {
            widgets: Arc::new(widgets),
        }
    }

    /// The whole state as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.widgets
                .iter()
                .map(|(id, props)| (id.clone(), Value::Object(props.as_ref().clone())))
                .collect(),
        )
    }

    /// Meta properties of a widget, if it has an entry.
    pub fn widget(&self, id: &str) -> Option<&WidgetMetaProps> {
        self.widgets.get(id).map(|props| props.as_ref())
    }

    /// Shared handle to a widget's properties.
    pub fn widget_shared(&self, id: &str) -> Option<Arc<WidgetMetaProps>> {
        self.widgets.get(id).cloned()
    }

    /// Check whether a widget has an entry (possibly empty).
    pub fn contains(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }

    /// Read one property of a widget by dotted path.
    pub fn get(&self, id: &str, path: &str) -> Option<&Value> {
        let path = PropertyPath::parse(path).ok()?;
        path.get_in(self.widget(id)?)
    }

    /// Ids of all widgets with an entry, in order.
    pub fn widget_ids(&self) -> impl Iterator<Item = &str> {
        self.widgets.keys().map(String::as_str)
    }

    /// Number of widget entries.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// True if no widget has an entry.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// True if both snapshots share the same index allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.widgets, &other.widgets)
    }

    /// True if both snapshots share the same allocation for a widget's
    /// properties.
    pub fn shares_widget(&self, other: &Self, id: &str) -> bool {
        match (self.widgets.get(id), other.widgets.get(id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    // --- Copy-on-write access for the reducer ---

    /// Mutable access to the widget index, copying it if shared.
    pub(crate) fn widgets_mut(&mut self) -> &mut BTreeMap<WidgetId, Arc<WidgetMetaProps>> {
        Arc::make_mut(&mut self.widgets)
    }

    /// Mutable access to a widget's properties, creating an empty entry if
    /// absent and copying the properties if shared.
    pub(crate) fn widget_mut(&mut self, id: &str) -> &mut WidgetMetaProps {
        let entry = self.widgets_mut().entry(id.to_string()).or_default();
        Arc::make_mut(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_skips_non_objects() {
        let state = MetaState::from_value(&json!({
            "w1": { "value": "x" },
            "w2": 5,
        }));
        assert_eq!(state.len(), 1);
        assert!(state.contains("w1"));
        assert!(!state.contains("w2"));
    }

    #[test]
    fn test_get_by_path() {
        let state = MetaState::from_value(&json!({
            "table1": { "position": { "left": 10, "top": 20 } },
        }));
        assert_eq!(state.get("table1", "position.left"), Some(&json!(10)));
        assert_eq!(state.get("table1", "position.right"), None);
        assert_eq!(state.get("table2", "position"), None);
        assert_eq!(state.get("table1", ""), None);
    }

    #[test]
    fn test_serde_is_plain_object() {
        let state = MetaState::from_value(&json!({ "w1": { "open": true } }));
        let encoded = serde_json::to_value(&state).unwrap();
        assert_eq!(encoded, json!({ "w1": { "open": true } }));

        let decoded: MetaState = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_copy_on_write_leaves_original() {
        let original = MetaState::from_value(&json!({
            "w1": { "value": "a" },
            "w2": { "value": "b" },
        }));
        let mut next = original.clone();
        next.widget_mut("w1").insert("value".into(), json!("changed"));

        assert_eq!(original.get("w1", "value"), Some(&json!("a")));
        assert_eq!(next.get("w1", "value"), Some(&json!("changed")));
        assert!(next.shares_widget(&original, "w2"));
        assert!(!next.shares_widget(&original, "w1"));
        assert!(!next.ptr_eq(&original));
    }
}
