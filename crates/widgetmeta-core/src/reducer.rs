//! Pure transition function of the meta-state store.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::action::{MetaAction, PanePosition};
use crate::merge::deep_merge;
use crate::path::PropertyPath;
use crate::state::{MetaState, WidgetMetaProps};

/// Compute the state following `action`.
///
/// Never fails: unknown ids, bad paths and malformed updates degrade to a
/// no-op or to creating the entry on demand. `state` itself is never
/// modified.
pub fn reduce(state: &MetaState, action: &MetaAction) -> MetaState {
    match action {
        MetaAction::UpdateMetaState { meta_updates } => update_meta_state(state, meta_updates),
        MetaAction::SetMetaProp {
            widget_id,
            property_name,
            property_value,
        } => set_meta_prop(state, widget_id, property_name, property_value),
        MetaAction::PaneMoved { widget_id, position } => pane_moved(state, widget_id, position),
        MetaAction::WidgetDelete { widget_id } => widget_delete(state, widget_id),
        MetaAction::ResetWidgetMeta { widget_id } => reset_widget_meta(state, widget_id),
        MetaAction::PageLoaded(_) => MetaState::new(),
    }
}

fn update_meta_state(state: &MetaState, meta_updates: &Map<String, Value>) -> MetaState {
    let mut next = state.clone();
    for (widget_id, update) in meta_updates {
        match update {
            Value::Object(props) => deep_merge(next.widget_mut(widget_id), props),
            other => {
                log::warn!(
                    "Skipping meta update for {}: expected an object, got {}",
                    widget_id,
                    other
                );
            }
        }
    }
    next
}

fn set_meta_prop(state: &MetaState, widget_id: &str, property_name: &str, value: &Value) -> MetaState {
    let path = match PropertyPath::parse(property_name) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("Ignoring meta property write on {}: {}", widget_id, e);
            return state.clone();
        }
    };
    let mut next = state.clone();
    path.set_in(next.widget_mut(widget_id), value.clone());
    next
}

fn pane_moved(state: &MetaState, widget_id: &str, position: &PanePosition) -> MetaState {
    let mut next = state.clone();
    let props: &mut WidgetMetaProps = next.widget_mut(widget_id);
    props.insert("isMoved".to_string(), Value::Bool(true));
    props.insert("position".to_string(), position_value(position));
    next
}

fn position_value(position: &PanePosition) -> Value {
    let mut map = Map::new();
    map.insert("left".to_string(), Value::Number(position.left.clone()));
    map.insert("top".to_string(), Value::Number(position.top.clone()));
    Value::Object(map)
}

fn widget_delete(state: &MetaState, widget_id: &str) -> MetaState {
    if !state.contains(widget_id) {
        log::debug!("Delete of {} without meta state", widget_id);
        return state.clone();
    }
    let mut next = state.clone();
    next.widgets_mut().remove(widget_id);
    next
}

fn reset_widget_meta(state: &MetaState, widget_id: &str) -> MetaState {
    if !state.contains(widget_id) {
        return state.clone();
    }
    // The entry stays, emptied: widget instances treat "present with no
    // meta" differently from "absent".
    let mut next = state.clone();
    next.widgets_mut()
        .insert(widget_id.to_string(), Arc::new(WidgetMetaProps::new()));
    next
}
