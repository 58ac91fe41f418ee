//! Transitions accepted by the meta-state store.
//!
//! Each collaborator dispatches its own subset:
//! - the evaluation engine sends [`MetaAction::UpdateMetaState`]
//! - widget instances send [`MetaAction::SetMetaProp`] and
//!   [`MetaAction::ResetWidgetMeta`]
//! - the canvas controller sends [`MetaAction::PaneMoved`] and
//!   [`MetaAction::WidgetDelete`]
//! - the page loader sends [`MetaAction::PageLoaded`]

mod envelope;

pub use envelope::ActionError;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::state::WidgetId;

/// Wire type of [`MetaAction::UpdateMetaState`].
pub const UPDATE_META_STATE: &str = "UPDATE_META_STATE";
/// Wire type of [`MetaAction::SetMetaProp`].
pub const SET_META_PROP: &str = "SET_META_PROP";
/// Wire type of [`MetaAction::PaneMoved`].
pub const TABLE_PANE_MOVED: &str = "TABLE_PANE_MOVED";
/// Wire type of [`MetaAction::WidgetDelete`].
pub const WIDGET_DELETE: &str = "WIDGET_DELETE";
/// Wire type of [`MetaAction::ResetWidgetMeta`].
pub const RESET_WIDGET_META: &str = "RESET_WIDGET_META";
/// Wire type of an editor page load.
pub const FETCH_PAGE_SUCCESS: &str = "FETCH_PAGE_SUCCESS";
/// Wire type of a published page load.
pub const FETCH_PUBLISHED_PAGE_SUCCESS: &str = "FETCH_PUBLISHED_PAGE_SUCCESS";

/// Screen position of a floating pane.
///
/// Coordinates are kept as the JSON numbers they arrived as, so an
/// integer offset is stored back as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanePosition {
    pub left: Number,
    pub top: Number,
}

impl PanePosition {
    pub fn new(left: impl Into<Number>, top: impl Into<Number>) -> Self {
        Self {
            left: left.into(),
            top: top.into(),
        }
    }
}

/// Which flavor of page finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadKind {
    /// Page opened in the editor.
    Edit,
    /// Published (view mode) page.
    Published,
}

/// A single store transition.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaAction {
    /// Deep-merge values computed by the evaluation engine, keyed by widget id.
    UpdateMetaState { meta_updates: Map<String, Value> },
    /// Create or overwrite one property of one widget.
    SetMetaProp {
        widget_id: WidgetId,
        property_name: String,
        property_value: Value,
    },
    /// A floating pane owned by the widget was dragged to a new position.
    PaneMoved {
        widget_id: WidgetId,
        position: PanePosition,
    },
    /// The widget was removed from the page.
    WidgetDelete { widget_id: WidgetId },
    /// Clear every property of the widget, keeping its (empty) entry.
    ResetWidgetMeta { widget_id: WidgetId },
    /// A page finished loading; all meta state is discarded.
    PageLoaded(PageLoadKind),
}

impl MetaAction {
    /// Convenience constructor for [`MetaAction::SetMetaProp`].
    pub fn set(
        widget_id: impl Into<WidgetId>,
        property_name: impl Into<String>,
        property_value: Value,
    ) -> Self {
        Self::SetMetaProp {
            widget_id: widget_id.into(),
            property_name: property_name.into(),
            property_value,
        }
    }

    /// Convenience constructor for [`MetaAction::UpdateMetaState`].
    ///
    /// Anything other than a JSON object yields an empty update.
    pub fn update(meta_updates: Value) -> Self {
        let meta_updates = match meta_updates {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::UpdateMetaState { meta_updates }
    }

    /// Convenience constructor for [`MetaAction::PaneMoved`].
    pub fn moved(widget_id: impl Into<WidgetId>, left: impl Into<Number>, top: impl Into<Number>) -> Self {
        Self::PaneMoved {
            widget_id: widget_id.into(),
            position: PanePosition::new(left, top),
        }
    }

    /// Convenience constructor for [`MetaAction::WidgetDelete`].
    pub fn delete(widget_id: impl Into<WidgetId>) -> Self {
        Self::WidgetDelete {
            widget_id: widget_id.into(),
        }
    }

    /// Convenience constructor for [`MetaAction::ResetWidgetMeta`].
    pub fn reset(widget_id: impl Into<WidgetId>) -> Self {
        Self::ResetWidgetMeta {
            widget_id: widget_id.into(),
        }
    }

    /// The wire type string of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpdateMetaState { .. } => UPDATE_META_STATE,
            Self::SetMetaProp { .. } => SET_META_PROP,
            Self::PaneMoved { .. } => TABLE_PANE_MOVED,
            Self::WidgetDelete { .. } => WIDGET_DELETE,
            Self::ResetWidgetMeta { .. } => RESET_WIDGET_META,
            Self::PageLoaded(PageLoadKind::Edit) => FETCH_PAGE_SUCCESS,
            Self::PageLoaded(PageLoadKind::Published) => FETCH_PUBLISHED_PAGE_SUCCESS,
        }
    }

    /// The widget this action targets, if it targets exactly one.
    pub fn widget_id(&self) -> Option<&str> {
        match self {
            Self::SetMetaProp { widget_id, .. }
            | Self::PaneMoved { widget_id, .. }
            | Self::WidgetDelete { widget_id }
            | Self::ResetWidgetMeta { widget_id } => Some(widget_id.as_str()),
            Self::UpdateMetaState { .. } | Self::PageLoaded(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_strings() {
        assert_eq!(MetaAction::update(json!({})).kind(), "UPDATE_META_STATE");
        assert_eq!(MetaAction::set("w", "v", json!(1)).kind(), "SET_META_PROP");
        assert_eq!(MetaAction::moved("w", 0, 0).kind(), "TABLE_PANE_MOVED");
        assert_eq!(MetaAction::delete("w").kind(), "WIDGET_DELETE");
        assert_eq!(MetaAction::reset("w").kind(), "RESET_WIDGET_META");
        assert_eq!(MetaAction::PageLoaded(PageLoadKind::Edit).kind(), "FETCH_PAGE_SUCCESS");
        assert_eq!(
            MetaAction::PageLoaded(PageLoadKind::Published).kind(),
            "FETCH_PUBLISHED_PAGE_SUCCESS"
        );
    }

    #[test]
    fn test_update_from_non_object_is_empty() {
        assert_eq!(
            MetaAction::update(json!([1, 2])),
            MetaAction::UpdateMetaState { meta_updates: Map::new() }
        );
    }

    #[test]
    fn test_widget_id() {
        assert_eq!(MetaAction::delete("w9").widget_id(), Some("w9"));
        assert_eq!(MetaAction::update(json!({ "w1": {} })).widget_id(), None);
    }
}
