//! Wire envelope `{ "type": ..., "payload": ... }` for meta actions.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::*;

/// Errors parsing an action envelope.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid action JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Action has no string 'type' field")]
    MissingType,
    #[error("Malformed payload for {kind}: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePayload {
    #[serde(default)]
    meta_updates: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetPropPayload {
    widget_id: WidgetId,
    property_name: String,
    #[serde(default)]
    property_value: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaneMovedPayload {
    widget_id: WidgetId,
    position: PanePosition,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WidgetPayload {
    widget_id: WidgetId,
}

fn parse_payload<'de, T: Deserialize<'de>>(kind: &str, payload: &'de Value) -> Result<T, ActionError> {
    T::deserialize(payload).map_err(|source| ActionError::Payload {
        kind: kind.to_string(),
        source,
    })
}

impl MetaAction {
    /// Parse an action from JSON text.
    ///
    /// Returns `Ok(None)` for action types the store does not handle.
    pub fn from_json(text: &str) -> Result<Option<Self>, ActionError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_envelope(&value)
    }

    /// Parse an action from an already decoded envelope.
    ///
    /// Returns `Ok(None)` for action types the store does not handle.
    pub fn from_envelope(envelope: &Value) -> Result<Option<Self>, ActionError> {
        let kind = envelope
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ActionError::MissingType)?;
        let body = envelope.get("payload").unwrap_or(&Value::Null);

        let action = match kind {
            UPDATE_META_STATE => {
                // A missing payload carries no updates.
                if body.is_null() {
                    MetaAction::UpdateMetaState { meta_updates: Map::new() }
                } else {
                    let p: UpdatePayload = parse_payload(kind, body)?;
                    MetaAction::UpdateMetaState { meta_updates: p.meta_updates }
                }
            }
            SET_META_PROP => {
                let p: SetPropPayload = parse_payload(kind, body)?;
                MetaAction::SetMetaProp {
                    widget_id: p.widget_id,
                    property_name: p.property_name,
                    property_value: p.property_value,
                }
            }
            TABLE_PANE_MOVED => {
                let p: PaneMovedPayload = parse_payload(kind, body)?;
                MetaAction::PaneMoved {
                    widget_id: p.widget_id,
                    position: p.position,
                }
            }
            WIDGET_DELETE => {
                let p: WidgetPayload = parse_payload(kind, body)?;
                MetaAction::WidgetDelete { widget_id: p.widget_id }
            }
            RESET_WIDGET_META => {
                let p: WidgetPayload = parse_payload(kind, body)?;
                MetaAction::ResetWidgetMeta { widget_id: p.widget_id }
            }
            FETCH_PAGE_SUCCESS => MetaAction::PageLoaded(PageLoadKind::Edit),
            FETCH_PUBLISHED_PAGE_SUCCESS => MetaAction::PageLoaded(PageLoadKind::Published),
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    /// Encode this action as a wire envelope.
    pub fn to_envelope(&self) -> Value {
        let payload = match self {
            Self::UpdateMetaState { meta_updates } => json!({ "metaUpdates": meta_updates }),
            Self::SetMetaProp {
                widget_id,
                property_name,
                property_value,
            } => json!({
                "widgetId": widget_id,
                "propertyName": property_name,
                "propertyValue": property_value,
            }),
            Self::PaneMoved { widget_id, position } => json!({
                "widgetId": widget_id,
                "isMoved": true,
                "position": position,
            }),
            Self::WidgetDelete { widget_id } | Self::ResetWidgetMeta { widget_id } => {
                json!({ "widgetId": widget_id })
            }
            Self::PageLoaded(_) => Value::Null,
        };
        json!({ "type": self.kind(), "payload": payload })
    }
}
