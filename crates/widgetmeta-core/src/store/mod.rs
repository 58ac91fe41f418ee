//! The meta-state store: single owner of the current snapshot.
//!
//! All writes go through [`MetaStore::dispatch`], which runs the pure
//! [`reduce`](crate::reducer::reduce) function and installs its result.
//! Readers take cheap [`MetaState`] snapshots that never change under them.

mod subscription;

pub use subscription::SubscriptionId;

use crate::action::{ActionError, MetaAction};
use crate::reducer::reduce;
use crate::state::{MetaState, WidgetMetaProps};
use crate::widget::WidgetMeta;
use subscription::Subscribers;

/// Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Log every dispatched action at `trace` level.
    pub log_transitions: bool,
}

/// Owned, single-writer container for the meta state.
pub struct MetaStore {
    config: StoreConfig,
    state: MetaState,
    subscribers: Subscribers,
}

impl MetaStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            state: MetaState::new(),
            subscribers: Subscribers::default(),
        }
    }

    /// Create a store starting from an existing snapshot.
    pub fn from_state(config: StoreConfig, state: MetaState) -> Self {
        Self {
            state,
            ..Self::with_config(config)
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The current snapshot.
    pub fn state(&self) -> &MetaState {
        &self.state
    }

    /// An owned handle to the current snapshot.
    pub fn snapshot(&self) -> MetaState {
        self.state.clone()
    }

    /// Meta properties of a widget, `None` if it has no meta yet.
    pub fn widget_meta(&self, widget_id: &str) -> Option<&WidgetMetaProps> {
        self.state.widget(widget_id)
    }

    /// Accessor bound to one widget, for use by widget instances.
    pub fn widget(&mut self, widget_id: impl Into<String>) -> WidgetMeta<'_> {
        WidgetMeta::new(self, widget_id.into())
    }

    /// Apply an action and return the new snapshot.
    pub fn dispatch(&mut self, action: MetaAction) -> &MetaState {
        if self.config.log_transitions {
            log::trace!("dispatch {} ({:?})", action.kind(), action.widget_id());
        }

        self.state = reduce(&self.state, &action);
        if matches!(action, MetaAction::PageLoaded(_)) {
            log::debug!("Meta state cleared by {}", action.kind());
        }

        self.subscribers.notify(&action, &self.state);
        &self.state
    }

    /// Parse a wire envelope and dispatch it.
    ///
    /// Unknown action types are ignored (`Ok(None)`). Parse failures leave
    /// the state untouched; the error is returned for reporting only.
    pub fn dispatch_json(&mut self, text: &str) -> Result<Option<&MetaState>, ActionError> {
        match MetaAction::from_json(text) {
            Ok(Some(action)) => Ok(Some(self.dispatch(action))),
            Ok(None) => Ok(None),
            Err(e) => {
                log::warn!("Dropping malformed meta action: {}", e);
                Err(e)
            }
        }
    }

    /// Register a listener called after every dispatch.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MetaAction, &MetaState) + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}

impl Default for MetaStore {
    fn default() -> Self {
        Self::new()
    }
}
