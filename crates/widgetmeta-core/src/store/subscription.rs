//! Change listeners registered on a store.

use crate::action::MetaAction;
use crate::state::MetaState;

/// Handle returned by [`MetaStore::subscribe`](super::MetaStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(super) type Listener = Box<dyn FnMut(&MetaAction, &MetaState)>;

/// Listeners in subscription order.
#[derive(Default)]
pub(super) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(super) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(super) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(super) fn notify(&mut self, action: &MetaAction, state: &MetaState) {
        for (_, listener) in &mut self.listeners {
            listener(action, state);
        }
    }
}
