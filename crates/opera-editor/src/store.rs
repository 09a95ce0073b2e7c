//! The editor's state container

use crate::state::{reduce, Action, State};
use tracing::debug;

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&State)>;

/// Holds the current [`State`]. Every dispatch replaces it with the reduced
/// state and then notifies all subscribers in subscription order.
pub struct Store {
    state: State,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(State::default())
    }

    pub fn with_state(state: State) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!(action = action.name(), "dispatch");
        self.state = reduce(&self.state, action);
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&State) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_notifies_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new();
        let log = Rc::clone(&seen);
        store.subscribe(move |state| log.borrow_mut().push(state.camera.field_of_view_deg));

        store.dispatch(Action::SetFieldOfView(Some(30.0)));
        store.dispatch(Action::SetFieldOfView(Some(45.0)));
        assert_eq!(*seen.borrow(), vec![Some(30.0), Some(45.0)]);
        assert!(store.state().is_dirty_camera);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut store = Store::new();
        let counter = Rc::clone(&count);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.dispatch(Action::MarkCameraDirty);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Action::Reset);
        assert_eq!(*count.borrow(), 1);
    }
}
