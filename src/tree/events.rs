use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hashlink::LinkedHashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Broadcasts "the whole tree may have changed" to every subscriber.
///
/// Dispatch is synchronous and in subscription order; nothing is queued and
/// listeners cannot push back. A listener may subscribe or unsubscribe while
/// being notified, the change applies from the next emission.
#[derive(Default)]
pub struct TreeChangeEmitter {
    next_id: Cell<u64>,
    listeners: RefCell<LinkedHashMap<SubscriptionId, Rc<dyn Fn()>>>,
}

impl TreeChangeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(listener));
        id
    }

    /// Returns whether the subscription was still active.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    pub fn fire(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self.listeners.borrow().values().cloned().collect();
        debug!("Notifying {} tree change listeners", listeners.len());
        for listener in listeners {
            listener();
        }
    }
}
