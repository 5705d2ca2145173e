// Layout event bus: typed publish/subscribe scoped to one workspace.

use std::cell::{Cell, RefCell};

use dockyard_core::Signal;

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(Signal)>;

/// Broadcasts [`Signal`]s to registered listeners.
///
/// Emitting while a dispatch is already running is suppressed rather than
/// recursed: a listener that reacts to `Layout` by touching geometry cannot
/// start an event storm. Suppressed emits are counted, not queued.
#[derive(Default)]
pub struct LayoutBus {
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    removed: RefCell<Vec<ListenerId>>,
    /// Ids of the listeners checked out by the running dispatch.
    dispatched: RefCell<Vec<ListenerId>>,
    next_id: Cell<ListenerId>,
    dispatching: Cell<bool>,
    generation: Cell<u64>,
    suppressed: Cell<u64>,
}

impl LayoutBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(Signal) + 'static) -> ListenerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        if self.dispatching.get() {
            // The listener list is checked out; drop it once dispatch ends.
            let live = self.dispatched.borrow().contains(&id)
                || self.listeners.borrow().iter().any(|(lid, _)| *lid == id);
            let mut removed = self.removed.borrow_mut();
            if !live || removed.contains(&id) {
                return false;
            }
            removed.push(id);
            return true;
        }
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Deliver `signal` to every listener in subscription order.
    /// Returns false if the emit was suppressed by the re-entrancy guard.
    pub fn emit(&self, signal: Signal) -> bool {
        if self.dispatching.get() {
            self.suppressed.set(self.suppressed.get() + 1);
            log::trace!("suppressed re-entrant {:?} signal", signal);
            return false;
        }
        self.dispatching.set(true);
        self.generation.set(self.generation.get() + 1);

        let mut listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        *self.dispatched.borrow_mut() = listeners.iter().map(|(id, _)| *id).collect();
        for (_, listener) in listeners.iter_mut() {
            listener(signal);
        }

        // Listeners subscribed during dispatch landed in the emptied list.
        let mut current = self.listeners.borrow_mut();
        listeners.append(&mut current);
        let removed = std::mem::take(&mut *self.removed.borrow_mut());
        listeners.retain(|(id, _)| !removed.contains(id));
        *current = listeners;
        drop(current);
        self.dispatched.borrow_mut().clear();

        self.dispatching.set(false);
        true
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatching.get()
    }

    /// Number of signals delivered so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Number of re-entrant emits that were dropped.
    pub fn suppressed(&self) -> u64 {
        self.suppressed.get()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for LayoutBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutBus")
            .field("generation", &self.generation.get())
            .field("dispatching", &self.dispatching.get())
            .field("suppressed", &self.suppressed.get())
            .finish()
    }
}
