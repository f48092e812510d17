use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

use crate::hal::listener::{EventDispatcher, Listener, ListenerHandle};

struct Registration<E> {
    handle: ListenerHandle,
    listener: Arc<dyn Listener<E>>,
}

struct BusState<E> {
    next_id: u64,
    registrations: Vec<Registration<E>>,
}

impl<E> Default for BusState<E> {
    fn default() -> Self {
        Self {
            next_id: 1,
            registrations: Vec::new(),
        }
    }
}

struct SharedBusState<E>(Arc<Mutex<BusState<E>>>);

impl<E> Clone for SharedBusState<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E> Default for SharedBusState<E> {
    fn default() -> Self {
        SharedBusState(Arc::new(Mutex::new(BusState::default())))
    }
}

impl<E> SharedBusState<E> {
    fn modify<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut BusState<E>) -> T,
    {
        // The list is never left half-updated, so a poisoned lock is still usable.
        let mut state = self.0.lock().unwrap_or_else(|e| e.into_inner());
        f(state.deref_mut())
    }

    fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&BusState<E>) -> T,
    {
        let state = self.0.lock().unwrap_or_else(|e| e.into_inner());
        f(state.deref())
    }
}

/// Synchronous in-process event bus.
///
/// Listeners run on the dispatching thread in registration order. The
/// listener list is snapshotted before each dispatch, so a listener may
/// register or unregister others while handling an event; the change is
/// visible from the next dispatch.
pub struct StdEventBus<E> {
    state: SharedBusState<E>,
}

impl<E> Default for StdEventBus<E> {
    fn default() -> Self {
        Self {
            state: SharedBusState::default(),
        }
    }
}

impl<E> Clone for StdEventBus<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<E> StdEventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> EventDispatcher<E> for StdEventBus<E> {
    fn register(&self, listener: Arc<dyn Listener<E>>) -> ListenerHandle {
        let name = listener.name().to_owned();
        let handle = self.state.modify(|x| {
            let handle = ListenerHandle::from_raw(x.next_id);
            x.next_id += 1;
            x.registrations.push(Registration { handle, listener });
            handle
        });
        log::debug!("registered listener {name} as {handle}");
        handle
    }

    fn unregister_all(&self, handle: ListenerHandle) -> usize {
        let removed = self.state.modify(|x| {
            let before = x.registrations.len();
            x.registrations.retain(|r| r.handle != handle);
            before - x.registrations.len()
        });
        log::debug!("unregistered {removed} callback(s) for {handle}");
        removed
    }

    fn dispatch(&self, mut event: E) -> E {
        let listeners: Vec<Arc<dyn Listener<E>>> = self
            .state
            .read(|x| x.registrations.iter().map(|r| r.listener.clone()).collect());

        for listener in listeners {
            listener.on_event(&mut event);
        }

        event
    }

    fn listener_count(&self) -> usize {
        self.state.read(|x| x.registrations.len())
    }
}
