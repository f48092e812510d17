use std::fmt;
use std::sync::Arc;

pub trait Listener<E>: Send + Sync {
    fn on_event(&self, event: &mut E);

    fn name(&self) -> &str {
        "listener"
    }
}

/// Identifies everything registered by a single call to
/// [`EventDispatcher::register`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait EventDispatcher<E> {
    fn register(&self, listener: Arc<dyn Listener<E>>) -> ListenerHandle;

    /// Returns the number of callbacks removed.
    fn unregister_all(&self, handle: ListenerHandle) -> usize;

    fn dispatch(&self, event: E) -> E;

    fn listener_count(&self) -> usize;
}
