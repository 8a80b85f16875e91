/// Handle returned by [`EventEmitter::add_listener`].
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ListenerId(u64);

pub trait Listener<E> {
    fn on_event(&mut self, event: &E);
}

impl<E, F: FnMut(&E)> Listener<E> for F {
    fn on_event(&mut self, event: &E) {
        self(event)
    }
}

/// Ordered listener list. Listeners run in registration order.
pub struct EventEmitter<E> {
    listeners: Vec<(ListenerId, Box<dyn Listener<E>>)>,
    next_id: u64,
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> std::fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventEmitter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<L: Listener<E> + 'static>(&mut self, listener: L) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener.on_event(event);
        }
    }
}
