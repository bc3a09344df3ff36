/// Handle returned by [`Listeners::subscribe`], used to release the callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Synchronous change-notification registry.
///
/// Each store owns one of these for its own event type. Callbacks run in
/// subscription order, inline with the mutation that emitted the event.
/// There is no batching across registries.
pub struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns `true` if a callback was registered under `id`.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_id, callback) in self.entries.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every callback. Used on teardown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Listeners;

    #[test]
    fn emits_to_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners: Listeners<u32> = Listeners::new();

        let a = Rc::clone(&seen);
        listeners.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&seen);
        listeners.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        listeners.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_releases_callback() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners: Listeners<()> = Listeners::new();
        let c = Rc::clone(&count);
        let id = listeners.subscribe(move |_| *c.borrow_mut() += 1);

        listeners.emit(&());
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&());

        assert_eq!(*count.borrow(), 1);
        assert!(listeners.is_empty());
        assert_eq!(Rc::strong_count(&count), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut listeners: Listeners<u8> = Listeners::new();
        listeners.subscribe(|_| {});
        listeners.subscribe(|_| {});
        assert_eq!(listeners.len(), 2);
        listeners.clear();
        assert!(listeners.is_empty());
    }
}
