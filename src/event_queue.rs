/**
 * Outgoing events waiting for the end of the render cycle.
 * Events keep the order they were pushed in and their own timing.
 */
pub struct EventQueue<E> {
    events: Vec<E>,
}

impl<E> EventQueue<E> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /**
     * Hand every queued event to `send`, oldest first, and leave the queue empty.
     * The allocation is kept for the next cycle.
     */
    pub fn flush(&mut self, mut send: impl FnMut(E)) {
        for event in self.events.drain(..) {
            send(event);
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
