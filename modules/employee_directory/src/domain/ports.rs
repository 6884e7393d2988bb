/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}

/// Publisher that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl<E> EventPublisher<E> for NoopPublisher {
    fn publish(&self, _event: &E) {}
}

/// Publisher that keeps every event, for inspection.
#[derive(Debug)]
pub struct RecordingPublisher<E> {
    events: parking_lot::Mutex<Vec<E>>,
}

impl<E> Default for RecordingPublisher<E> {
    fn default() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> RecordingPublisher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<E> {
        self.events.lock().clone()
    }
}

impl<E: Clone + Send + 'static> EventPublisher<E> for RecordingPublisher<E> {
    fn publish(&self, event: &E) {
        self.events.lock().push(event.clone());
    }
}
