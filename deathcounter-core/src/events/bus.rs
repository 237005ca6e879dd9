//! Bounded event queue between the host and the death counter.
//!
//! Producers may enqueue from any thread (crossbeam's segmented queue is
//! lock-free); the runtime drains it from the single dispatch thread.

use crossbeam::queue::SegQueue;
use thiserror::Error;

use super::game::GameEvent;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Event queue capacity exceeded")]
    QueueFull,
}

pub struct EventBus {
    queue: SegQueue<GameEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create new event bus with fixed capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: SegQueue::new(),
            capacity,
        }
    }

    /// Enqueue event, failing once `capacity` events are pending.
    pub fn event_enqueue(&self, event: GameEvent) -> Result<(), EventError> {
        if self.queue.len() >= self.capacity {
            return Err(EventError::QueueFull);
        }
        self.queue.push(event);
        Ok(())
    }

    /// Dequeue the oldest pending event.
    pub fn event_dequeue(&self) -> Option<GameEvent> {
        self.queue.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
