//! A cooperative work queue that other threads post into and the main loop
//! drains once per tick, per the "reliable-transport thread / worker pool
//! post results to the main loop" concurrency model.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

pub struct WorkQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        WorkQueue { tx, rx }
    }

    /// A cloneable handle other threads use to post work items.
    pub fn sender(&self) -> WorkQueueSender<T> {
        WorkQueueSender { tx: self.tx.clone() }
    }

    /// Drain everything currently queued without blocking. Called once per
    /// main loop tick.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }

    /// Block until at least one item arrives or `timeout` elapses, then
    /// drain the rest without blocking. Used by workers that otherwise have
    /// nothing to do (e.g. the upload worker between chunks).
    pub fn recv_batch(&self, timeout: Duration) -> Vec<T> {
        let mut items = Vec::new();
        match self.rx.recv_timeout(timeout) {
            Ok(item) => items.push(item),
            Err(RecvTimeoutError::Timeout) => return items,
            Err(RecvTimeoutError::Disconnected) => return items,
        }
        items.extend(self.rx.try_iter());
        items
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct WorkQueueSender<T> {
    tx: Sender<T>,
}

impl<T> WorkQueueSender<T> {
    pub fn post(&self, item: T) {
        // The main loop owns the receiver for the lifetime of the process;
        // a send error only occurs during shutdown teardown, which is not
        // a condition worth propagating here.
        let _ = self.tx.send(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_items_drain_in_order() {
        let queue: WorkQueue<i32> = WorkQueue::new();
        let sender = queue.sender();
        sender.post(1);
        sender.post(2);
        sender.post(3);
        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn recv_batch_times_out_when_empty() {
        let queue: WorkQueue<i32> = WorkQueue::new();
        let items = queue.recv_batch(Duration::from_millis(10));
        assert!(items.is_empty());
    }
}
