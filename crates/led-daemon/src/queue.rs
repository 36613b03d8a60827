//! Bounded priority queue: FIFO within each priority, highest priority
//! popped first.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use led_protocol::{Command, Priority};
use thiserror::Error;

/// Commands buffered across all priorities before producers see
/// `QueueFull`.
pub const QUEUE_CAPACITY: usize = 100;

/// Advisory failure returned to the producer; no state changes.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("command queue full")]
pub struct QueueFull;

/// A command waiting for the worker.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedCommand {
    pub command: Command,
    pub priority: Priority,
}

struct Lanes {
    lanes: [VecDeque<QueuedCommand>; 3],
    len: usize,
    closed: bool,
}

impl Lanes {
    fn head_priority(&self) -> Option<Priority> {
        Priority::DESCENDING
            .into_iter()
            .find(|&p| !self.lanes[p as usize].is_empty())
    }

    fn pop_front(&mut self) -> Option<QueuedCommand> {
        let priority = self.head_priority()?;
        let command = self.lanes[priority as usize].pop_front();
        if command.is_some() {
            self.len -= 1;
        }
        command
    }
}

/// The shared command queue. `push` never blocks; `pop` blocks until a
/// command arrives or the queue is closed.
pub struct CommandQueue {
    inner: Mutex<Lanes>,
    available: Condvar,
    capacity: usize,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Lanes {
                lanes: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
                len: 0,
                closed: false,
            }),
            available: Condvar::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Lanes> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a command. Returns immediately; fails when the bound is
    /// reached.
    pub fn push(&self, command: QueuedCommand) -> Result<(), QueueFull> {
        let mut inner = self.lock();
        if inner.len >= self.capacity {
            return Err(QueueFull);
        }
        inner.lanes[command.priority as usize].push_back(command);
        inner.len += 1;
        drop(inner);
        self.available.notify_one();
        Ok(())
    }

    /// Dequeue the oldest command of the highest present priority,
    /// blocking while the queue is empty. Returns `None` once the queue is
    /// closed and drained.
    pub fn pop(&self) -> Option<QueuedCommand> {
        let mut inner = self.lock();
        loop {
            if let Some(command) = inner.pop_front() {
                return Some(command);
            }
            if inner.closed {
                return None;
            }
            inner = self
                .available
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Non-blocking pop.
    pub fn try_pop(&self) -> Option<QueuedCommand> {
        self.lock().pop_front()
    }

    /// Priority of the command `pop` would return, if any.
    pub fn peek_priority(&self) -> Option<Priority> {
        self.lock().head_priority()
    }

    /// Commands currently queued.
    pub fn len(&self) -> usize {
        self.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close the queue, waking every blocked `pop`.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(priority: Priority) -> QueuedCommand {
        QueuedCommand {
            command: Command::Clear,
            priority,
        }
    }

    #[test]
    fn pop_prefers_higher_priority() {
        let queue = CommandQueue::new();
        queue.push(cmd(Priority::Low)).unwrap();
        queue.push(cmd(Priority::High)).unwrap();
        queue.push(cmd(Priority::Medium)).unwrap();
        assert_eq!(queue.try_pop().unwrap().priority, Priority::High);
        assert_eq!(queue.try_pop().unwrap().priority, Priority::Medium);
        assert_eq!(queue.try_pop().unwrap().priority, Priority::Low);
        assert!(queue.try_pop().is_none());
    }

    #[test]
    fn fifo_within_a_priority() {
        let queue = CommandQueue::new();
        for percentage in [1.0, 2.0, 3.0] {
            queue
                .push(QueuedCommand {
                    command: Command::ShowProgress(led_protocol::ShowProgressParams {
                        percentage,
                    }),
                    priority: Priority::Low,
                })
                .unwrap();
        }
        for expected in [1.0, 2.0, 3.0] {
            match queue.try_pop().unwrap().command {
                Command::ShowProgress(p) => assert_eq!(p.percentage, expected),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn bound_is_enforced() {
        let queue = CommandQueue::with_capacity(2);
        queue.push(cmd(Priority::Low)).unwrap();
        queue.push(cmd(Priority::High)).unwrap();
        assert_eq!(queue.push(cmd(Priority::Medium)), Err(QueueFull));
        // Draining makes room again.
        queue.try_pop().unwrap();
        assert!(queue.push(cmd(Priority::Medium)).is_ok());
    }

    #[test]
    fn peek_matches_pop() {
        let queue = CommandQueue::new();
        assert_eq!(queue.peek_priority(), None);
        queue.push(cmd(Priority::Low)).unwrap();
        queue.push(cmd(Priority::Medium)).unwrap();
        assert_eq!(queue.peek_priority(), Some(Priority::Medium));
        assert_eq!(queue.try_pop().unwrap().priority, Priority::Medium);
    }

    #[test]
    fn close_wakes_blocked_pop() {
        use std::sync::Arc;
        let queue = Arc::new(CommandQueue::new());
        let popper = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.pop())
        };
        std::thread::sleep(std::time::Duration::from_millis(50));
        queue.close();
        assert_eq!(popper.join().unwrap(), None);
    }

    #[test]
    fn pop_blocks_until_push() {
        use std::sync::Arc;
        let queue = Arc::new(CommandQueue::new());
        let popper = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.pop())
        };
        std::thread::sleep(std::time::Duration::from_millis(50));
        queue.push(cmd(Priority::High)).unwrap();
        assert_eq!(popper.join().unwrap().unwrap().priority, Priority::High);
    }
}
