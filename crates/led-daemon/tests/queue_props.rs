//! Property-based tests for the command queue ordering guarantees.

use led_daemon::{CommandQueue, QueuedCommand};
use led_protocol::{Command, Priority, ShowProgressParams};
use proptest::prelude::*;

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

/// Tag each command with its arrival index via the progress percentage.
fn tagged(priority: Priority, index: usize) -> QueuedCommand {
    QueuedCommand {
        command: Command::ShowProgress(ShowProgressParams {
            percentage: index as f32,
        }),
        priority,
    }
}

fn tag(command: &QueuedCommand) -> usize {
    match &command.command {
        Command::ShowProgress(p) => p.percentage as usize,
        other => panic!("unexpected {other:?}"),
    }
}

proptest! {
    /// Draining the queue yields priorities in non-increasing order, and
    /// arrival order within each priority.
    #[test]
    fn drain_is_priority_then_fifo(priorities in proptest::collection::vec(priority_strategy(), 0..60)) {
        let queue = CommandQueue::new();
        for (index, &priority) in priorities.iter().enumerate() {
            queue.push(tagged(priority, index)).unwrap();
        }

        let mut drained = Vec::new();
        while let Some(command) = queue.try_pop() {
            drained.push((command.priority, tag(&command)));
        }

        prop_assert_eq!(drained.len(), priorities.len());
        for window in drained.windows(2) {
            let (pa, ia) = window[0];
            let (pb, ib) = window[1];
            prop_assert!(pa >= pb, "priority order violated: {pa:?} before {pb:?}");
            if pa == pb {
                prop_assert!(ia < ib, "FIFO violated within {pa:?}: {ia} before {ib}");
            }
        }
    }

    /// A command never jumps ahead of higher-priority commands that were
    /// already queued when it arrived.
    #[test]
    fn pop_always_yields_current_head_priority(
        priorities in proptest::collection::vec(priority_strategy(), 1..40),
        pops_between in proptest::collection::vec(0usize..3, 1..40),
    ) {
        let queue = CommandQueue::new();
        let mut pushed = 0usize;
        for (&priority, &pops) in priorities.iter().zip(pops_between.iter()) {
            queue.push(tagged(priority, pushed)).unwrap();
            pushed += 1;
            for _ in 0..pops {
                let head = queue.peek_priority();
                match queue.try_pop() {
                    Some(command) => prop_assert_eq!(Some(command.priority), head),
                    None => prop_assert_eq!(head, None),
                }
            }
        }
    }

    /// The bound is exact: capacity pushes succeed, the next fails.
    #[test]
    fn capacity_is_exact(capacity in 1usize..20, priority in priority_strategy()) {
        let queue = CommandQueue::with_capacity(capacity);
        for index in 0..capacity {
            prop_assert!(queue.push(tagged(priority, index)).is_ok());
        }
        prop_assert!(queue.push(tagged(priority, capacity)).is_err());
        prop_assert_eq!(queue.len(), capacity);
    }
}
