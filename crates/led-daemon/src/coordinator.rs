//! Enqueue-side coordination: the handle the IPC server (and tests) use
//! to submit commands.
//!
//! Submission acknowledges at enqueue time. The preemption hook lives
//! here: a command of strictly higher priority than the running animation
//! raises the engine's cancel flag so the worker finds the panel free.

use std::sync::Arc;

use led_protocol::{Command, ErrorCode, Request, Response};
use tracing::debug;

use crate::animation::AnimationEngine;
use crate::queue::{CommandQueue, QueuedCommand};

/// Cheap-to-clone handle shared by every connection reader.
#[derive(Clone)]
pub struct CoordinatorHandle {
    queue: Arc<CommandQueue>,
    engine: Arc<AnimationEngine>,
}

impl CoordinatorHandle {
    pub fn new(queue: Arc<CommandQueue>, engine: Arc<AnimationEngine>) -> Self {
        Self { queue, engine }
    }

    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }

    pub fn engine(&self) -> &Arc<AnimationEngine> {
        &self.engine
    }

    /// Enqueue a decoded request and produce its acknowledgment.
    pub fn submit(&self, request: Request) -> Response {
        let stop_while_idle = matches!(request.command, Command::StopAnimation)
            && !self.engine.is_running();

        let queued = QueuedCommand {
            command: request.command,
            priority: request.priority,
        };
        let kind = queued.command.name();

        if self.queue.push(queued).is_err() {
            return Response::rejected(ErrorCode::QueueFull, "command queue full");
        }
        debug!(command = kind, priority = ?request.priority, "command queued");

        // Preemption: strictly higher priority interrupts the animation at
        // its next frame boundary.
        if let Some(running) = self.engine.running_priority() {
            if request.priority > running {
                debug!(command = kind, "preempting running animation");
                self.engine.request_stop();
            }
        }

        if stop_while_idle {
            Response::ok_with_code("no animation running", ErrorCode::NotRunning)
        } else {
            Response::ok("command queued")
        }
    }
}
