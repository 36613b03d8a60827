//! The single dispatch loop: pop → render or hand off → next.
//!
//! Only this thread and the animation thread ever touch the panel, and the
//! worker stops the animation before rendering anything static.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use led_protocol::{
    Animation, Command, Priority, ShowAnimationParams, ShowSymbolParams, Symbol,
};
use matrix_scenes::{render_layout, render_progress, render_symbol};
use tracing::{debug, info};

use crate::animation::AnimationEngine;
use crate::panel::{lock_panel, SharedPanel};
use crate::queue::{CommandQueue, QueuedCommand};

/// Per-animation slice of the self-test sequence.
const TEST_ANIMATION_TIME: Duration = Duration::from_millis(2500);

/// The coordinator core.
pub struct Worker {
    queue: Arc<CommandQueue>,
    engine: Arc<AnimationEngine>,
    panel: SharedPanel,
    shutdown: Arc<AtomicBool>,
}

impl Worker {
    pub fn new(
        queue: Arc<CommandQueue>,
        engine: Arc<AnimationEngine>,
        panel: SharedPanel,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            queue,
            engine,
            panel,
            shutdown,
        }
    }

    /// Run until a `Shutdown` command arrives or the queue closes.
    pub fn run(&self) {
        info!("command worker started");
        while let Some(queued) = self.queue.pop() {
            debug!(command = queued.command.name(), priority = ?queued.priority, "dispatching");
            if !self.dispatch(queued) {
                break;
            }
        }
        self.engine.stop();
        lock_panel(&self.panel).clear();
        self.shutdown.store(true, Ordering::SeqCst);
        info!("command worker stopped");
    }

    /// Execute one command. Returns `false` on `Shutdown`.
    fn dispatch(&self, queued: QueuedCommand) -> bool {
        match queued.command {
            Command::ShowSymbol(params) => self.show_symbol(&params),
            Command::ShowProgress(params) => {
                self.engine.stop();
                lock_panel(&self.panel).present(&render_progress(params.percentage));
            }
            Command::ShowLayout(params) => {
                self.engine.stop();
                lock_panel(&self.panel).present(&render_layout(&params.payload));
            }
            Command::ShowAnimation(params) => {
                self.engine.start(&params, queued.priority);
            }
            Command::StopAnimation => self.engine.stop(),
            Command::Clear => {
                self.engine.stop();
                lock_panel(&self.panel).clear();
            }
            Command::Test => self.run_test_sequence(),
            Command::Shutdown => {
                info!("shutdown command received");
                return false;
            }
        }
        true
    }

    /// Render a symbol and hold it on the panel for its display duration,
    /// blocking the worker so lower-priority commands cannot overwrite it.
    fn show_symbol(&self, params: &ShowSymbolParams) {
        self.engine.stop();
        let color = params
            .color
            .map(|[r, g, b]| embedded_graphics::pixelcolor::Rgb888::new(r, g, b));
        lock_panel(&self.panel).present(&render_symbol(params.symbol, color));

        let hold = params
            .duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or_else(|| params.symbol.default_duration());
        std::thread::sleep(hold);
    }

    /// The built-in diagnostic sequence: every symbol, every animation,
    /// the progress staircase, then clear. Blocks the worker throughout.
    fn run_test_sequence(&self) {
        info!("running self-test sequence");
        self.engine.stop();

        for symbol in Symbol::ALL {
            debug!(symbol = symbol.name(), "self-test symbol");
            self.show_symbol(&ShowSymbolParams {
                symbol,
                duration: Some(2.0),
                color: None,
            });
        }

        for animation in Animation::ALL {
            debug!(animation = animation.name(), "self-test animation");
            self.engine.start(
                &ShowAnimationParams {
                    animation,
                    duration: None,
                    frame_delay: None,
                },
                Priority::High,
            );
            std::thread::sleep(TEST_ANIMATION_TIME);
            self.engine.stop();
        }

        for percentage in [0.0, 25.0, 50.0, 75.0, 100.0] {
            debug!(percentage, "self-test progress");
            lock_panel(&self.panel).present(&render_progress(percentage));
            std::thread::sleep(Duration::from_millis(800));
        }

        lock_panel(&self.panel).clear();
        info!("self-test sequence complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::MockPanel;
    use led_protocol::{Layout, LayoutPayload, ProjectSummary, ShowLayoutParams, ShowProgressParams};
    use std::sync::Mutex;
    use std::time::Instant;

    struct Fixture {
        queue: Arc<CommandQueue>,
        engine: Arc<AnimationEngine>,
        mock: Arc<Mutex<MockPanel>>,
        shutdown: Arc<AtomicBool>,
        thread: std::thread::JoinHandle<()>,
    }

    fn spawn_worker() -> Fixture {
        let mock = Arc::new(Mutex::new(MockPanel::new()));
        let shared: SharedPanel = mock.clone();
        let queue = Arc::new(CommandQueue::new());
        let engine = Arc::new(AnimationEngine::new(Arc::clone(&shared)));
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker = Worker::new(
            Arc::clone(&queue),
            Arc::clone(&engine),
            shared,
            Arc::clone(&shutdown),
        );
        let thread = std::thread::spawn(move || worker.run());
        Fixture {
            queue,
            engine,
            mock,
            shutdown,
            thread,
        }
    }

    fn wait_for<F: Fn() -> bool>(what: &str, condition: F) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !condition() {
            assert!(Instant::now() < deadline, "timed out waiting for {what}");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn push(fixture: &Fixture, command: Command, priority: Priority) {
        fixture
            .queue
            .push(QueuedCommand { command, priority })
            .unwrap();
    }

    #[test]
    fn progress_commands_render_in_order() {
        let fixture = spawn_worker();
        for percentage in [0.0, 50.0, 100.0] {
            push(
                &fixture,
                Command::ShowProgress(ShowProgressParams { percentage }),
                Priority::Low,
            );
        }
        wait_for("three presents", || {
            fixture.mock.lock().unwrap().present_count() == 3
        });

        let mock = fixture.mock.lock().unwrap();
        assert_eq!(mock.presents()[0].lit_rows(), 0);
        assert_eq!(mock.presents()[1].lit_rows(), 32);
        assert_eq!(mock.presents()[2].lit_rows(), 64);
        drop(mock);

        push(&fixture, Command::Shutdown, Priority::High);
        fixture.thread.join().unwrap();
    }

    #[test]
    fn layout_command_renders_the_scene() {
        let fixture = spawn_worker();
        let payload = LayoutPayload {
            layout: Layout::SingleView,
            project: ProjectSummary {
                name: "Demo".into(),
                percentage: 30.0,
            },
            sprints: Vec::new(),
            focus_sprint_index: None,
        };
        push(
            &fixture,
            Command::ShowLayout(ShowLayoutParams {
                payload: payload.clone(),
            }),
            Priority::Low,
        );
        wait_for("layout present", || {
            fixture.mock.lock().unwrap().present_count() == 1
        });
        assert_eq!(
            fixture.mock.lock().unwrap().presents()[0],
            render_layout(&payload)
        );
        push(&fixture, Command::Shutdown, Priority::High);
        fixture.thread.join().unwrap();
    }

    #[test]
    fn clear_is_idempotent() {
        let fixture = spawn_worker();
        push(
            &fixture,
            Command::ShowProgress(ShowProgressParams { percentage: 80.0 }),
            Priority::Low,
        );
        push(&fixture, Command::Clear, Priority::Low);
        push(&fixture, Command::Clear, Priority::Low);
        wait_for("two clears", || fixture.mock.lock().unwrap().clear_count() == 2);
        assert!(fixture.mock.lock().unwrap().current().is_blank());
        push(&fixture, Command::Shutdown, Priority::High);
        fixture.thread.join().unwrap();
    }

    #[test]
    fn shutdown_stops_the_worker_and_clears() {
        let fixture = spawn_worker();
        push(&fixture, Command::Shutdown, Priority::High);
        fixture.thread.join().unwrap();
        assert!(fixture.shutdown.load(Ordering::SeqCst));
        assert!(fixture.mock.lock().unwrap().current().is_blank());
        assert!(!fixture.engine.is_running());
    }

    #[test]
    fn animation_is_stopped_before_static_render() {
        let fixture = spawn_worker();
        push(
            &fixture,
            Command::ShowAnimation(ShowAnimationParams {
                animation: Animation::Idle,
                duration: None,
                frame_delay: Some(0.02),
            }),
            Priority::Low,
        );
        wait_for("animation running", || fixture.engine.is_running());

        push(
            &fixture,
            Command::ShowProgress(ShowProgressParams { percentage: 100.0 }),
            Priority::Medium,
        );
        wait_for("animation stopped", || !fixture.engine.is_running());
        wait_for("progress frame", || {
            fixture
                .mock
                .lock()
                .unwrap()
                .current()
                .lit_rows() == 64
        });
        push(&fixture, Command::Shutdown, Priority::High);
        fixture.thread.join().unwrap();
    }
}
