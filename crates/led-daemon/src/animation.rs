//! The animation engine: at most one looping or finite scene thread.
//!
//! Cancellation is cooperative. The cancel flag is checked between frames
//! and inside the inter-frame sleep; a frame whose `present` has started
//! always completes. `stop` waits a bounded ~200 ms for the thread to
//! exit and logs a leak if it does not.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use led_protocol::{Animation, Priority, ShowAnimationParams};
use matrix_scenes::animation_frame;
use tracing::{debug, warn};

use crate::panel::{lock_panel, SharedPanel};

/// Bounded wait for the animation thread to exit after cancellation.
const STOP_TIMEOUT: Duration = Duration::from_millis(200);

/// Granularity of the interruptible inter-frame sleep.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

struct ActiveAnimation {
    animation: Animation,
    priority: Priority,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the single animation thread and its cancel signal.
pub struct AnimationEngine {
    panel: SharedPanel,
    active: Mutex<Option<ActiveAnimation>>,
}

impl AnimationEngine {
    pub fn new(panel: SharedPanel) -> Self {
        Self {
            panel,
            active: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveAnimation>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start an animation, cancelling and replacing any running one.
    pub fn start(&self, params: &ShowAnimationParams, priority: Priority) {
        self.stop();

        let animation = params.animation;
        let frame_delay = params
            .frame_delay
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or_else(|| animation.default_frame_delay());
        let deadline = params
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| Instant::now() + Duration::from_secs_f64(d));

        let cancel = Arc::new(AtomicBool::new(false));
        let thread_cancel = Arc::clone(&cancel);
        let panel = Arc::clone(&self.panel);

        debug!(animation = animation.name(), ?frame_delay, "starting animation");
        let handle = std::thread::spawn(move || {
            run_animation(animation, frame_delay, deadline, panel, thread_cancel);
        });

        *self.lock() = Some(ActiveAnimation {
            animation,
            priority,
            cancel,
            handle,
        });
    }

    /// Raise the cancel flag without waiting. Used by the preemption hook;
    /// the worker's next `stop` still performs the bounded join.
    pub fn request_stop(&self) {
        if let Some(active) = self.lock().as_ref() {
            active.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Cancel the running animation and wait (bounded) for its thread.
    pub fn stop(&self) {
        let Some(active) = self.lock().take() else {
            return;
        };
        active.cancel.store(true, Ordering::SeqCst);

        let deadline = Instant::now() + STOP_TIMEOUT;
        while !active.handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        if active.handle.is_finished() {
            let _ = active.handle.join();
            debug!(animation = active.animation.name(), "animation stopped");
        } else {
            // The thread exits on its own at the next frame boundary; the
            // handle is abandoned so the worker can proceed.
            warn!(
                animation = active.animation.name(),
                "animation thread did not exit within {STOP_TIMEOUT:?}, leaking it"
            );
        }
    }

    /// Whether an animation thread is currently live.
    pub fn is_running(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Priority of the running animation, if one is live.
    pub fn running_priority(&self) -> Option<Priority> {
        self.lock()
            .as_ref()
            .filter(|active| !active.handle.is_finished())
            .map(|active| active.priority)
    }

    /// Name of the running animation, if one is live.
    pub fn running_animation(&self) -> Option<Animation> {
        self.lock()
            .as_ref()
            .filter(|active| !active.handle.is_finished())
            .map(|active| active.animation)
    }
}

fn run_animation(
    animation: Animation,
    frame_delay: Duration,
    deadline: Option<Instant>,
    panel: SharedPanel,
    cancel: Arc<AtomicBool>,
) {
    let mut index: u32 = 0;
    loop {
        if cancel.load(Ordering::SeqCst) {
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        let frame = animation_frame(animation, index);
        lock_panel(&panel).present(&frame);
        index = index.wrapping_add(1);

        if animation
            .frame_count()
            .is_some_and(|count| index >= count)
        {
            break;
        }

        // Interruptible sleep: cancellation takes effect mid-delay.
        let wake = Instant::now() + frame_delay;
        while Instant::now() < wake {
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            std::thread::sleep(SLEEP_SLICE.min(wake.saturating_duration_since(Instant::now())));
        }
    }
}
