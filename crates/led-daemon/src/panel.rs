//! Hardware abstraction for the panel.
//!
//! A conforming implementation provides `present` and `clear`; runtime
//! faults never propagate (they are logged and absorbed inside the
//! driver), so the worker and the animation thread can call these without
//! error paths.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use matrix_gfx::Frame;
use tracing::debug;

/// The panel contract. `present` atomically replaces the panel contents.
pub trait Panel: Send {
    /// Swap `frame` onto the panel. Must not fail; transient device errors
    /// are absorbed by the implementation.
    fn present(&mut self, frame: &Frame);

    /// Blank the panel.
    fn clear(&mut self);
}

/// Panel shared between the worker and the animation thread. The mutex is
/// the serialization point: the two never render concurrently, and the
/// lock enforces it.
pub type SharedPanel = Arc<Mutex<dyn Panel>>;

/// Lock a shared panel, surviving a poisoned mutex (a panicking render
/// must not take the coordinator down with it).
pub fn lock_panel<'a>(panel: &'a Mutex<dyn Panel + 'static>) -> MutexGuard<'a, dyn Panel + 'static> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}

/// No-hardware panel: records every call for tests and diagnostics.
pub struct MockPanel {
    presents: Vec<Frame>,
    clears: usize,
    current: Frame,
}

impl MockPanel {
    pub fn new() -> Self {
        Self {
            presents: Vec::new(),
            clears: 0,
            current: Frame::new(),
        }
    }

    /// Frames handed to `present`, in order.
    pub fn presents(&self) -> &[Frame] {
        &self.presents
    }

    /// Number of `present` calls.
    pub fn present_count(&self) -> usize {
        self.presents.len()
    }

    /// Number of `clear` calls.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// What the panel is showing right now.
    pub fn current(&self) -> &Frame {
        &self.current
    }
}

impl Default for MockPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for MockPanel {
    fn present(&mut self, frame: &Frame) {
        debug!(lit_rows = frame.lit_rows(), "mock present");
        self.current = frame.clone();
        self.presents.push(frame.clone());
    }

    fn clear(&mut self) {
        debug!("mock clear");
        self.clears += 1;
        self.current = Frame::new();
    }
}
