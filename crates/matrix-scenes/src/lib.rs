//! Pure scene renderers for the 64×64 matrix.
//!
//! Every function here takes plain inputs and returns a fully populated
//! [`Frame`]; nothing touches hardware or holds state. Determinism is a
//! contract: the browser preview renders the same scenes from the same
//! inputs and must match pixel for pixel (`docs/preview-contract.md`).
//!
//! # Modules
//!
//! - [`symbols`] — the ten static status symbols
//! - [`layouts`] — the three hierarchical progress scenes
//! - [`progress`] — the legacy full-panel three-color bar
//! - [`animations`] — per-frame generators for the four animations

pub mod animations;
pub mod layouts;
pub mod progress;
pub mod symbols;

pub use animations::animation_frame;
pub use layouts::render_layout;
pub use matrix_gfx::Frame;
pub use progress::render_progress;
pub use symbols::render_symbol;
