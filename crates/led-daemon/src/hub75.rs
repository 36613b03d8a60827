//! Physical HUB75E panel driver via the rpi-led-matrix bindings.
//!
//! Compiled only with the `hardware` feature; everything else in the
//! daemon is driver-agnostic through the [`Panel`] trait.

use embedded_graphics::prelude::RgbColor;
use matrix_gfx::Frame;
use rpi_led_matrix::{LedCanvas, LedColor, LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use tracing::info;

use crate::config::HardwareConfig;
use crate::panel::Panel;
use crate::DaemonError;

/// Double-buffered driver for the physical panel.
pub struct Hub75Panel {
    matrix: LedMatrix,
    canvas: Option<LedCanvas>,
}

impl Hub75Panel {
    /// Initialize the matrix. GPIO problems surface here as
    /// [`DaemonError::HardwareInit`]; nothing after construction fails.
    pub fn open(config: &HardwareConfig) -> Result<Self, DaemonError> {
        let init = |e: &str| DaemonError::HardwareInit(e.to_owned());

        let mut options = LedMatrixOptions::new();
        options.set_rows(config.matrix_rows);
        options.set_cols(config.matrix_cols);
        options.set_chain_length(config.chain_length);
        options.set_parallel(config.parallel_chains);
        options.set_hardware_mapping(&config.hardware_mapping);
        options.set_pwm_bits(config.pwm_bits as u8).map_err(init)?;
        options.set_brightness(config.brightness).map_err(init)?;
        // Software pulsing lets the daemon run without root.
        options.set_hardware_pulsing(false);

        let mut runtime = LedRuntimeOptions::new();
        runtime.set_gpio_slowdown(config.gpio_slowdown);

        let matrix = LedMatrix::new(Some(options), Some(runtime)).map_err(init)?;
        let canvas = matrix.offscreen_canvas();
        info!(
            rows = config.matrix_rows,
            cols = config.matrix_cols,
            mapping = %config.hardware_mapping,
            "HUB75 panel initialized"
        );
        Ok(Self {
            matrix,
            canvas: Some(canvas),
        })
    }

    fn swap(&mut self, frame: &Frame) {
        // The canvas is always Some between calls; the Option exists only
        // to move it through the vsync swap.
        let Some(mut canvas) = self.canvas.take() else {
            return;
        };
        for (x, y, color) in frame.iter() {
            canvas.set(
                x,
                y,
                &LedColor {
                    red: color.r(),
                    green: color.g(),
                    blue: color.b(),
                },
            );
        }
        self.canvas = Some(self.matrix.swap(canvas));
    }
}

impl Panel for Hub75Panel {
    fn present(&mut self, frame: &Frame) {
        self.swap(frame);
    }

    fn clear(&mut self) {
        self.swap(&Frame::new());
    }
}
