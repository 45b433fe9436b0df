//! Canvas abstraction over the pixel backend.
//!
//! The rendering core only ever calls [`Canvas::set_pixel`] and
//! [`Canvas::present`]. On a Pi that ends up on the LED panel through
//! `rpi-led-matrix`; everywhere else (tests, the preview demo) an
//! in-memory [`BufferCanvas`] stands in.
//!
//! The hardware panel is double-buffered: `swap()` hands back the *other*
//! buffer, which still holds the frame from two presents ago. The face
//! renderer relies on drawing on top of whatever is already displayed, so
//! [`MatrixCanvas`] keeps a persistent shadow grid and blits the whole
//! grid into the offscreen buffer on every present.

use crate::{Color, PanelConfig};

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedCanvas, LedMatrix, LedMatrixOptions, LedRuntimeOptions};

/// A mutable pixel surface the compositor paints onto.
pub trait Canvas {
    /// Set one pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Push the current pixel state to the display.
    fn present(&mut self);
}

// ── In-memory canvas ───────────────────────────────────────────────

/// Plain in-memory canvas, used by tests and the terminal preview demo.
///
/// Optionally records a snapshot of the grid at every `present()`, which
/// lets tests assert on each displayed frame of an animation rather than
/// only the final state.
pub struct BufferCanvas {
    panel: PanelConfig,
    pixels: Vec<Color>,
    presents: usize,
    history: Option<Vec<Vec<Color>>>,
}

impl BufferCanvas {
    pub fn new(panel: PanelConfig) -> Self {
        Self {
            panel,
            pixels: vec![Color::BLACK; panel.pixel_count() as usize],
            presents: 0,
            history: None,
        }
    }

    /// Like [`BufferCanvas::new`], but keeps a copy of the grid from every
    /// `present()` call. Unbounded, so only suitable for tests.
    pub fn recording(panel: PanelConfig) -> Self {
        Self {
            history: Some(Vec::new()),
            ..Self::new(panel)
        }
    }

    pub fn panel(&self) -> PanelConfig {
        self.panel
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.panel.cols + x) as usize]
    }

    /// Number of `present()` calls so far.
    pub fn presents(&self) -> usize {
        self.presents
    }

    /// Recorded per-present snapshots (empty unless constructed with
    /// [`BufferCanvas::recording`]). Index a snapshot as `y * cols + x`.
    pub fn history(&self) -> &[Vec<Color>] {
        self.history.as_deref().unwrap_or(&[])
    }
}

impl Canvas for BufferCanvas {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.panel.cols && y < self.panel.rows {
            self.pixels[(y * self.panel.cols + x) as usize] = color;
        }
    }

    fn present(&mut self) {
        self.presents += 1;
        if let Some(history) = &mut self.history {
            history.push(self.pixels.clone());
        }
    }
}

// ── Hardware canvas ────────────────────────────────────────────────

/// Create a matrix configured for our hardware:
/// Pi Zero 2 W + Adafruit Bonnet + configurable panel size.
///
/// # Rust concept: Result and the ? operator
/// This function returns `Result` because matrix initialization can fail
/// (e.g., if not running as root, or if GPIO is unavailable).
/// The caller uses `?` to propagate errors upward.
#[cfg(feature = "hardware")]
pub fn create_matrix(panel: PanelConfig) -> Result<LedMatrix, Box<dyn std::error::Error>> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows);
    options.set_cols(panel.cols);
    options.set_hardware_mapping("adafruit-hat");

    options.set_pwm_bits(8)?; // Full 8-bit color depth
    options.set_pwm_lsb_nanoseconds(130); // Stable timing (~143Hz refresh)

    let mut rt_options = LedRuntimeOptions::new();
    rt_options.set_gpio_slowdown(2); // Pi Zero 2 W requires slowdown=2

    let matrix = LedMatrix::new(Some(options), Some(rt_options))?;

    Ok(matrix)
}

/// The real LED panel behind the [`Canvas`] trait.
#[cfg(feature = "hardware")]
pub struct MatrixCanvas {
    matrix: LedMatrix,
    offscreen: Option<LedCanvas>,
    shadow: Vec<Color>,
    panel: PanelConfig,
}

#[cfg(feature = "hardware")]
impl MatrixCanvas {
    pub fn new(panel: PanelConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let matrix = create_matrix(panel)?;
        let offscreen = Some(matrix.offscreen_canvas());
        Ok(Self {
            matrix,
            offscreen,
            shadow: vec![Color::BLACK; panel.pixel_count() as usize],
            panel,
        })
    }
}

#[cfg(feature = "hardware")]
impl Canvas for MatrixCanvas {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.panel.cols && y < self.panel.rows {
            self.shadow[(y * self.panel.cols + x) as usize] = color;
        }
    }

    fn present(&mut self) {
        let Some(mut canvas) = self.offscreen.take() else {
            return;
        };
        for y in 0..self.panel.rows {
            for x in 0..self.panel.cols {
                let c = self.shadow[(y * self.panel.cols + x) as usize];
                canvas.set(x as i32, y as i32, &c.into());
            }
        }
        self.offscreen = Some(self.matrix.swap(canvas));
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn small() -> PanelConfig {
        PanelConfig::new(4, 4)
    }

    #[test]
    fn buffer_canvas_starts_black() {
        let canvas = BufferCanvas::new(small());
        assert_eq!(canvas.pixel(0, 0), Color::BLACK);
        assert_eq!(canvas.pixel(3, 3), Color::BLACK);
    }

    #[test]
    fn set_pixel_round_trips() {
        let mut canvas = BufferCanvas::new(small());
        canvas.set_pixel(2, 1, Color::new(9, 8, 7));
        assert_eq!(canvas.pixel(2, 1), Color::new(9, 8, 7));
        assert_eq!(canvas.pixel(1, 2), Color::BLACK);
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut canvas = BufferCanvas::new(small());
        canvas.set_pixel(4, 0, Color::WHITE);
        canvas.set_pixel(0, 4, Color::WHITE);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), Color::BLACK);
            }
        }
    }

    #[test]
    fn present_counts_without_history_by_default() {
        let mut canvas = BufferCanvas::new(small());
        canvas.present();
        canvas.present();
        assert_eq!(canvas.presents(), 2);
        assert!(canvas.history().is_empty());
    }

    #[test]
    fn recording_canvas_snapshots_every_present() {
        let mut canvas = BufferCanvas::recording(small());
        canvas.set_pixel(0, 0, Color::WHITE);
        canvas.present();
        canvas.set_pixel(0, 0, Color::new(1, 2, 3));
        canvas.present();

        let history = canvas.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0][0], Color::WHITE);
        assert_eq!(history[1][0], Color::new(1, 2, 3));
    }
}
