//! Shared types for the LED face server.
//!
//! This crate drives a 32x32 RGB LED matrix showing a character face whose
//! expression is switched by one-line text commands over a TCP socket.
//! The modules split along the rendering pipeline:
//! - [`assets`]: embedded face artwork and animation datasets
//! - [`canvas`]: the pixel backend abstraction (hardware panel or in-memory)
//! - [`effects`]: procedural color fields (rainbow, fire)
//! - [`frames`]: precomputed frame sequences and their cursors
//! - [`render`]: the compositor and the face mode controller
//! - [`server`]: command parsing and the TCP service loop
//!
//! The root module holds the small shared pieces: panel dimensions, the
//! color type, the named tint palette, and signal handling for clean
//! shutdown.

pub mod assets;
pub mod canvas;
pub mod effects;
pub mod frames;
pub mod render;
pub mod server;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Panel configuration ────────────────────────────────────────────

/// Configuration for the LED panel dimensions.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just two u32s).
/// `Debug` gives us `{:?}` formatting. `PartialEq, Eq` let us compare.
/// This is the idiomatic way to pass configuration through a system —
/// explicit, testable, and no hidden global state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: u32,
    pub cols: u32,
}

impl PanelConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of pixels on the panel.
    pub fn pixel_count(&self) -> u32 {
        self.rows * self.cols
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { rows: 32, cols: 32 }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// Our own color type, decoupled from the hardware crate.
///
/// This lets us test rendering logic on any machine without needing
/// `rpi-led-matrix`. At the hardware boundary, we convert via
/// `Into<LedColor>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Look up a tint by palette name.
    ///
    /// The palette is a closed set; any name outside it falls back to red.
    /// The set-color command path relies on that fallback, so keep it.
    pub fn from_name(name: &str) -> Self {
        match name {
            "blue" => Self::new(0, 0, 255),
            "green" => Self::new(0, 255, 0),
            "purple" => Self::new(128, 0, 128),
            "pink" => Self::new(255, 105, 180),
            // "red" and everything unrecognized
            _ => Self::new(255, 0, 0),
        }
    }
}

/// Convert our Color to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

// ── Signal handling ────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// We need to share the `running` flag between the service loop and the
/// signal handler. `Arc` (Atomic Reference Counting) lets multiple owners
/// share data. `AtomicBool` is a thread-safe boolean — no mutex needed
/// for a single bool.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone(); // Clone the Arc, not the bool — both point to same data

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    running
}

/// Check if the service loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
