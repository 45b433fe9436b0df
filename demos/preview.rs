//! # Terminal Preview
//!
//! Renders the face to the terminal with ANSI colors instead of the LED
//! panel: the startup face, then a burst of rainbow and fire ticks.
//! Useful for eyeballing artwork and effect changes without hardware.
//!
//! ## Run it
//! ```sh
//! cargo run --example preview
//! ```

use led_face_rs::PanelConfig;
use led_face_rs::assets::{AnimationLibrary, FaceSheet};
use led_face_rs::canvas::BufferCanvas;
use led_face_rs::render::{AnimationSet, Compositor, FaceController, Mode};

fn print_canvas(canvas: &BufferCanvas, title: &str) {
    println!("{title}");
    let panel = canvas.panel();
    for y in 0..panel.rows {
        for x in 0..panel.cols {
            let c = canvas.pixel(x, y);
            // Two spaces on a 24-bit background color make a square-ish pixel.
            print!("\x1b[48;2;{};{};{}m  ", c.r, c.g, c.b);
        }
        println!("\x1b[0m");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let panel = PanelConfig::default();
    let sheet = FaceSheet::load(panel)?;
    let library = AnimationLibrary::load()?;

    let compositor = Compositor::new(BufferCanvas::new(panel), panel, &sheet);
    let mut face = FaceController::new(compositor, AnimationSet::new(&library));

    print_canvas(face.canvas(), "Startup face (solid red):");

    face.set_mode(Mode::Rainbow);
    for _ in 0..30 {
        face.tick();
    }
    print_canvas(face.canvas(), "Rainbow after 30 ticks:");

    face.set_mode(Mode::Fire);
    for _ in 0..30 {
        face.tick();
    }
    print_canvas(face.canvas(), "Fire after 30 more ticks:");

    Ok(())
}
