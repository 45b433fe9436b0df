//! LED Face Server
//!
//! Runs on the Pi behind the matrix and turns one-line TCP commands into
//! face animations: solid palette colors, a rainbow sweep, fire flicker,
//! eye and limb animations, a laugh, and two dances.
//!
//! ## Architecture
//! - All state lives in one `FaceController` owned by the service loop
//! - The loop runs on a single-threaded tokio runtime and `select!`s
//!   between the command listener and the ~30 Hz frame ticker
//! - Commands arrive one per connection and are serviced to completion
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/led-face-rs
//! ```
//! Then, from anywhere on the LAN:
//! ```sh
//! echo rainbow | nc <pi-address> 5000
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This binary requires the 'hardware' feature (rpi-led-matrix).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::exit(1);
}

#[cfg(feature = "hardware")]
fn main() {
    hardware_main();
}

#[cfg(feature = "hardware")]
#[tokio::main(flavor = "current_thread")]
async fn hardware_main() {
    use led_face_rs::assets::{AnimationLibrary, FaceSheet};
    use led_face_rs::canvas::MatrixCanvas;
    use led_face_rs::render::{AnimationSet, Compositor, FaceController};
    use led_face_rs::{PanelConfig, server, setup_signal_handler};

    // Initialize tracing subscriber for service logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let panel = PanelConfig::default();

    tracing::info!("LED Face Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Panel: {}x{}", panel.cols, panel.rows);

    let sheet = match FaceSheet::load(panel) {
        Ok(sheet) => sheet,
        Err(e) => {
            tracing::error!("Failed to load face artwork: {e}");
            std::process::exit(1);
        }
    };

    let library = match AnimationLibrary::load() {
        Ok(library) => library,
        Err(e) => {
            tracing::error!("Failed to load animations: {e}");
            std::process::exit(1);
        }
    };

    let canvas = match MatrixCanvas::new(panel) {
        Ok(canvas) => canvas,
        Err(e) => {
            tracing::error!("Failed to initialize LED matrix: {e}");
            std::process::exit(1);
        }
    };

    // Construction paints the startup face: static base plus red accent.
    let compositor = Compositor::new(canvas, panel, &sheet);
    let mut face = FaceController::new(compositor, AnimationSet::new(&library));

    let running = setup_signal_handler();

    let addr = format!("0.0.0.0:{}", server::PORT);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind command socket");

    tracing::info!("Command socket listening on {addr}");
    tracing::info!("Available commands: {}", server::COMMAND_VOCABULARY.join(", "));

    server::serve(listener, &mut face, running).await;

    tracing::info!("Shut down cleanly");
}
