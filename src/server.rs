//! Command socket: parse one-line commands and run the service loop.
//!
//! The transport is deliberately tiny: a TCP listener on a fixed port,
//! one command per connection, one response line back, connection closed.
//! The service loop interleaves that with the periodic redraw of the
//! active mode, all on a single task.
//!
//! ## Rust concepts
//! - `enum` with data variants (tagged unions) for the command vocabulary
//! - `tokio::select!` to wait on the listener and the frame ticker at once
//! - `tokio::time::timeout` wrapping a read to bound a slow client

use crate::canvas::Canvas;
use crate::is_running;
use crate::render::{FRAME_INTERVAL, FaceController, Limb, Mode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::MissedTickBehavior;

/// Fixed command port.
pub const PORT: u16 = 5000;

/// A client gets this long to send its command before the connection is
/// dropped. Failing the connection, never the process.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Every token the router accepts, in the order shown to clients in the
/// unknown-command error.
pub const COMMAND_VOCABULARY: &[&str] = &[
    "red",
    "blue",
    "green",
    "purple",
    "pink",
    "rainbow",
    "static",
    "fire",
    "eyes_moving",
    "eyes_blinking",
    "eyes_crazy",
    "laugh",
    "leftarm_up",
    "leftarm_down",
    "rightarm_up",
    "rightarm_down",
    "dance_1",
    "dance_2",
];

// ── Commands ─────────────────────────────────────────────────────────

/// One parsed command token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FaceCommand {
    /// Select a palette tint and show it immediately.
    SetColor(String),
    Rainbow,
    Static,
    Fire,
    EyesMoving,
    EyesBlinking,
    EyesCrazy,
    Laugh,
    LeftArmUp,
    LeftArmDown,
    RightArmUp,
    RightArmDown,
    Dance1,
    Dance2,
}

impl FaceCommand {
    /// Parse a trimmed, lowercased token. `None` for anything outside the
    /// vocabulary.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "red" | "blue" | "green" | "purple" | "pink" => {
                Some(Self::SetColor(token.to_string()))
            }
            "rainbow" => Some(Self::Rainbow),
            "static" => Some(Self::Static),
            "fire" => Some(Self::Fire),
            "eyes_moving" => Some(Self::EyesMoving),
            "eyes_blinking" => Some(Self::EyesBlinking),
            "eyes_crazy" => Some(Self::EyesCrazy),
            "laugh" => Some(Self::Laugh),
            "leftarm_up" => Some(Self::LeftArmUp),
            "leftarm_down" => Some(Self::LeftArmDown),
            "rightarm_up" => Some(Self::RightArmUp),
            "rightarm_down" => Some(Self::RightArmDown),
            "dance_1" => Some(Self::Dance1),
            "dance_2" => Some(Self::Dance2),
            _ => None,
        }
    }
}

/// Apply one command to the face and produce the response line.
///
/// Burst commands play their whole animation before returning; the caller
/// holds the connection open meanwhile and answers afterwards.
pub async fn dispatch<C: Canvas>(face: &mut FaceController<C>, input: &str) -> String {
    let Some(command) = FaceCommand::parse(input) else {
        return format!(
            "ERROR: Unknown command '{input}'. Available: {}",
            COMMAND_VOCABULARY.join(", ")
        );
    };

    match command {
        FaceCommand::SetColor(name) => {
            face.apply_color(&name);
            format!("OK: {} mode", name.to_uppercase())
        }
        FaceCommand::Rainbow => {
            // Drawing happens on the next tick.
            face.set_mode(Mode::Rainbow);
            "OK: RAINBOW mode".to_string()
        }
        FaceCommand::Static => {
            face.show_static();
            "OK: STATIC mode".to_string()
        }
        FaceCommand::Fire => {
            face.set_mode(Mode::Fire);
            "OK: FIRE mode".to_string()
        }
        FaceCommand::EyesMoving => {
            face.run_eyes_moving().await;
            "OK: EYES MOVING mode".to_string()
        }
        FaceCommand::EyesBlinking => {
            face.set_mode(Mode::EyesBlinking);
            "OK: EYES BLINKING mode".to_string()
        }
        FaceCommand::EyesCrazy => {
            face.set_mode(Mode::EyesCrazy);
            "OK: EYES CRAZY mode".to_string()
        }
        FaceCommand::Laugh => {
            face.run_laugh().await;
            "OK: LAUGH mode".to_string()
        }
        FaceCommand::LeftArmUp => {
            face.run_limb(Limb::LeftArmUp).await;
            "OK: leftarm_up mode".to_string()
        }
        FaceCommand::LeftArmDown => {
            face.run_limb(Limb::LeftArmDown).await;
            "OK: leftarm_down mode".to_string()
        }
        FaceCommand::RightArmUp => {
            face.run_limb(Limb::RightArmUp).await;
            "OK: rightarm_up mode".to_string()
        }
        FaceCommand::RightArmDown => {
            face.run_limb(Limb::RightArmDown).await;
            "OK: rightarm_down mode".to_string()
        }
        FaceCommand::Dance1 => {
            face.run_dance_1().await;
            "OK: dance_1 mode".to_string()
        }
        FaceCommand::Dance2 => {
            face.run_dance_2().await;
            "OK: dance_2 mode".to_string()
        }
    }
}

// ── Service loop ─────────────────────────────────────────────────────

/// Run the face service until the shutdown flag clears.
///
/// Each iteration waits on whichever comes first: an incoming connection
/// (serviced to completion, including any burst its command plays) or the
/// frame ticker (one `tick()` of the active mode). A connection accepted
/// mid-burst simply waits in the listen backlog; that is the accepted
/// trade-off of the single-task design.
pub async fn serve<C: Canvas>(
    listener: TcpListener,
    face: &mut FaceController<C>,
    running: Arc<AtomicBool>,
) {
    let mut ticker =
        tokio::time::interval_at(tokio::time::Instant::now() + FRAME_INTERVAL, FRAME_INTERVAL);
    // A burst can overrun many intervals; afterwards we want one catch-up
    // tick, not a machine-gun replay of every missed one.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while is_running(&running) {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => handle_client(stream, peer, face).await,
                Err(e) => tracing::warn!("Accept failed: {e}"),
            },
            _ = ticker.tick() => face.tick(),
        }
    }
}

/// Service one connection: read one command, dispatch it, answer, close.
///
/// Any transport failure (including the read timeout) aborts only this
/// connection; the service loop keeps going.
async fn handle_client<C: Canvas>(
    mut stream: TcpStream,
    peer: SocketAddr,
    face: &mut FaceController<C>,
) {
    tracing::info!("Client connected from {peer}");

    let mut buf = [0u8; 1024];
    let n = match tokio::time::timeout(READ_TIMEOUT, stream.read(&mut buf)).await {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            tracing::warn!("Client {peer} read failed: {e}");
            fail_client(stream).await;
            return;
        }
        Err(_) => {
            tracing::warn!("Client {peer} sent nothing within {READ_TIMEOUT:?}");
            fail_client(stream).await;
            return;
        }
    };

    let command = String::from_utf8_lossy(&buf[..n]).trim().to_lowercase();
    tracing::info!("Received command: {command:?}");

    let response = dispatch(face, &command).await;
    if let Err(e) = stream.write_all(format!("{response}\n").as_bytes()).await {
        tracing::warn!("Client {peer} write failed: {e}");
    }
}

/// Best-effort error line before dropping a failed connection.
async fn fail_client(mut stream: TcpStream) {
    let _ = stream.write_all(b"ERROR: Connection failed\n").await;
}

// ── Tests ──────────────────────────────────────────────────────────
