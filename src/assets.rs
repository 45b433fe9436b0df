//! Embedded face artwork and animation datasets.
//!
//! The pixel data (masks, base image, per-animation frame lists) is authored
//! outside this crate and shipped as JSON under `assets/`, embedded at
//! compile time with `include_str!` and parsed exactly once at startup.
//! After loading, everything here is immutable; the renderer trusts the
//! coordinates and only re-checks them in debug builds.

use crate::frames::Frame;
use crate::{Color, PanelConfig};
use serde::Deserialize;
use std::sync::Arc;

/// The static face artwork: two disjoint coordinate masks plus the
/// background image used for every cell outside both masks.
#[derive(Debug, Deserialize)]
pub struct FaceSheet {
    /// Tintable region ("red" in the artwork), recolored by animations.
    pub accent_mask: Vec<(u32, u32)>,
    /// Fixed white region (face outline, body, antenna stem).
    pub outline_mask: Vec<(u32, u32)>,
    /// 32 rows of 32 `[r, g, b]` cells, indexed `[y][x]`.
    pub base_image: Vec<Vec<[u8; 3]>>,
}

impl FaceSheet {
    pub fn load(panel: PanelConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let sheet: FaceSheet = serde_json::from_str(include_str!("../assets/face.json"))?;

        if sheet.base_image.len() != panel.rows as usize
            || sheet
                .base_image
                .iter()
                .any(|row| row.len() != panel.cols as usize)
        {
            return Err(format!("base image must be {}x{}", panel.cols, panel.rows).into());
        }

        Ok(sheet)
    }

    pub fn base_color(&self, x: u32, y: u32) -> Color {
        let [r, g, b] = self.base_image[y as usize][x as usize];
        Color::new(r, g, b)
    }
}

/// All animation sequences, loaded once at startup into named slots.
///
/// An explicit registry instead of per-call dataset lookups: the data is
/// static, so every consumer shares one `Arc<[Frame]>` per animation.
pub struct AnimationLibrary {
    pub eyes_move: Arc<[Frame]>,
    pub laugh: Arc<[Frame]>,
    pub leftarm_up: Arc<[Frame]>,
    pub leftarm_down: Arc<[Frame]>,
    pub rightarm_up: Arc<[Frame]>,
    pub rightarm_down: Arc<[Frame]>,
    pub dance: Arc<[Frame]>,
}

impl AnimationLibrary {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            eyes_move: parse_sequence(
                "eyes_move",
                include_str!("../assets/animations/eyes_move.json"),
            )?,
            laugh: parse_sequence("laugh", include_str!("../assets/animations/laugh.json"))?,
            leftarm_up: parse_sequence(
                "leftarm_up",
                include_str!("../assets/animations/leftarm_up.json"),
            )?,
            leftarm_down: parse_sequence(
                "leftarm_down",
                include_str!("../assets/animations/leftarm_down.json"),
            )?,
            rightarm_up: parse_sequence(
                "rightarm_up",
                include_str!("../assets/animations/rightarm_up.json"),
            )?,
            rightarm_down: parse_sequence(
                "rightarm_down",
                include_str!("../assets/animations/rightarm_down.json"),
            )?,
            dance: parse_sequence("dance", include_str!("../assets/animations/dance.json"))?,
        })
    }
}

/// Parse one animation file: an ordered, non-empty list of frames.
fn parse_sequence(name: &str, json: &str) -> Result<Arc<[Frame]>, Box<dyn std::error::Error>> {
    let frames: Vec<Frame> = serde_json::from_str(json)
        .map_err(|e| format!("animation '{name}' failed to parse: {e}"))?;

    if frames.is_empty() {
        return Err(format!("animation '{name}' has no frames").into());
    }

    Ok(frames.into())
}

// ── Tests ──────────────────────────────────────────────────────────
