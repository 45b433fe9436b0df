//! Precomputed animation frames and the cursor that walks them.

use serde::Deserialize;
use std::sync::Arc;

/// One step of a precomputed animation: the only pixels this step redraws.
///
/// `outline_pixels` are painted white, `accent_pixels` in the currently
/// selected tint. Everything else keeps whatever was drawn before.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Frame {
    pub accent_pixels: Vec<(u32, u32)>,
    pub outline_pixels: Vec<(u32, u32)>,
}

/// Cyclic cursor over a shared frame sequence.
///
/// Each animation (eyes, laugh, each limb, dance) owns its own sequencer,
/// so cursors persist independently between calls. That one primitive
/// covers both playback patterns: one frame per tick for continuous modes
/// and "run N frames now" for command bursts.
pub struct FrameSequencer {
    frames: Arc<[Frame]>,
    cursor: usize,
}

impl FrameSequencer {
    /// The sequence must be non-empty; asset loading enforces that.
    pub fn new(frames: Arc<[Frame]>) -> Self {
        debug_assert!(!frames.is_empty(), "animation sequence has no frames");
        Self { frames, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Return the current frame and advance the cursor, wrapping at the end.
    pub fn next_frame(&mut self) -> &Frame {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.frames.len();
        &self.frames[index]
    }

    /// Rewind to the first frame.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

// ── Tests ──────────────────────────────────────────────────────────
