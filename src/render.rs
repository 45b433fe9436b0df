//! Rendering core: the compositor and the face mode controller.
//!
//! The compositor owns the canvas and knows the face artwork's two masked
//! regions; every drawing operation is expressed against those masks or
//! against a precomputed animation frame. The controller layers the mode
//! state machine on top: persistent modes draw one step per service tick,
//! command bursts play a bounded number of frames synchronously and then
//! drop back to the static face.
//!
//! ## Rust concepts
//! - Generics over the [`Canvas`] trait, so the same renderer drives the
//!   LED panel and the in-memory test canvas
//! - `enum` state machine with exhaustive `match`
//! - Closures passed to `draw_procedural` to inject the color field
//! - `async fn` bursts that sleep between frames without blocking the
//!   runtime's timer

use crate::assets::{AnimationLibrary, FaceSheet};
use crate::canvas::Canvas;
use crate::effects;
use crate::frames::{Frame, FrameSequencer};
use crate::{Color, PanelConfig};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;

// ── Timing and limits ────────────────────────────────────────────────

/// Cadence of the periodic redraw, roughly 30 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// The laugh plays much slower than the other animations.
pub const LAUGH_FRAME_DELAY: Duration = Duration::from_millis(500);

/// Phase wraps here to keep the counter small.
const PHASE_WRAP: u32 = 10_000;

const EYES_MOVING_CYCLES: usize = 2;
const LAUGH_CYCLES: usize = 2;

// ── Regions ──────────────────────────────────────────────────────────

/// Inclusive rectangle blacked out before a sparse animation frame is
/// drawn, erasing the previous frame's footprint.
#[derive(Clone, Copy, Debug)]
pub struct ClearRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Bounding box of the left arm's travel.
pub const LEFT_ARM_BOX: ClearRect = ClearRect {
    x0: 0,
    y0: 0,
    x1: 8,
    y1: 26,
};

/// Bounding box of the right arm's travel.
pub const RIGHT_ARM_BOX: ClearRect = ClearRect {
    x0: 23,
    y0: 0,
    x1: 31,
    y1: 26,
};

// ── Modes ────────────────────────────────────────────────────────────

/// What the face is currently showing.
///
/// Exactly one mode is active. `EyesMoving` only ever exists during its
/// synchronous burst; the laugh, limb, and dance animations never become a
/// mode at all, they play out inside the command and leave `Static` behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    SolidColor,
    Rainbow,
    Static,
    Fire,
    EyesMoving,
    EyesBlinking,
    EyesCrazy,
}

/// The four one-shot limb animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limb {
    LeftArmUp,
    LeftArmDown,
    RightArmUp,
    RightArmDown,
}

// ── Compositor ───────────────────────────────────────────────────────

/// Owns the canvas and paints the face onto it.
///
/// Construction precomputes the base-image color of every cell outside
/// both masks, so a static repaint never touches the image data again.
pub struct Compositor<C: Canvas> {
    canvas: C,
    panel: PanelConfig,
    accent: HashSet<(u32, u32)>,
    outline: HashSet<(u32, u32)>,
    base_cells: Vec<(u32, u32, Color)>,
}

/// All coordinates in the datasets are pre-validated by the supplier;
/// re-check only in debug builds.
fn paint<C: Canvas>(canvas: &mut C, panel: PanelConfig, x: u32, y: u32, color: Color) {
    debug_assert!(
        x < panel.cols && y < panel.rows,
        "pixel ({x},{y}) outside {}x{} panel",
        panel.cols,
        panel.rows
    );
    canvas.set_pixel(x, y, color);
}

impl<C: Canvas> Compositor<C> {
    pub fn new(canvas: C, panel: PanelConfig, sheet: &FaceSheet) -> Self {
        let accent: HashSet<_> = sheet.accent_mask.iter().copied().collect();
        let outline: HashSet<_> = sheet.outline_mask.iter().copied().collect();

        let mut base_cells = Vec::new();
        for y in 0..panel.rows {
            for x in 0..panel.cols {
                if !accent.contains(&(x, y)) && !outline.contains(&(x, y)) {
                    base_cells.push((x, y, sheet.base_color(x, y)));
                }
            }
        }

        Self {
            canvas,
            panel,
            accent,
            outline,
            base_cells,
        }
    }

    pub fn panel(&self) -> PanelConfig {
        self.panel
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Repaint everything that never animates: the outline mask in white
    /// and every unmasked cell from the cached base image. Accent cells are
    /// left untouched for the caller to fill. Idempotent.
    pub fn draw_static_base(&mut self) {
        for &(x, y) in &self.outline {
            paint(&mut self.canvas, self.panel, x, y, Color::WHITE);
        }
        for &(x, y, color) in &self.base_cells {
            paint(&mut self.canvas, self.panel, x, y, color);
        }
    }

    /// Fill the whole accent region with one color.
    pub fn draw_solid(&mut self, color: Color) {
        for &(x, y) in &self.accent {
            paint(&mut self.canvas, self.panel, x, y, color);
        }
    }

    /// Fill the accent region from a procedural color field.
    pub fn draw_procedural<F: Fn(u32, u32) -> Color>(&mut self, field: F) {
        for &(x, y) in &self.accent {
            paint(&mut self.canvas, self.panel, x, y, field(x, y));
        }
    }

    /// Draw one animation frame: black out the clear regions (limb frames
    /// are sparse and do not cover the same footprint every step), then
    /// paint the frame's outline pixels white and its accent pixels in the
    /// tint.
    pub fn draw_frame(&mut self, frame: &Frame, tint: Color, clear: &[ClearRect]) {
        for rect in clear {
            let x1 = rect.x1.min(self.panel.cols - 1);
            let y1 = rect.y1.min(self.panel.rows - 1);
            for y in rect.y0..=y1 {
                for x in rect.x0..=x1 {
                    paint(&mut self.canvas, self.panel, x, y, Color::BLACK);
                }
            }
        }
        for &(x, y) in &frame.outline_pixels {
            paint(&mut self.canvas, self.panel, x, y, Color::WHITE);
        }
        for &(x, y) in &frame.accent_pixels {
            paint(&mut self.canvas, self.panel, x, y, tint);
        }
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }
}

// ── Animation set ────────────────────────────────────────────────────

/// One sequencer per named animation, each with its own persistent cursor.
pub struct AnimationSet {
    pub eyes_move: FrameSequencer,
    pub eyes_blink: FrameSequencer,
    pub eyes_crazy: FrameSequencer,
    pub laugh: FrameSequencer,
    pub leftarm_up: FrameSequencer,
    pub leftarm_down: FrameSequencer,
    pub rightarm_up: FrameSequencer,
    pub rightarm_down: FrameSequencer,
    pub dance: FrameSequencer,
}

impl AnimationSet {
    pub fn new(library: &AnimationLibrary) -> Self {
        Self {
            eyes_move: FrameSequencer::new(library.eyes_move.clone()),
            // No dedicated blink/crazy datasets shipped; both play the
            // eyes-move frames, each with an independent cursor.
            eyes_blink: FrameSequencer::new(library.eyes_move.clone()),
            eyes_crazy: FrameSequencer::new(library.eyes_move.clone()),
            laugh: FrameSequencer::new(library.laugh.clone()),
            leftarm_up: FrameSequencer::new(library.leftarm_up.clone()),
            leftarm_down: FrameSequencer::new(library.leftarm_down.clone()),
            rightarm_up: FrameSequencer::new(library.rightarm_up.clone()),
            rightarm_down: FrameSequencer::new(library.rightarm_down.clone()),
            dance: FrameSequencer::new(library.dance.clone()),
        }
    }
}

// ── Face controller ──────────────────────────────────────────────────

/// The face's whole mutable state: compositor, sequencers, active mode,
/// procedural phase, and the selected tint. Owned by the service loop and
/// mutated nowhere else.
pub struct FaceController<C: Canvas> {
    compositor: Compositor<C>,
    animations: AnimationSet,
    mode: Mode,
    phase: u32,
    stripe_width: f32,
    current_color: Color,
}

impl<C: Canvas> FaceController<C> {
    /// Builds the controller and paints the startup face: static base plus
    /// the accent region in the default red.
    pub fn new(compositor: Compositor<C>, animations: AnimationSet) -> Self {
        let mut controller = Self {
            compositor,
            animations,
            mode: Mode::SolidColor,
            phase: 0,
            stripe_width: effects::DEFAULT_STRIPE_WIDTH,
            current_color: Color::from_name("red"),
        };
        controller.compositor.draw_static_base();
        controller.compositor.draw_solid(controller.current_color);
        controller.compositor.present();
        controller
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn current_color(&self) -> Color {
        self.current_color
    }

    pub fn canvas(&self) -> &C {
        self.compositor.canvas()
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn set_stripe_width(&mut self, width: f32) {
        self.stripe_width = width;
    }

    /// Switch to a mode whose drawing happens on subsequent ticks.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Select a tint by palette name and immediately repaint the accent
    /// region with it.
    pub fn apply_color(&mut self, name: &str) {
        self.current_color = Color::from_name(name);
        self.mode = Mode::SolidColor;
        self.compositor.draw_solid(self.current_color);
        self.compositor.present();
    }

    /// Switch to the static face and repaint the base layers now.
    pub fn show_static(&mut self) {
        self.mode = Mode::Static;
        self.compositor.draw_static_base();
        self.compositor.present();
    }

    /// One step of the active mode; called by the service loop once per
    /// frame interval. Presents only when something was drawn.
    pub fn tick(&mut self) {
        match self.mode {
            Mode::Rainbow => {
                self.advance_phase();
                let phase = self.phase;
                let width = self.compositor.panel().cols;
                let stripe = self.stripe_width;
                self.compositor
                    .draw_procedural(|x, y| effects::rainbow(x, y, phase, width, stripe));
                self.compositor.present();
            }
            Mode::Fire => {
                self.advance_phase();
                let phase = self.phase;
                self.compositor
                    .draw_procedural(move |x, y| effects::fire(x, y, phase));
                self.compositor.present();
            }
            Mode::EyesBlinking => {
                Self::step(
                    &mut self.compositor,
                    &mut self.animations.eyes_blink,
                    self.current_color,
                    &[],
                );
                self.compositor.present();
            }
            Mode::EyesCrazy => {
                Self::step(
                    &mut self.compositor,
                    &mut self.animations.eyes_crazy,
                    self.current_color,
                    &[],
                );
                self.compositor.present();
            }
            // Solid and static faces need no periodic redraw; the
            // eyes-moving burst draws synchronously when commanded.
            Mode::SolidColor | Mode::Static | Mode::EyesMoving => {}
        }
    }

    fn advance_phase(&mut self) {
        self.phase += 1;
        if self.phase > PHASE_WRAP {
            self.phase = 0;
        }
    }

    /// Draw the next frame of one sequencer. An associated function so call
    /// sites can split-borrow the compositor and the sequencer.
    fn step(
        compositor: &mut Compositor<C>,
        sequencer: &mut FrameSequencer,
        tint: Color,
        clear: &[ClearRect],
    ) {
        let frame = sequencer.next_frame();
        compositor.draw_frame(frame, tint, clear);
    }

    fn step_limb(&mut self, limb: Limb) {
        let (sequencer, rect) = match limb {
            Limb::LeftArmUp => (&mut self.animations.leftarm_up, LEFT_ARM_BOX),
            Limb::LeftArmDown => (&mut self.animations.leftarm_down, LEFT_ARM_BOX),
            Limb::RightArmUp => (&mut self.animations.rightarm_up, RIGHT_ARM_BOX),
            Limb::RightArmDown => (&mut self.animations.rightarm_down, RIGHT_ARM_BOX),
        };
        Self::step(&mut self.compositor, sequencer, self.current_color, &[rect]);
    }

    fn limb_steps(&self, limb: Limb) -> usize {
        match limb {
            Limb::LeftArmUp => self.animations.leftarm_up.len(),
            Limb::LeftArmDown => self.animations.leftarm_down.len(),
            Limb::RightArmUp => self.animations.rightarm_up.len(),
            Limb::RightArmDown => self.animations.rightarm_down.len(),
        }
    }

    // ── Bursts ───────────────────────────────────────────────────────
    //
    // Each burst plays a bounded number of frames to completion, presenting
    // and sleeping between frames, then forces the mode back to Static.
    // The service loop does not accept new commands while one runs.

    /// Slide the eyes through two full cycles.
    pub async fn run_eyes_moving(&mut self) {
        self.mode = Mode::EyesMoving;
        let total = EYES_MOVING_CYCLES * self.animations.eyes_move.len();
        for _ in 0..total {
            Self::step(
                &mut self.compositor,
                &mut self.animations.eyes_move,
                self.current_color,
                &[],
            );
            self.compositor.present();
            sleep(FRAME_INTERVAL).await;
        }
        self.mode = Mode::Static;
    }

    /// Two slow cycles of the laugh.
    pub async fn run_laugh(&mut self) {
        let total = LAUGH_CYCLES * self.animations.laugh.len();
        for _ in 0..total {
            Self::step(
                &mut self.compositor,
                &mut self.animations.laugh,
                self.current_color,
                &[],
            );
            self.compositor.present();
            sleep(LAUGH_FRAME_DELAY).await;
        }
        self.mode = Mode::Static;
    }

    /// One cycle of a limb animation, erasing the arm's bounding box before
    /// each frame.
    pub async fn run_limb(&mut self, limb: Limb) {
        for _ in 0..self.limb_steps(limb) {
            self.step_limb(limb);
            self.compositor.present();
            sleep(FRAME_INTERVAL).await;
        }
        self.mode = Mode::Static;
    }

    /// First dance: left arm up, then left-down with right-up, then left-up
    /// with right-down. All three passes run one left-arm cycle's worth of
    /// frames.
    pub async fn run_dance_1(&mut self) {
        let steps = self.animations.leftarm_up.len();
        for _ in 0..steps {
            self.step_limb(Limb::LeftArmUp);
            self.compositor.present();
            sleep(FRAME_INTERVAL).await;
        }
        for _ in 0..steps {
            self.step_limb(Limb::LeftArmDown);
            self.step_limb(Limb::RightArmUp);
            self.compositor.present();
            sleep(FRAME_INTERVAL).await;
        }
        for _ in 0..steps {
            self.step_limb(Limb::LeftArmUp);
            self.step_limb(Limb::RightArmDown);
            self.compositor.present();
            sleep(FRAME_INTERVAL).await;
        }
        self.mode = Mode::Static;
    }

    /// Second dance: one cycle of the dedicated dance sequence, clearing
    /// both arm regions under every frame.
    pub async fn run_dance_2(&mut self) {
        for _ in 0..self.animations.dance.len() {
            Self::step(
                &mut self.compositor,
                &mut self.animations.dance,
                self.current_color,
                &[LEFT_ARM_BOX, RIGHT_ARM_BOX],
            );
            self.compositor.present();
            sleep(FRAME_INTERVAL).await;
        }
        self.mode = Mode::Static;
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BufferCanvas;
    use crate::frames::Frame;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn sheet(
        panel: PanelConfig,
        accent: &[(u32, u32)],
        outline: &[(u32, u32)],
        base: [u8; 3],
    ) -> FaceSheet {
        FaceSheet {
            accent_mask: accent.to_vec(),
            outline_mask: outline.to_vec(),
            base_image: vec![vec![base; panel.cols as usize]; panel.rows as usize],
        }
    }

    /// Frames with one accent pixel and one outline pixel each.
    fn frames_at(coords: &[(u32, u32)]) -> Arc<[Frame]> {
        coords
            .iter()
            .map(|&(x, y)| Frame {
                accent_pixels: vec![(x, y)],
                outline_pixels: vec![(x + 1, y)],
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn fixture_animations() -> AnimationSet {
        let eyes = frames_at(&[(12, 5), (13, 5), (14, 5)]);
        AnimationSet {
            eyes_move: FrameSequencer::new(eyes.clone()),
            eyes_blink: FrameSequencer::new(eyes.clone()),
            eyes_crazy: FrameSequencer::new(eyes),
            laugh: FrameSequencer::new(frames_at(&[(14, 11), (15, 12)])),
            leftarm_up: FrameSequencer::new(frames_at(&[(1, 1), (3, 3)])),
            leftarm_down: FrameSequencer::new(frames_at(&[(1, 5), (3, 7)])),
            rightarm_up: FrameSequencer::new(frames_at(&[(24, 1), (26, 3)])),
            rightarm_down: FrameSequencer::new(frames_at(&[(24, 5), (26, 7)])),
            dance: FrameSequencer::new(frames_at(&[(2, 2), (25, 2)])),
        }
    }

    /// Controller over a recording canvas, for asserting per-present frames.
    fn fixture_face(accent: &[(u32, u32)]) -> FaceController<BufferCanvas> {
        let panel = PanelConfig::default();
        let art = sheet(panel, accent, &[(30, 30)], [5, 6, 7]);
        let compositor = Compositor::new(BufferCanvas::recording(panel), panel, &art);
        FaceController::new(compositor, fixture_animations())
    }

    /// Controller over a plain canvas, for tests with many presents.
    fn fixture_face_plain(accent: &[(u32, u32)]) -> FaceController<BufferCanvas> {
        let panel = PanelConfig::default();
        let art = sheet(panel, accent, &[(30, 30)], [5, 6, 7]);
        let compositor = Compositor::new(BufferCanvas::new(panel), panel, &art);
        FaceController::new(compositor, fixture_animations())
    }

    // ── Compositor ─────────────────────────────────────────────────

    #[test]
    fn static_base_plus_solid_red_partitions_the_canvas() {
        let panel = PanelConfig::new(4, 4);
        let art = sheet(panel, &[(1, 1), (2, 1)], &[(0, 0), (3, 3)], [9, 9, 9]);
        let mut compositor = Compositor::new(BufferCanvas::new(panel), panel, &art);

        compositor.draw_static_base();
        compositor.draw_solid(Color::new(255, 0, 0));

        for y in 0..4 {
            for x in 0..4 {
                let expected = if [(1, 1), (2, 1)].contains(&(x, y)) {
                    Color::new(255, 0, 0)
                } else if [(0, 0), (3, 3)].contains(&(x, y)) {
                    Color::WHITE
                } else {
                    Color::new(9, 9, 9)
                };
                assert_eq!(compositor.canvas().pixel(x, y), expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn static_base_leaves_accent_cells_untouched() {
        let panel = PanelConfig::new(4, 4);
        let art = sheet(panel, &[(1, 1)], &[(0, 0)], [9, 9, 9]);
        let mut compositor = Compositor::new(BufferCanvas::new(panel), panel, &art);

        compositor.draw_solid(Color::new(0, 0, 255));
        compositor.draw_static_base();

        assert_eq!(compositor.canvas().pixel(1, 1), Color::new(0, 0, 255));
    }

    #[test]
    fn draw_frame_clears_the_region_before_painting() {
        let panel = PanelConfig::new(8, 8);
        let art = sheet(panel, &[], &[], [9, 9, 9]);
        let mut compositor = Compositor::new(BufferCanvas::new(panel), panel, &art);
        compositor.draw_static_base();

        let frame = Frame {
            accent_pixels: vec![(1, 1)],
            outline_pixels: vec![(2, 2)],
        };
        let rect = ClearRect {
            x0: 0,
            y0: 0,
            x1: 3,
            y1: 3,
        };
        compositor.draw_frame(&frame, Color::new(0, 255, 0), &[rect]);

        for y in 0..8 {
            for x in 0..8 {
                let expected = match (x, y) {
                    (1, 1) => Color::new(0, 255, 0),
                    (2, 2) => Color::WHITE,
                    (x, y) if x <= 3 && y <= 3 => Color::BLACK,
                    _ => Color::new(9, 9, 9),
                };
                assert_eq!(compositor.canvas().pixel(x, y), expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn clear_regions_clamp_to_the_panel() {
        let panel = PanelConfig::new(4, 4);
        let art = sheet(panel, &[], &[], [9, 9, 9]);
        let mut compositor = Compositor::new(BufferCanvas::new(panel), panel, &art);
        compositor.draw_static_base();

        let frame = Frame {
            accent_pixels: vec![],
            outline_pixels: vec![],
        };
        let oversized = ClearRect {
            x0: 0,
            y0: 0,
            x1: 100,
            y1: 100,
        };
        compositor.draw_frame(&frame, Color::WHITE, &[oversized]);

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(compositor.canvas().pixel(x, y), Color::BLACK);
            }
        }
    }

    #[test]
    fn draw_procedural_feeds_cell_coordinates_to_the_field() {
        let panel = PanelConfig::new(4, 4);
        let art = sheet(panel, &[(0, 1), (2, 3)], &[], [9, 9, 9]);
        let mut compositor = Compositor::new(BufferCanvas::new(panel), panel, &art);

        compositor.draw_procedural(|x, y| Color::new(x as u8, y as u8, 42));

        assert_eq!(compositor.canvas().pixel(0, 1), Color::new(0, 1, 42));
        assert_eq!(compositor.canvas().pixel(2, 3), Color::new(2, 3, 42));
        assert_eq!(compositor.canvas().pixel(1, 1), Color::BLACK);
    }

    // ── Controller ─────────────────────────────────────────────────

    #[test]
    fn startup_face_uses_the_shipped_artwork() {
        let panel = PanelConfig::default();
        let art = FaceSheet::load(panel).unwrap();
        let library = AnimationLibrary::load().unwrap();
        let compositor = Compositor::new(BufferCanvas::new(panel), panel, &art);
        let face = FaceController::new(compositor, AnimationSet::new(&library));

        assert_eq!(face.mode(), Mode::SolidColor);
        assert_eq!(face.current_color(), Color::new(255, 0, 0));

        let accent: std::collections::HashSet<_> = art.accent_mask.iter().copied().collect();
        let outline: std::collections::HashSet<_> = art.outline_mask.iter().copied().collect();
        for y in 0..panel.rows {
            for x in 0..panel.cols {
                let expected = if accent.contains(&(x, y)) {
                    Color::new(255, 0, 0)
                } else if outline.contains(&(x, y)) {
                    Color::WHITE
                } else {
                    art.base_color(x, y)
                };
                assert_eq!(face.canvas().pixel(x, y), expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn apply_color_overrides_any_prior_mode() {
        let mut face = fixture_face(&[(10, 20), (11, 20)]);
        face.set_mode(Mode::Rainbow);

        face.apply_color("blue");

        assert_eq!(face.mode(), Mode::SolidColor);
        assert_eq!(face.current_color(), Color::new(0, 0, 255));
        assert_eq!(face.canvas().pixel(10, 20), Color::new(0, 0, 255));
        assert_eq!(face.canvas().pixel(11, 20), Color::new(0, 0, 255));
    }

    #[test]
    fn rainbow_ticks_increment_phase_exactly_once_each() {
        let mut face = fixture_face(&[(0, 0), (5, 9)]);
        face.set_mode(Mode::Rainbow);

        for _ in 0..5 {
            face.tick();
        }

        assert_eq!(face.phase(), 5);
        assert_eq!(
            face.canvas().pixel(0, 0),
            effects::rainbow(0, 0, 5, 32, effects::DEFAULT_STRIPE_WIDTH)
        );
        assert_eq!(
            face.canvas().pixel(5, 9),
            effects::rainbow(5, 9, 5, 32, effects::DEFAULT_STRIPE_WIDTH)
        );
    }

    #[test]
    fn fire_ticks_share_the_phase_counter() {
        let mut face = fixture_face(&[(3, 4)]);
        face.set_mode(Mode::Fire);

        face.tick();

        assert_eq!(face.phase(), 1);
        assert_eq!(face.canvas().pixel(3, 4), effects::fire(3, 4, 1));
    }

    #[test]
    fn stripe_width_feeds_the_rainbow_field() {
        let mut face = fixture_face(&[(4, 4)]);
        face.set_stripe_width(3.0);
        face.set_mode(Mode::Rainbow);

        face.tick();

        assert_eq!(face.canvas().pixel(4, 4), effects::rainbow(4, 4, 1, 32, 3.0));
    }

    #[test]
    fn phase_wraps_to_zero_above_the_bound() {
        let mut face = fixture_face_plain(&[(0, 0)]);
        face.set_mode(Mode::Fire);

        for _ in 0..10_001 {
            face.tick();
        }

        assert_eq!(face.phase(), 0);
    }

    #[test]
    fn solid_and_static_modes_do_no_per_tick_work() {
        let mut face = fixture_face(&[(0, 0)]);
        let presented = face.canvas().presents();

        face.tick();
        face.set_mode(Mode::Static);
        face.tick();

        assert_eq!(face.canvas().presents(), presented);
        assert_eq!(face.phase(), 0);
    }

    #[test]
    fn blinking_and_crazy_eyes_keep_independent_cursors() {
        let mut face = fixture_face(&[(0, 0)]);

        face.set_mode(Mode::EyesBlinking);
        face.tick();
        face.tick();
        face.set_mode(Mode::EyesCrazy);
        face.tick();

        assert_eq!(face.animations().eyes_blink.cursor(), 2);
        assert_eq!(face.animations().eyes_crazy.cursor(), 1);
        // The second blink frame and the first crazy frame are both on the
        // canvas; the crazy frame was drawn last.
        assert_eq!(face.canvas().pixel(12, 5), face.current_color());
    }

    #[tokio::test(start_paused = true)]
    async fn eyes_moving_burst_plays_two_cycles_then_goes_static() {
        let mut face = fixture_face(&[(0, 0)]);
        let presented = face.canvas().presents();

        face.run_eyes_moving().await;

        let cycle = face.animations().eyes_move.len();
        assert_eq!(face.canvas().presents() - presented, 2 * cycle);
        assert_eq!(face.animations().eyes_move.cursor(), 0);
        assert_eq!(face.mode(), Mode::Static);
    }

    #[tokio::test(start_paused = true)]
    async fn laugh_burst_runs_two_slow_cycles() {
        let mut face = fixture_face(&[(0, 0)]);
        let presented = face.canvas().presents();
        let start = tokio::time::Instant::now();

        face.run_laugh().await;

        let total = 2 * face.animations().laugh.len();
        assert_eq!(face.canvas().presents() - presented, total);
        assert_eq!(start.elapsed(), LAUGH_FRAME_DELAY * total as u32);
        assert_eq!(face.mode(), Mode::Static);
    }

    #[tokio::test(start_paused = true)]
    async fn limb_burst_blacks_out_the_arm_box_under_every_frame() {
        let mut face = fixture_face(&[(15, 15)]);
        let baseline = face.canvas().history().len();

        face.run_limb(Limb::LeftArmUp).await;

        assert_eq!(face.mode(), Mode::Static);
        let history = &face.canvas().history()[baseline..];
        assert_eq!(history.len(), 2);

        // Fixture frames: accent (1,1)/(3,3) with outline one cell right.
        let expectations = [((1, 1), (2, 1)), ((3, 3), (4, 3))];
        for (snapshot, &(accent, outline)) in history.iter().zip(&expectations) {
            for y in LEFT_ARM_BOX.y0..=LEFT_ARM_BOX.y1 {
                for x in LEFT_ARM_BOX.x0..=LEFT_ARM_BOX.x1 {
                    let expected = if (x, y) == accent {
                        face.current_color()
                    } else if (x, y) == outline {
                        Color::WHITE
                    } else {
                        Color::BLACK
                    };
                    let cell = snapshot[(y * 32 + x) as usize];
                    assert_eq!(cell, expected, "at ({x},{y})");
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dance_1_runs_three_passes_of_the_left_arm_length() {
        let mut face = fixture_face(&[(15, 15)]);
        let presented = face.canvas().presents();

        face.run_dance_1().await;

        let pass = face.animations().leftarm_up.len();
        assert_eq!(face.canvas().presents() - presented, 3 * pass);
        assert_eq!(face.mode(), Mode::Static);
    }

    #[tokio::test(start_paused = true)]
    async fn dance_2_clears_both_arm_boxes() {
        let mut face = fixture_face(&[(15, 15)]);
        let presented = face.canvas().presents();

        face.run_dance_2().await;

        assert_eq!(
            face.canvas().presents() - presented,
            face.animations().dance.len()
        );
        assert_eq!(face.mode(), Mode::Static);

        // Last dance frame painted accent (25,2); the rest of both boxes is
        // black except that frame's own pixels.
        let idx = |x: u32, y: u32| (y * 32 + x) as usize;
        let last = face.canvas().history().last().unwrap();
        assert_eq!(last[idx(25, 2)], face.current_color());
        assert_eq!(last[idx(26, 2)], Color::WHITE);
        assert_eq!(last[idx(1, 1)], Color::BLACK);
        assert_eq!(last[idx(24, 10)], Color::BLACK);
    }
}
