//! The seam between the frame driver and an individual game.

use rand::rngs::StdRng;

use crate::canvas::Canvas;
use crate::flow::Phase;
use crate::input::{Bindings, FrameInput};

/// Upper bound on a frame's elapsed time, so a long stall (a suspended
/// terminal, a slow resize) cannot produce one giant simulation step.
pub const MAX_DT: f32 = 0.033;

pub fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(0.0, MAX_DT)
}

pub trait Game {
    fn name(&self) -> &'static str;

    /// Size of the canvas `render` draws into.
    fn logical_size(&self) -> (usize, usize);

    fn bindings(&self) -> Bindings;

    fn phase(&self) -> Phase;

    /// True while the game is collecting typed text, so the driver must not
    /// treat letters as quit keys.
    fn captures_text(&self) -> bool {
        false
    }

    /// Applies this frame's input and, when playing, advances the simulation
    /// by `dt` seconds (already clamped by the driver).
    fn frame(&mut self, input: &FrameInput, dt: f32, rng: &mut StdRng);

    fn render(&self, canvas: &mut Canvas);

    /// Picks up asynchronously loaded assets.
    fn poll_assets(&mut self) {}
}
