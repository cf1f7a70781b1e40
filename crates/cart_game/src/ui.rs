//! Menu buttons: a rect, an image, and a single-fire click latch.

use cart_core::frame::{FrameOutput, SpriteId};
use cart_core::geom::Rect;
use cart_core::input::TickInput;

#[derive(Debug)]
pub struct Button {
    pub rect: Rect,
    sprite: SpriteId,
    clicked: bool,
}

impl Button {
    pub fn new(rect: Rect, sprite: SpriteId) -> Self {
        Self {
            rect,
            sprite,
            clicked: false,
        }
    }

    /// Draw the button and report whether it fired this tick. Fires once per
    /// press: the latch sets on the firing tick and only clears when the
    /// primary button is released, so holding the mouse down cannot
    /// re-trigger.
    pub fn update(&mut self, input: &TickInput, out: &mut FrameOutput) -> bool {
        let mut fired = false;
        let (px, py) = input.pointer;
        if self.rect.contains_point(px as i32, py as i32) && input.primary_down && !self.clicked {
            fired = true;
            self.clicked = true;
        }
        if !input.primary_down {
            self.clicked = false;
        }

        out.blit(self.sprite, self.rect);
        fired
    }
}
