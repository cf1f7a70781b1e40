//! Per-tick output surface of the simulation core.
//!
//! The core never touches a GPU, a mixer, or a font rasterizer. Each tick it
//! appends to a [`FrameOutput`]: an ordered list of sprite blits (back to
//! front), a list of text requests, and the one-shot sounds triggered by this
//! tick's events. The host drains the output after the tick — quads and text
//! go to the renderer/HUD, sounds to whatever audio sink is wired up.

use crate::geom::Rect;
use glam::Vec2;

/// Which way the player sprite faces. Walk frames exist per facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

/// Stable handle for every image the game can request. The host owns the
/// mapping from handle to texture; the core only names what it wants drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Sky,
    Sun,
    Dirt,
    Grass,
    Blob,
    Platform,
    Lava,
    Coin,
    Exit,
    Ghost,
    /// One of the four walk-cycle frames for a facing direction.
    Walk { facing: Facing, frame: u8 },
    StartButton,
    RestartButton,
    ExitButton,
}

/// "Draw this sprite at this rect", in logical game pixels.
#[derive(Debug, Clone, Copy)]
pub struct Blit {
    pub sprite: SpriteId,
    pub dest: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// Big banner text ("GAME OVER!", "YOU WIN!").
    Title,
    /// Small HUD text (the score line).
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    White,
    Blue,
}

/// Text to draw at a top-left anchor in logical game pixels.
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub text: String,
    pub size: TextSize,
    pub color: TextColor,
    pub pos: Vec2,
}

/// One-shot audio triggers, fired at the moment of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Jump,
    CoinPickup,
    Hazard,
}

#[derive(Debug, Default)]
pub struct FrameOutput {
    pub blits: Vec<Blit>,
    pub texts: Vec<TextRequest>,
    pub sounds: Vec<Sound>,
}

impl FrameOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for the next tick without dropping the allocations.
    pub fn clear(&mut self) {
        self.blits.clear();
        self.texts.clear();
        self.sounds.clear();
    }

    pub fn blit(&mut self, sprite: SpriteId, dest: Rect) {
        self.blits.push(Blit { sprite, dest });
    }

    pub fn text(&mut self, text: impl Into<String>, size: TextSize, color: TextColor, pos: Vec2) {
        self.texts.push(TextRequest {
            text: text.into(),
            size,
            color,
            pos,
        });
    }

    pub fn sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blits_keep_submission_order() {
        let mut out = FrameOutput::new();
        out.blit(SpriteId::Sky, Rect::new(0, 0, 1000, 1000));
        out.blit(SpriteId::Dirt, Rect::new(0, 950, 50, 50));
        out.blit(SpriteId::Coin, Rect::new(25, 25, 25, 25));
        let order: Vec<SpriteId> = out.blits.iter().map(|b| b.sprite).collect();
        assert_eq!(order, vec![SpriteId::Sky, SpriteId::Dirt, SpriteId::Coin]);
    }

    #[test]
    fn clear_empties_all_channels() {
        let mut out = FrameOutput::new();
        out.blit(SpriteId::Sun, Rect::new(290, 150, 100, 100));
        out.text("X 3", TextSize::Score, TextColor::White, Vec2::new(40.0, 10.0));
        out.sound(Sound::CoinPickup);
        out.clear();
        assert!(out.blits.is_empty());
        assert!(out.texts.is_empty());
        assert!(out.sounds.is_empty());
    }
}
