//! Dynamic level entities: patrolling enemies and moving platforms.
//!
//! Both share the same oscillation rule: advance one step along the move
//! axis, count the step, and after the counter's magnitude exceeds 50 flip
//! the direction and negate the counter. All values are integers, so the
//! back-and-forth is exactly symmetric — an entity returns to its spawn
//! position every 102 ticks with no drift.

use cart_core::geom::Rect;
use crate::level::TILE_SIZE;

/// Half-period of the patrol oscillation, in ticks.
const BOUNCE_SPAN: i32 = 50;

pub const ENEMY_W: i32 = TILE_SIZE;
pub const ENEMY_H: i32 = 35;
pub const PLATFORM_W: i32 = TILE_SIZE;
pub const PLATFORM_H: i32 = TILE_SIZE / 2;

/// Flip direction once the counter has run a full half-period.
fn bounce(counter: &mut i32, direction: &mut i32) {
    *counter += 1;
    if counter.abs() > BOUNCE_SPAN {
        *direction = -*direction;
        *counter = -*counter;
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub rect: Rect,
    pub move_direction: i32,
    move_counter: i32,
}

impl Enemy {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, ENEMY_W, ENEMY_H),
            move_direction: 1,
            move_counter: 0,
        }
    }

    pub fn update(&mut self) {
        self.rect.x += self.move_direction;
        bounce(&mut self.move_counter, &mut self.move_direction);
    }
}

/// A platform that oscillates along exactly one axis, selected at spawn time
/// by the tile code (4 = horizontal, 5 = vertical).
#[derive(Debug, Clone)]
pub struct MovingPlatform {
    pub rect: Rect,
    pub move_x: i32,
    pub move_y: i32,
    pub move_direction: i32,
    move_counter: i32,
}

impl MovingPlatform {
    pub fn horizontal(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 0)
    }

    pub fn vertical(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 1)
    }

    fn new(x: i32, y: i32, move_x: i32, move_y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, PLATFORM_W, PLATFORM_H),
            move_x,
            move_y,
            move_direction: 1,
            move_counter: 0,
        }
    }

    pub fn update(&mut self) {
        self.rect.x += self.move_direction * self.move_x;
        self.rect.y += self.move_direction * self.move_y;
        bounce(&mut self.move_counter, &mut self.move_direction);
    }
}
