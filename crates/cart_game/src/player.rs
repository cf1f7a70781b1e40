//! Player kinematics and collision resolution.
//!
//! Movement is resolved per axis against swept boxes: the proposed `dx` is
//! tested with a horizontally displaced copy of the player's rect, the
//! proposed `dy` with a vertically displaced copy, and each contact either
//! zeroes the displacement (walls) or snaps it so the touching edges align
//! exactly (floors and ceilings). Static tiles snap to the pixel; moving
//! platforms use a 20 px proximity threshold instead, because a platform can
//! move into the player between ticks and an exact sweep would miss it.
//!
//! All quantities are integers; a tick is a total function of (input, world).

use cart_core::frame::{Facing, FrameOutput, Sound, SpriteId};
use cart_core::geom::Rect;
use cart_core::input::TickInput;

use crate::world::World;

pub const PLAYER_W: i32 = 40;
pub const PLAYER_H: i32 = 80;

const RUN_SPEED: i32 = 5;
const JUMP_VELOCITY: i32 = -15;
const GRAVITY: i32 = 1;
const MAX_FALL_SPEED: i32 = 10;
/// Ticks of continuous movement between walk-cycle frames.
const WALK_COOLDOWN: i32 = 5;
const WALK_FRAMES: u8 = 4;
/// Vertical proximity window for platform contact, in pixels.
const PLATFORM_THRESHOLD: i32 = 20;
/// The ghost drifts up 5 px per tick until this altitude, then holds.
const GHOST_REST_Y: i32 = 200;
const GHOST_RISE: i32 = 5;

/// What a tick of the live player resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Alive,
    /// Touched an enemy or lava.
    Dead,
    /// Touched the level exit.
    ReachedExit,
}

#[derive(Debug)]
pub struct Player {
    pub rect: Rect,
    pub vel_y: i32,
    /// Jump latch: set while the jump key is held so holding space does not
    /// re-jump on landing.
    jumped: bool,
    in_air: bool,
    pub facing: Facing,
    walk_frame: u8,
    walk_counter: i32,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        let mut player = Self {
            rect: Rect::new(0, 0, PLAYER_W, PLAYER_H),
            vel_y: 0,
            jumped: false,
            in_air: true,
            facing: Facing::Right,
            walk_frame: 0,
            walk_counter: 0,
        };
        player.reset(x, y);
        player
    }

    /// Reinitialize every field to spawn values. Used for new levels and for
    /// restart-after-death alike.
    pub fn reset(&mut self, x: i32, y: i32) {
        self.rect = Rect::new(x, y, PLAYER_W, PLAYER_H);
        self.vel_y = 0;
        self.jumped = false;
        self.in_air = true;
        self.facing = Facing::Right;
        self.walk_frame = 0;
        self.walk_counter = 0;
    }

    /// One tick of the live player. Mutates position/velocity, emits one-shot
    /// sounds, and reports whether a hazard or the exit was touched.
    pub fn update_alive(
        &mut self,
        input: &TickInput,
        world: &World,
        out: &mut FrameOutput,
    ) -> TickOutcome {
        let mut dx = 0;
        let mut dy = 0;

        // Jump is edge-triggered via the latch and only legal from the ground.
        if input.jump && !self.jumped && !self.in_air {
            out.sound(Sound::Jump);
            self.vel_y = JUMP_VELOCITY;
            self.jumped = true;
        }
        if !input.jump {
            self.jumped = false;
        }

        // Opposed directions cancel to the idle branch.
        let left = input.left && !input.right;
        let right = input.right && !input.left;
        if left {
            dx -= RUN_SPEED;
            self.walk_counter += 1;
            self.facing = Facing::Left;
        }
        if right {
            dx += RUN_SPEED;
            self.walk_counter += 1;
            self.facing = Facing::Right;
        }
        if !left && !right {
            self.walk_counter = 0;
            self.walk_frame = 0;
        }
        if self.walk_counter > WALK_COOLDOWN {
            self.walk_counter = 0;
            self.walk_frame = (self.walk_frame + 1) % WALK_FRAMES;
        }

        self.vel_y = (self.vel_y + GRAVITY).min(MAX_FALL_SPEED);
        dy += self.vel_y;

        // Airborne unless a landing contact below says otherwise.
        self.in_air = true;
        for tile in &world.tiles {
            if tile.rect.overlaps(&self.rect.translated(dx, 0)) {
                dx = 0;
            }
            if tile.rect.overlaps(&self.rect.translated(0, dy)) {
                if self.vel_y < 0 {
                    // Head bump: top edge lands on the tile's underside.
                    dy = tile.rect.bottom() - self.rect.y;
                    self.vel_y = 0;
                } else {
                    // Landing: bottom edge lands on the tile's top.
                    dy = tile.rect.y - self.rect.bottom();
                    self.vel_y = 0;
                    self.in_air = false;
                }
            }
        }

        // Hazard and exit contact test the pre-move rect, but the tick's
        // movement still commits below; the ghost drifts up from where the
        // player actually ended this tick.
        let mut outcome = TickOutcome::Alive;
        if world.enemies.iter().any(|e| e.rect.overlaps(&self.rect))
            || world.lavas.iter().any(|l| l.overlaps(&self.rect))
        {
            out.sound(Sound::Hazard);
            outcome = TickOutcome::Dead;
        } else if world.exits.iter().any(|e| e.overlaps(&self.rect)) {
            outcome = TickOutcome::ReachedExit;
        }

        for platform in &world.platforms {
            if platform.rect.overlaps(&self.rect.translated(dx, 0)) {
                dx = 0;
            }
            if platform.rect.overlaps(&self.rect.translated(0, dy)) {
                if (self.rect.y + dy - platform.rect.bottom()).abs() < PLATFORM_THRESHOLD {
                    // Rising into the platform's underside.
                    self.vel_y = 0;
                    dy = platform.rect.bottom() - self.rect.y;
                } else if (self.rect.bottom() + dy - platform.rect.y).abs() < PLATFORM_THRESHOLD {
                    // Landing on top: pin one pixel above so the platform can
                    // move without immediately re-penetrating.
                    self.rect.y = platform.rect.y - 1 - self.rect.h;
                    self.in_air = false;
                    dy = 0;
                }
                // A horizontal platform carries whoever stands on it.
                if platform.move_x != 0 {
                    self.rect.x += platform.move_direction;
                }
            }
        }

        self.rect.x += dx;
        self.rect.y += dy;
        outcome
    }

    /// One tick of the dead player: the ghost drifts upward to its resting
    /// altitude and holds there.
    pub fn update_dead(&mut self) {
        if self.rect.y > GHOST_REST_Y {
            self.rect.y -= GHOST_RISE;
        }
    }

    pub fn draw(&self, dead: bool, out: &mut FrameOutput) {
        let sprite = if dead {
            SpriteId::Ghost
        } else {
            SpriteId::Walk {
                facing: self.facing,
                frame: self.walk_frame,
            }
        };
        out.blit(sprite, self.rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Enemy, MovingPlatform};
    use crate::world::StaticTile;
    use cart_core::frame::SpriteId;

    fn world_with_tiles(rects: &[Rect]) -> World {
        World {
            tiles: rects
                .iter()
                .map(|&rect| StaticTile {
                    sprite: SpriteId::Dirt,
                    rect,
                })
                .collect(),
            ..World::default()
        }
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn falling_player_lands_flush_on_tile_top() {
        let floor = Rect::new(0, 500, 200, 50);
        let world = world_with_tiles(&[floor]);
        let mut player = Player::new(50, 415);
        player.vel_y = 9;

        let mut out = FrameOutput::new();
        let outcome = player.update_alive(&idle(), &world, &mut out);
        assert_eq!(outcome, TickOutcome::Alive);
        assert_eq!(player.vel_y, 0);
        assert_eq!(player.rect.bottom(), floor.y);
    }

    #[test]
    fn rising_player_bumps_head_flush_on_tile_bottom() {
        let ceiling = Rect::new(0, 100, 200, 50);
        let world = world_with_tiles(&[ceiling]);
        let mut player = Player::new(50, 155);
        player.vel_y = -8;

        let mut out = FrameOutput::new();
        player.update_alive(&idle(), &world, &mut out);
        assert_eq!(player.vel_y, 0);
        assert_eq!(player.rect.y, ceiling.bottom());
    }

    #[test]
    fn horizontal_contact_stops_without_sliding() {
        let wall = Rect::new(100, 0, 50, 600);
        let floor = Rect::new(0, 500, 100, 50);
        let world = world_with_tiles(&[wall, floor]);
        let mut player = Player::new(58, 420);

        let mut out = FrameOutput::new();
        let input = TickInput {
            right: true,
            ..TickInput::default()
        };
        player.update_alive(&input, &world, &mut out);
        // dx would penetrate the wall, so it is dropped entirely.
        assert_eq!(player.rect.x, 58);
    }

    #[test]
    fn jump_requires_ground_and_releases_latch() {
        let floor = Rect::new(0, 500, 200, 50);
        let world = world_with_tiles(&[floor]);
        let mut player = Player::new(50, 420);
        let mut out = FrameOutput::new();

        // Settle onto the floor first.
        player.update_alive(&idle(), &world, &mut out);
        assert_eq!(player.rect.bottom(), floor.y);

        let jump_held = TickInput {
            jump: true,
            ..TickInput::default()
        };
        out.clear();
        player.update_alive(&jump_held, &world, &mut out);
        assert_eq!(player.vel_y, JUMP_VELOCITY + GRAVITY);
        assert!(out.sounds.contains(&Sound::Jump));

        // Still holding jump at the apex: the latch must block a re-jump even
        // if a landing happens while held.
        for _ in 0..40 {
            out.clear();
            player.update_alive(&jump_held, &world, &mut out);
            assert!(!out.sounds.contains(&Sound::Jump));
        }
        assert_eq!(player.rect.bottom(), floor.y);
    }

    #[test]
    fn gravity_clamps_at_terminal_fall_speed() {
        let world = World::default();
        let mut player = Player::new(0, 0);
        let mut out = FrameOutput::new();
        for _ in 0..30 {
            player.update_alive(&idle(), &world, &mut out);
        }
        assert_eq!(player.vel_y, MAX_FALL_SPEED);
    }

    #[test]
    fn opposed_direction_keys_cancel_to_idle() {
        let floor = Rect::new(0, 500, 400, 50);
        let world = world_with_tiles(&[floor]);
        let mut player = Player::new(100, 420);
        let mut out = FrameOutput::new();
        let both = TickInput {
            left: true,
            right: true,
            ..TickInput::default()
        };
        for _ in 0..10 {
            player.update_alive(&both, &world, &mut out);
        }
        assert_eq!(player.rect.x, 100);
        assert_eq!(player.walk_frame, 0);
    }

    #[test]
    fn walk_animation_advances_every_six_ticks_of_movement() {
        let floor = Rect::new(0, 500, 4000, 50);
        let world = world_with_tiles(&[floor]);
        let mut player = Player::new(100, 420);
        let mut out = FrameOutput::new();
        let run = TickInput {
            right: true,
            ..TickInput::default()
        };
        // Counter must exceed the cooldown of 5 before the frame advances.
        for _ in 0..6 {
            player.update_alive(&run, &world, &mut out);
        }
        assert_eq!(player.walk_frame, 1);
        // Releasing both keys snaps back to the idle frame.
        player.update_alive(&idle(), &world, &mut out);
        assert_eq!(player.walk_frame, 0);
    }

    #[test]
    fn enemy_contact_kills_and_plays_hazard() {
        let mut world = World::default();
        world.enemies.push(Enemy::new(100, 420));
        let mut player = Player::new(100, 400);
        let mut out = FrameOutput::new();
        let outcome = player.update_alive(&idle(), &world, &mut out);
        assert_eq!(outcome, TickOutcome::Dead);
        assert!(out.sounds.contains(&Sound::Hazard));
    }

    #[test]
    fn lava_contact_kills() {
        let mut world = World::default();
        world.lavas.push(Rect::new(80, 450, 50, 25));
        let mut player = Player::new(100, 400);
        let mut out = FrameOutput::new();
        assert_eq!(
            player.update_alive(&idle(), &world, &mut out),
            TickOutcome::Dead
        );
    }

    #[test]
    fn exit_contact_reports_reached_exit() {
        let mut world = World::default();
        world.exits.push(Rect::new(90, 400, 50, 75));
        let mut player = Player::new(100, 380);
        let mut out = FrameOutput::new();
        assert_eq!(
            player.update_alive(&idle(), &world, &mut out),
            TickOutcome::ReachedExit
        );
    }

    #[test]
    fn fatal_tick_still_commits_movement() {
        let mut world = World::default();
        world.lavas.push(Rect::new(80, 450, 50, 25));
        let mut player = Player::new(100, 400);
        player.vel_y = 5;
        let mut out = FrameOutput::new();
        assert_eq!(
            player.update_alive(&idle(), &world, &mut out),
            TickOutcome::Dead
        );
        // Gravity ran (5 -> 6) and the fall was applied before the outcome
        // was reported, so the ghost starts from the post-move position.
        assert_eq!(player.rect.y, 406);
    }

    #[test]
    fn exit_tick_still_commits_movement() {
        let mut world = World::default();
        world.exits.push(Rect::new(90, 400, 50, 75));
        let mut player = Player::new(100, 380);
        let run = TickInput {
            right: true,
            ..TickInput::default()
        };
        let mut out = FrameOutput::new();
        assert_eq!(
            player.update_alive(&run, &world, &mut out),
            TickOutcome::ReachedExit
        );
        assert_eq!(player.rect.x, 105);
    }

    #[test]
    fn platform_top_contact_pins_player_above() {
        let mut world = World::default();
        world.platforms.push(MovingPlatform::vertical(100, 500));
        let mut player = Player::new(105, 415);
        player.vel_y = 9;
        let mut out = FrameOutput::new();
        player.update_alive(&idle(), &world, &mut out);
        assert_eq!(player.rect.bottom(), 499);
        // Standing on a platform pins position but does not zero vel_y; the
        // next tick's swept box re-establishes contact through it.
        assert_eq!(player.vel_y, MAX_FALL_SPEED);
    }

    #[test]
    fn horizontal_platform_carries_standing_player() {
        let mut world = World::default();
        world.platforms.push(MovingPlatform::horizontal(100, 500));
        let mut player = Player::new(105, 419);
        player.vel_y = 5;
        let mut out = FrameOutput::new();
        // Standing contact renews every tick; the platform's direction is
        // added to the player's x each time.
        player.update_alive(&idle(), &world, &mut out);
        let first_x = player.rect.x;
        assert_eq!(first_x, 106);
        player.update_alive(&idle(), &world, &mut out);
        assert_eq!(player.rect.x, first_x + 1);
    }

    #[test]
    fn platform_underside_contact_zeroes_upward_velocity() {
        let mut world = World::default();
        world.platforms.push(MovingPlatform::horizontal(100, 300));
        let mut player = Player::new(105, 330);
        player.vel_y = -10;
        let mut out = FrameOutput::new();
        player.update_alive(&idle(), &world, &mut out);
        assert_eq!(player.vel_y, 0);
        assert_eq!(player.rect.y, 325);
    }

    #[test]
    fn ghost_drifts_up_then_holds() {
        let mut player = Player::new(100, 212);
        player.update_dead();
        assert_eq!(player.rect.y, 207);
        player.update_dead();
        assert_eq!(player.rect.y, 202);
        player.update_dead();
        assert_eq!(player.rect.y, 197);
        // Below the rest altitude: holds.
        player.update_dead();
        assert_eq!(player.rect.y, 197);
    }

    #[test]
    fn draw_selects_walk_frame_or_ghost() {
        let player = Player::new(10, 10);
        let mut out = FrameOutput::new();
        player.draw(false, &mut out);
        player.draw(true, &mut out);
        assert_eq!(
            out.blits[0].sprite,
            SpriteId::Walk {
                facing: Facing::Right,
                frame: 0
            }
        );
        assert_eq!(out.blits[1].sprite, SpriteId::Ghost);
    }
}
