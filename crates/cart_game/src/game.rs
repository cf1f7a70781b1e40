//! Game state machine: menu, playing, dead, and the terminal win state.
//!
//! All mutable game state lives in [`Game`]; the host calls `tick` once per
//! fixed step with that tick's input snapshot and a frame output to fill.
//! Exactly one [`World`] and one [`Player`] are live at a time — level
//! transitions rebuild the world from the level store and reset the player
//! to the spawn point.

use cart_core::frame::{FrameOutput, Sound, SpriteId, TextColor, TextSize};
use cart_core::geom::Rect;
use cart_core::input::TickInput;
use glam::Vec2;

use crate::level::{LevelStore, TILE_SIZE};
use crate::player::{Player, TickOutcome};
use crate::ui::Button;
use crate::world::{World, COIN_SIZE};

pub const GAME_W: i32 = 1000;
pub const GAME_H: i32 = 1000;
pub const MAX_LEVELS: u32 = 11;

const PLAYER_SPAWN_X: i32 = 100;
const PLAYER_SPAWN_Y: i32 = GAME_H - 130;

const START_BUTTON: Rect = Rect::new(GAME_W / 2 - 350, GAME_H / 2, 200, 70);
const EXIT_BUTTON: Rect = Rect::new(GAME_W / 2 + 150, GAME_H / 2, 200, 70);
const RESTART_BUTTON: Rect = Rect::new(GAME_W / 2 - 50, GAME_H / 2 + 100, 120, 40);
const SUN_RECT: Rect = Rect::new(290, 150, 100, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Playing,
    Dead,
    /// Terminal: every level cleared. Restart returns to level 1.
    Won,
}

pub struct Game {
    levels: LevelStore,
    pub mode: Mode,
    pub level: u32,
    pub max_levels: u32,
    pub score: u32,
    pub world: World,
    pub player: Player,
    start_button: Button,
    restart_button: Button,
    exit_button: Button,
    /// Set by the exit button; the host quits after the current frame.
    pub quit: bool,
}

impl Game {
    pub fn new(levels: LevelStore) -> Self {
        let world = World::new(&levels.load(1));
        Self {
            levels,
            mode: Mode::Menu,
            level: 1,
            max_levels: MAX_LEVELS,
            score: 0,
            world,
            player: Player::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            start_button: Button::new(START_BUTTON, SpriteId::StartButton),
            restart_button: Button::new(RESTART_BUTTON, SpriteId::RestartButton),
            exit_button: Button::new(EXIT_BUTTON, SpriteId::ExitButton),
            quit: false,
        }
    }

    /// Run one fixed simulation step and fill `out` with this tick's draws,
    /// text, and sounds.
    pub fn tick(&mut self, input: &TickInput, out: &mut FrameOutput) {
        out.blit(SpriteId::Sky, Rect::new(0, 0, GAME_W, GAME_H));
        out.blit(SpriteId::Sun, SUN_RECT);

        if self.mode == Mode::Menu {
            if self.exit_button.update(input, out) {
                self.quit = true;
            }
            if self.start_button.update(input, out) {
                log::info!("Starting level {}", self.level);
                self.mode = Mode::Playing;
            }
            return;
        }

        if self.mode == Mode::Playing {
            self.world.update_entities();

            // Coin pickup: collection membership is the only pickup state, so
            // removal here makes a second overlap check impossible.
            let player_rect = self.player.rect;
            let before = self.world.coins.len();
            self.world.coins.retain(|coin| !coin.overlaps(&player_rect));
            let picked = before - self.world.coins.len();
            if picked > 0 {
                self.score += picked as u32;
                out.sound(Sound::CoinPickup);
            }

            match self.player.update_alive(input, &self.world, out) {
                TickOutcome::Alive => {}
                TickOutcome::Dead => self.mode = Mode::Dead,
                TickOutcome::ReachedExit => self.advance_level(),
            }
        } else if self.mode == Mode::Dead {
            self.player.update_dead();
        }

        self.world.draw(out);
        self.player.draw(self.mode == Mode::Dead, out);

        match self.mode {
            Mode::Playing => {
                // HUD score icon; deliberately not a member of the gameplay
                // coin collection, so it can never be collected.
                out.blit(
                    SpriteId::Coin,
                    Rect::from_center(TILE_SIZE / 2, TILE_SIZE / 2, COIN_SIZE, COIN_SIZE),
                );
                out.text(
                    format!("X {}", self.score),
                    TextSize::Score,
                    TextColor::White,
                    Vec2::new((TILE_SIZE - 10) as f32, 10.0),
                );
            }
            Mode::Dead => {
                out.text(
                    "GAME OVER!",
                    TextSize::Title,
                    TextColor::Blue,
                    Vec2::new((GAME_W / 2 - 200) as f32, (GAME_H / 2) as f32),
                );
                if self.restart_button.update(input, out) {
                    log::info!("Restarting level {}", self.level);
                    self.score = 0;
                    self.rebuild_level();
                    self.mode = Mode::Playing;
                }
            }
            Mode::Won => {
                out.text(
                    "YOU WIN!",
                    TextSize::Title,
                    TextColor::Blue,
                    Vec2::new((GAME_W / 2 - 140) as f32, (GAME_H / 2) as f32),
                );
                if self.restart_button.update(input, out) {
                    log::info!("Restarting from level 1");
                    self.level = 1;
                    self.score = 0;
                    self.rebuild_level();
                    self.mode = Mode::Playing;
                }
            }
            Mode::Menu => {}
        }
    }

    /// Edge-triggered on reaching the exit: move to the next level, or to the
    /// terminal win state after the last one. Score carries across levels.
    fn advance_level(&mut self) {
        if self.level < self.max_levels {
            self.level += 1;
            log::info!("Level {} start", self.level);
            self.rebuild_level();
        } else {
            log::info!("All {} levels cleared", self.max_levels);
            self.mode = Mode::Won;
        }
    }

    fn rebuild_level(&mut self) {
        self.world = World::new(&self.levels.load(self.level));
        self.player.reset(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    }
}
