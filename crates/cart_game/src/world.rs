//! World construction from a level grid.
//!
//! Tile codes:
//!   0 empty, 1 dirt, 2 grass, 3 enemy, 4 horizontal platform,
//!   5 vertical platform, 6 lava, 7 coin, 8 exit.
//!
//! Codes 1-2 become static collidable tiles at `(col, row) * TILE_SIZE`;
//! codes 3-8 spawn dynamic entities at code-specific offsets and are not
//! retained as grid state. Anything else (including 0) is skipped without
//! complaint — collision math and spawning are total over whatever grid the
//! loader hands over.

use cart_core::frame::{FrameOutput, SpriteId};
use cart_core::geom::Rect;

use crate::entity::{Enemy, MovingPlatform};
use crate::level::{LevelGrid, TILE_SIZE};

pub const LAVA_H: i32 = TILE_SIZE / 2;
pub const COIN_SIZE: i32 = TILE_SIZE / 2;
pub const EXIT_H: i32 = TILE_SIZE + TILE_SIZE / 2;

/// One static terrain tile: which image, and where.
#[derive(Debug, Clone, Copy)]
pub struct StaticTile {
    pub sprite: SpriteId,
    pub rect: Rect,
}

#[derive(Debug, Default)]
pub struct World {
    pub tiles: Vec<StaticTile>,
    pub enemies: Vec<Enemy>,
    pub platforms: Vec<MovingPlatform>,
    pub lavas: Vec<Rect>,
    pub coins: Vec<Rect>,
    pub exits: Vec<Rect>,
}

impl World {
    pub fn new(grid: &LevelGrid) -> Self {
        let mut world = World::default();
        for (row, codes) in grid.iter().enumerate() {
            for (col, &code) in codes.iter().enumerate() {
                let x = col as i32 * TILE_SIZE;
                let y = row as i32 * TILE_SIZE;
                match code {
                    1 => world.tiles.push(StaticTile {
                        sprite: SpriteId::Dirt,
                        rect: Rect::new(x, y, TILE_SIZE, TILE_SIZE),
                    }),
                    2 => world.tiles.push(StaticTile {
                        sprite: SpriteId::Grass,
                        rect: Rect::new(x, y, TILE_SIZE, TILE_SIZE),
                    }),
                    3 => world.enemies.push(Enemy::new(x, y + 15)),
                    4 => world.platforms.push(MovingPlatform::horizontal(x, y)),
                    5 => world.platforms.push(MovingPlatform::vertical(x, y)),
                    6 => world
                        .lavas
                        .push(Rect::new(x, y + TILE_SIZE / 2, TILE_SIZE, LAVA_H)),
                    7 => world.coins.push(Rect::from_center(
                        x + TILE_SIZE / 2,
                        y + TILE_SIZE / 2,
                        COIN_SIZE,
                        COIN_SIZE,
                    )),
                    8 => world
                        .exits
                        .push(Rect::new(x, y - TILE_SIZE / 2, TILE_SIZE, EXIT_H)),
                    _ => {}
                }
            }
        }
        world
    }

    /// Advance every patrolling entity by one tick.
    pub fn update_entities(&mut self) {
        for enemy in &mut self.enemies {
            enemy.update();
        }
        for platform in &mut self.platforms {
            platform.update();
        }
    }

    /// Emit draw calls for terrain and entities, back to front: tiles in
    /// construction order, then each entity collection.
    pub fn draw(&self, out: &mut FrameOutput) {
        for tile in &self.tiles {
            out.blit(tile.sprite, tile.rect);
        }
        for enemy in &self.enemies {
            out.blit(SpriteId::Blob, enemy.rect);
        }
        for platform in &self.platforms {
            out.blit(SpriteId::Platform, platform.rect);
        }
        for lava in &self.lavas {
            out.blit(SpriteId::Lava, *lava);
        }
        for coin in &self.coins {
            out.blit(SpriteId::Coin, *coin);
        }
        for exit in &self.exits {
            out.blit(SpriteId::Exit, *exit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_places_one_tile_per_terrain_code() {
        let grid = vec![vec![1, 2, 0], vec![0, 1, 2]];
        let world = World::new(&grid);
        assert_eq!(world.tiles.len(), 4);
        assert!(world.enemies.is_empty());
        // Row-major construction order.
        assert_eq!(world.tiles[0].rect, Rect::new(0, 0, 50, 50));
        assert_eq!(world.tiles[1].rect, Rect::new(50, 0, 50, 50));
        assert_eq!(world.tiles[2].rect, Rect::new(50, 50, 50, 50));
        assert_eq!(world.tiles[3].rect, Rect::new(100, 50, 50, 50));
    }

    #[test]
    fn build_spawns_one_entity_per_spawn_code() {
        let grid = vec![vec![3, 4, 5, 6, 7, 8]];
        let world = World::new(&grid);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.platforms.len(), 2);
        assert_eq!(world.lavas.len(), 1);
        assert_eq!(world.coins.len(), 1);
        assert_eq!(world.exits.len(), 1);
        assert!(world.tiles.is_empty());
    }

    #[test]
    fn spawn_offsets_match_tile_codes() {
        let grid = vec![vec![0], vec![0, 3, 6, 7, 8]];
        let world = World::new(&grid);
        // Enemy at column 1, row 1: cell origin (50, 50), +15 vertical.
        assert_eq!(world.enemies[0].rect.x, 50);
        assert_eq!(world.enemies[0].rect.y, 65);
        // Lava half a tile down.
        assert_eq!(world.lavas[0], Rect::new(100, 75, 50, 25));
        // Coin centered in its cell.
        assert_eq!(world.coins[0], Rect::from_center(175, 75, 25, 25));
        // Exit raised half a tile, one and a half tiles tall.
        assert_eq!(world.exits[0], Rect::new(200, 25, 50, 75));
    }

    #[test]
    fn platform_axis_follows_code() {
        let grid = vec![vec![4, 5]];
        let world = World::new(&grid);
        assert_eq!(world.platforms[0].move_x, 1);
        assert_eq!(world.platforms[0].move_y, 0);
        assert_eq!(world.platforms[1].move_x, 0);
        assert_eq!(world.platforms[1].move_y, 1);
    }

    #[test]
    fn unrecognized_codes_spawn_nothing() {
        let grid = vec![vec![0, 9, 200, 0]];
        let world = World::new(&grid);
        assert!(world.tiles.is_empty());
        assert!(world.enemies.is_empty());
        assert!(world.platforms.is_empty());
        assert!(world.lavas.is_empty());
        assert!(world.coins.is_empty());
        assert!(world.exits.is_empty());
    }

    #[test]
    fn draw_emits_tiles_before_entities() {
        let grid = vec![vec![2, 7]];
        let world = World::new(&grid);
        let mut out = FrameOutput::new();
        world.draw(&mut out);
        assert_eq!(out.blits.len(), 2);
        assert_eq!(out.blits[0].sprite, SpriteId::Grass);
        assert_eq!(out.blits[1].sprite, SpriteId::Coin);
    }
}
