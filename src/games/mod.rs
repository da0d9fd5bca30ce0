//! Per-game rules.
//!
//! A session drives every game through the same seven phases in the same
//! order; a [`Game`] only fills in what each phase means for it.

pub mod helicopter;
pub mod shooter;
pub mod snake;

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::entities::{Entity, EntityId, EntityKind};
use crate::input::InputLatch;
use crate::store::EntityStore;

pub use helicopter::Helicopter;
pub use shooter::Shooter;
pub use snake::Snake;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Helicopter,
    Snake,
    Shooter,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Helicopter, GameKind::Snake, GameKind::Shooter];

    pub fn name(self) -> &'static str {
        match self {
            GameKind::Helicopter => "helicopter",
            GameKind::Snake => "snake",
            GameKind::Shooter => "shooter",
        }
    }

    pub fn rules(self) -> Box<dyn Game> {
        match self {
            GameKind::Helicopter => Box::new(Helicopter::new()),
            GameKind::Snake => Box::new(Snake::new()),
            GameKind::Shooter => Box::new(Shooter::new()),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown game '{s}' (expected helicopter, snake or shooter)"))
    }
}

// ── Phase results ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Helicopter touched an obstacle.
    Obstacle,
    /// Helicopter left the screen vertically.
    OutOfBounds,
    /// Snake head left the grid.
    Wall,
    /// Snake head landed on its own body.
    SelfCollision,
    /// An enemy reached the ship.
    Enemy,
}

/// Something the detect phase found.  Detection never mutates the store;
/// consequences are applied in the resolve phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Fatal(DeathCause),
    Pickup { food: EntityId },
    Hit { bullet: EntityId, enemy: EntityId },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub scored: u32,
    pub death: Option<DeathCause>,
}

// ── The phases ────────────────────────────────────────────────────────────────

pub trait Game {
    /// Put the player back at its starting position and velocity.  The store
    /// has already been cleared.
    fn reset(&mut self, store: &mut EntityStore, config: &GameConfig);

    /// 1. Apply input flags to the player's velocity / heading.
    fn apply_input(&mut self, store: &mut EntityStore, input: &mut InputLatch, config: &GameConfig);

    /// 2. Move the player.
    fn integrate_player(&mut self, store: &mut EntityStore, config: &GameConfig, scale: f32);

    /// 3. Probabilistic spawning.
    fn spawn(&mut self, store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore);

    /// 4. Move everything that is not the player.
    fn advance(&mut self, store: &mut EntityStore, scale: f32) {
        advance_movers(store, scale);
    }

    /// 5. Drop entities that left the screen.  Returns points earned by it.
    fn prune(&mut self, store: &mut EntityStore, config: &GameConfig) -> u32 {
        prune_offscreen(store, config);
        0
    }

    /// 6. Collision checks.
    fn detect(&self, store: &EntityStore, config: &GameConfig) -> Vec<Contact>;

    /// 7. Death / pickup consequences.
    fn resolve(
        &mut self,
        contacts: &[Contact],
        store: &mut EntityStore,
        config: &GameConfig,
        rng: &mut dyn RngCore,
    ) -> Outcome;
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Integrate every live non-player entity by its per-tick velocity.
pub fn advance_movers(store: &mut EntityStore, scale: f32) {
    for entity in store.iter_mut() {
        if entity.kind != EntityKind::Player {
            entity.position += entity.velocity * scale;
        }
    }
}

/// Whether `entity` has completely left the screen in the direction it is
/// travelling.  Stationary entities are never off-screen.
pub fn is_offscreen(entity: &Entity, config: &GameConfig) -> bool {
    let r = entity.rect();
    let v = entity.velocity;
    (v.x < 0.0 && r.right() < 0.0)
        || (v.x > 0.0 && r.x > config.screen_width)
        || (v.y < 0.0 && r.top() < 0.0)
        || (v.y > 0.0 && r.y > config.screen_height)
}

/// Kill every non-player entity that is off-screen, along with the rest of
/// its group.  Returns the entities that were pruned by their own position.
pub fn prune_offscreen(store: &mut EntityStore, config: &GameConfig) -> Vec<Entity> {
    let gone: Vec<Entity> = store
        .iter()
        .filter(|e| e.kind != EntityKind::Player && is_offscreen(e, config))
        .cloned()
        .collect();

    for entity in &gone {
        match entity.group {
            Some(group) => {
                store.kill_group(group);
            }
            None => {
                store.kill(entity.id);
            }
        }
    }
    gone
}

/// Uniform integer in `lo..=hi`; collapses to `lo` when the range is empty.
pub(crate) fn rand_between(rng: &mut dyn RngCore, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

pub(crate) fn roll(rng: &mut dyn RngCore, probability: f64) -> bool {
    probability > 0.0 && rng.gen_bool(probability.min(1.0))
}
