//! Vertical shooter: a ship at the bottom fires up at enemies falling from
//! the top.

use std::collections::HashSet;

use rand::RngCore;
use tracing::debug;

use crate::collision::collides;
use crate::config::GameConfig;
use crate::entities::{Entity, EntityKind, Vec2};
use crate::games::{prune_offscreen, rand_between, roll, Contact, DeathCause, Game, Outcome};
use crate::input::{Action, InputLatch};
use crate::store::EntityStore;

pub const SHIP_SIZE: Vec2 = Vec2::new(64.0, 64.0);
pub const ENEMY_SIZE: Vec2 = Vec2::new(40.0, 40.0);
pub const BULLET_SIZE: Vec2 = Vec2::new(5.0, 10.0);

const SHIP_SPEED: f32 = 5.0;
const BULLET_SPEED: f32 = 10.0;
const DEFAULT_ENEMY_SPEED: f32 = 2.0;

/// Enemies dropped on the first simulated tick of a round.
pub const INITIAL_WAVE: usize = 10;
/// A top-up never grows the field beyond this.
pub const MAX_ENEMIES: usize = 15;

#[derive(Debug, Default)]
pub struct Shooter {
    wave_spawned: bool,
}

impl Shooter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_position(config: &GameConfig) -> Vec2 {
        Vec2::new(config.screen_width / 2.0 - SHIP_SIZE.x / 2.0, 0.0)
    }

    fn spawn_enemy(store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore) {
        let max_x = (config.screen_width - ENEMY_SIZE.x) as i32;
        let x = rand_between(rng, 0, max_x.max(0)) as f32;
        let speed = config.obstacle_speed_or(DEFAULT_ENEMY_SPEED);
        store.spawn(
            Entity::new(
                EntityKind::Enemy,
                Vec2::new(x, config.screen_height),
                ENEMY_SIZE,
            )
            .with_velocity(Vec2::new(0.0, -speed)),
        );
    }

    fn fill_to(store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore, target: usize) {
        let mut spawned = 0;
        while store.count(EntityKind::Enemy) < target {
            Self::spawn_enemy(store, config, rng);
            spawned += 1;
        }
        if spawned > 0 {
            debug!(spawned, target, "enemies spawned");
        }
    }
}

impl Game for Shooter {
    fn reset(&mut self, store: &mut EntityStore, config: &GameConfig) {
        self.wave_spawned = false;
        store.spawn(Entity::new(
            EntityKind::Player,
            Self::start_position(config),
            SHIP_SIZE,
        ));
    }

    fn apply_input(&mut self, store: &mut EntityStore, input: &mut InputLatch, _config: &GameConfig) {
        let left = input.is_held(Action::MoveLeft);
        let right = input.is_held(Action::MoveRight);
        let fire = input.take(Action::Fire);

        let Some(ship) = store.first_mut(EntityKind::Player) else {
            return;
        };
        ship.velocity.x = match (left, right) {
            (true, false) => -SHIP_SPEED,
            (false, true) => SHIP_SPEED,
            _ => 0.0,
        };

        if fire {
            let rect = ship.rect();
            let origin = Vec2::new(rect.x + rect.w / 2.0 - BULLET_SIZE.x / 2.0, rect.top());
            store.spawn(
                Entity::new(EntityKind::Bullet, origin, BULLET_SIZE)
                    .with_velocity(Vec2::new(0.0, BULLET_SPEED)),
            );
        }
    }

    fn integrate_player(&mut self, store: &mut EntityStore, config: &GameConfig, scale: f32) {
        if let Some(ship) = store.first_mut(EntityKind::Player) {
            let max_x = (config.screen_width - ship.size.x).max(0.0);
            ship.position.x = (ship.position.x + ship.velocity.x * scale).clamp(0.0, max_x);
        }
    }

    fn spawn(&mut self, store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore) {
        if !self.wave_spawned {
            self.wave_spawned = true;
            Self::fill_to(store, config, rng, INITIAL_WAVE);
        } else if roll(rng, config.spawn_probability_per_tick) {
            Self::fill_to(store, config, rng, MAX_ENEMIES);
        }
    }

    /// Enemies are gone once their bottom edge drops below the floor, well
    /// before they have fully left the screen.  Bullets use the usual bound.
    fn prune(&mut self, store: &mut EntityStore, config: &GameConfig) -> u32 {
        let sunk: Vec<_> = store
            .for_each(EntityKind::Enemy)
            .filter(|enemy| enemy.position.y < 0.0)
            .map(|enemy| enemy.id)
            .collect();
        for id in sunk {
            store.kill(id);
        }
        prune_offscreen(store, config);
        0
    }

    fn detect(&self, store: &EntityStore, _config: &GameConfig) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let mut hit_enemies = HashSet::new();

        for bullet in store.for_each(EntityKind::Bullet) {
            let target = store
                .for_each(EntityKind::Enemy)
                .find(|enemy| !hit_enemies.contains(&enemy.id) && collides(bullet, enemy));
            if let Some(enemy) = target {
                hit_enemies.insert(enemy.id);
                contacts.push(Contact::Hit {
                    bullet: bullet.id,
                    enemy: enemy.id,
                });
            }
        }

        if let Some(ship) = store.first(EntityKind::Player) {
            let rammed = store
                .for_each(EntityKind::Enemy)
                .any(|enemy| !hit_enemies.contains(&enemy.id) && collides(enemy, ship));
            if rammed {
                contacts.push(Contact::Fatal(DeathCause::Enemy));
            }
        }
        contacts
    }

    fn resolve(
        &mut self,
        contacts: &[Contact],
        store: &mut EntityStore,
        _config: &GameConfig,
        _rng: &mut dyn RngCore,
    ) -> Outcome {
        let mut outcome = Outcome::default();
        for contact in contacts {
            match *contact {
                Contact::Hit { bullet, enemy } => {
                    if store.kill(bullet) && store.kill(enemy) {
                        outcome.scored += 1;
                    }
                }
                Contact::Fatal(cause) => outcome.death = Some(cause),
                Contact::Pickup { .. } => {}
            }
        }
        outcome
    }
}
