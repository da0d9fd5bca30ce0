//! Side-scrolling helicopter: thrust against gravity, dodge obstacle pairs.

use std::collections::BTreeSet;

use rand::RngCore;
use tracing::debug;

use crate::collision::collides;
use crate::config::GameConfig;
use crate::entities::{Entity, EntityKind, Vec2};
use crate::games::{
    prune_offscreen, rand_between, roll, Contact, DeathCause, Game, Outcome,
};
use crate::input::{Action, InputLatch};
use crate::store::EntityStore;

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const OBSTACLE_WIDTH: f32 = 30.0;

const DEFAULT_GRAVITY: f32 = 0.05;
const DEFAULT_THRUST: f32 = 1.8;
const DEFAULT_OBSTACLE_SPEED: f32 = 2.0;
/// The vertical gap of a pair is at least this many player heights.
const GAP_IN_PLAYER_HEIGHTS: f32 = 5.0;

#[derive(Debug, Default)]
pub struct Helicopter;

impl Helicopter {
    pub fn new() -> Self {
        Self
    }

    pub fn start_position(config: &GameConfig) -> Vec2 {
        Vec2::new(
            config.screen_width / 2.0 - PLAYER_WIDTH / 2.0,
            config.screen_height / 2.0 - PLAYER_HEIGHT / 2.0,
        )
    }

    /// Spawn a top/bottom obstacle pair at the right edge of the screen.
    pub fn spawn_pair(store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore) {
        let height = config.screen_height as i32;
        let width = OBSTACLE_WIDTH as i32;
        let min_gap = (PLAYER_HEIGHT * GAP_IN_PLAYER_HEIGHTS) as i32;

        let gap = rand_between(rng, min_gap, height - min_gap);
        let max_height = (height - gap).max(0);
        let min_height = rand_between(rng, width, max_height - width * 2).max(0);
        let top_height = rand_between(rng, min_height, max_height - width).min(max_height);
        let bottom_height = (max_height - top_height).max(0);

        let velocity = Vec2::new(-config.obstacle_speed_or(DEFAULT_OBSTACLE_SPEED), 0.0);
        let x = config.screen_width;

        let top = store.spawn(
            Entity::new(
                EntityKind::Obstacle,
                Vec2::new(x, (height - top_height) as f32),
                Vec2::new(OBSTACLE_WIDTH, top_height as f32),
            )
            .with_velocity(velocity),
        );
        if let Some(entity) = store.get_mut(top) {
            entity.group = Some(top);
        }
        store.spawn(
            Entity::new(
                EntityKind::Obstacle,
                Vec2::new(x, 0.0),
                Vec2::new(OBSTACLE_WIDTH, bottom_height as f32),
            )
            .with_velocity(velocity)
            .with_group(top),
        );
        debug!(pair = %top, gap, top_height, bottom_height, "obstacle pair spawned");
    }
}

impl Game for Helicopter {
    fn reset(&mut self, store: &mut EntityStore, config: &GameConfig) {
        store.spawn(Entity::new(
            EntityKind::Player,
            Self::start_position(config),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        ));
    }

    fn apply_input(&mut self, store: &mut EntityStore, input: &mut InputLatch, config: &GameConfig) {
        if input.take(Action::Thrust) {
            if let Some(player) = store.first_mut(EntityKind::Player) {
                player.velocity.y = config.thrust_or(DEFAULT_THRUST);
            }
        }
    }

    fn integrate_player(&mut self, store: &mut EntityStore, config: &GameConfig, scale: f32) {
        let gravity = config.gravity_or(DEFAULT_GRAVITY);
        if let Some(player) = store.first_mut(EntityKind::Player) {
            player.velocity.y -= gravity * scale;
            player.position += player.velocity * scale;
        }
    }

    fn spawn(&mut self, store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore) {
        if roll(rng, config.spawn_probability_per_tick) {
            Self::spawn_pair(store, config, rng);
        }
    }

    /// One point per pair that scrolled past.
    fn prune(&mut self, store: &mut EntityStore, config: &GameConfig) -> u32 {
        let passed: BTreeSet<_> = prune_offscreen(store, config)
            .into_iter()
            .filter(|e| e.kind == EntityKind::Obstacle)
            .map(|e| e.group.unwrap_or(e.id))
            .collect();
        passed.len() as u32
    }

    fn detect(&self, store: &EntityStore, config: &GameConfig) -> Vec<Contact> {
        let Some(player) = store.first(EntityKind::Player) else {
            return Vec::new();
        };

        let mut contacts = Vec::new();
        if store
            .for_each(EntityKind::Obstacle)
            .any(|obstacle| collides(player, obstacle))
        {
            contacts.push(Contact::Fatal(DeathCause::Obstacle));
        }

        let rect = player.rect();
        if rect.y < 0.0 || rect.top() > config.screen_height {
            contacts.push(Contact::Fatal(DeathCause::OutOfBounds));
        }
        contacts
    }

    fn resolve(
        &mut self,
        contacts: &[Contact],
        _store: &mut EntityStore,
        _config: &GameConfig,
        _rng: &mut dyn RngCore,
    ) -> Outcome {
        let death = contacts.iter().find_map(|c| match c {
            Contact::Fatal(cause) => Some(*cause),
            _ => None,
        });
        Outcome { scored: 0, death }
    }
}
