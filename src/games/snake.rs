//! Grid snake.  The head is the `Player` entity and carries the heading;
//! the body is a chain of `SnakeSegment`s in insertion order, each taking
//! the position its predecessor held one tick earlier.

use rand::RngCore;
use tracing::debug;

use crate::collision::{collides, same_cell};
use crate::config::GameConfig;
use crate::entities::{Direction, Entity, EntityKind, Vec2};
use crate::games::{rand_between, Contact, DeathCause, Game, Outcome};
use crate::input::InputLatch;
use crate::store::EntityStore;

/// Side of one grid cell; also the distance the head moves per tick.
pub const CELL: f32 = 20.0;
pub const START: Vec2 = Vec2::new(100.0, 100.0);
pub const START_DIRECTION: Direction = Direction::Right;

#[derive(Debug)]
pub struct Snake {
    direction: Direction,
    /// Where the tail was before this tick's move; a new segment goes here.
    vacated_tail: Option<Vec2>,
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Snake {
    pub fn new() -> Self {
        Self {
            direction: START_DIRECTION,
            vacated_tail: None,
        }
    }

    fn cell_size() -> Vec2 {
        Vec2::new(CELL, CELL)
    }

    pub fn head(position: Vec2) -> Entity {
        Entity::new(EntityKind::Player, position, Self::cell_size())
    }

    pub fn segment(position: Vec2) -> Entity {
        Entity::new(EntityKind::SnakeSegment, position, Self::cell_size())
    }

    /// Place food on a random grid cell.
    pub fn spawn_food(store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore) {
        let cols = ((config.screen_width - CELL) / CELL).floor() as i32;
        let rows = ((config.screen_height - CELL) / CELL).floor() as i32;
        let x = rand_between(rng, 0, cols.max(0)) as f32 * CELL;
        let y = rand_between(rng, 0, rows.max(0)) as f32 * CELL;
        let food = store.spawn(Entity::new(
            EntityKind::Food,
            Vec2::new(x, y),
            Self::cell_size(),
        ));
        debug!(%food, x, y, "food placed");
    }
}

impl Game for Snake {
    fn reset(&mut self, store: &mut EntityStore, _config: &GameConfig) {
        self.direction = START_DIRECTION;
        self.vacated_tail = None;
        store.spawn(Self::head(START));
    }

    fn apply_input(&mut self, _store: &mut EntityStore, input: &mut InputLatch, _config: &GameConfig) {
        // Reversal is judged against the heading the snake is actually moving in,
        // so two quick presses cannot turn it back onto itself.
        let moving = self.direction;
        for direction in input.take_directions() {
            if !direction.is_opposite(moving) {
                self.direction = direction;
            }
        }
    }

    fn integrate_player(&mut self, store: &mut EntityStore, _config: &GameConfig, _scale: f32) {
        let Some(head_id) = store.first(EntityKind::Player).map(|h| h.id) else {
            return;
        };
        let mut ids = vec![head_id];
        ids.extend(store.ids(EntityKind::SnakeSegment));
        let previous: Vec<Vec2> = ids
            .iter()
            .filter_map(|&id| store.get(id).map(|s| s.position))
            .collect();
        let Some(&head) = previous.first() else {
            return;
        };

        let new_head = head + self.direction.unit() * CELL;
        for (i, &id) in ids.iter().enumerate() {
            if let Some(segment) = store.get_mut(id) {
                segment.position = if i == 0 { new_head } else { previous[i - 1] };
            }
        }
        self.vacated_tail = previous.last().copied();
    }

    fn spawn(&mut self, store: &mut EntityStore, config: &GameConfig, rng: &mut dyn RngCore) {
        if store.count(EntityKind::Food) == 0 {
            Self::spawn_food(store, config, rng);
        }
    }

    fn detect(&self, store: &EntityStore, config: &GameConfig) -> Vec<Contact> {
        let Some(head) = store.first(EntityKind::Player) else {
            return Vec::new();
        };

        let p = head.position;
        if p.x < 0.0 || p.x >= config.screen_width || p.y < 0.0 || p.y >= config.screen_height {
            return vec![Contact::Fatal(DeathCause::Wall)];
        }
        if store
            .for_each(EntityKind::SnakeSegment)
            .any(|segment| same_cell(head, segment))
        {
            return vec![Contact::Fatal(DeathCause::SelfCollision)];
        }

        store
            .for_each(EntityKind::Food)
            .filter(|food| collides(head, food))
            .map(|food| Contact::Pickup { food: food.id })
            .collect()
    }

    fn resolve(
        &mut self,
        contacts: &[Contact],
        store: &mut EntityStore,
        config: &GameConfig,
        rng: &mut dyn RngCore,
    ) -> Outcome {
        let mut outcome = Outcome::default();
        for contact in contacts {
            match *contact {
                Contact::Fatal(cause) => {
                    outcome.death = Some(cause);
                    return outcome;
                }
                Contact::Pickup { food } => {
                    if !store.kill(food) {
                        continue;
                    }
                    if let Some(tail) = self.vacated_tail {
                        store.spawn(Self::segment(tail));
                    }
                    Self::spawn_food(store, config, rng);
                    outcome.scored += 1;
                }
                Contact::Hit { .. } => {}
            }
        }
        outcome
    }
}
