//! Game session: owns the entity store, input latch and rng for one game and
//! runs the state machine `NotStarted → Running → GameOver → Running → …`.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{GameState, Renderable};
use crate::error::CoreError;
use crate::games::{DeathCause, Game, GameKind};
use crate::input::{Action, InputLatch};
use crate::store::EntityStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A round began (first start or restart).
    Started { round: u32 },
    Scored { points: u32 },
    GameOver { cause: DeathCause },
}

/// What one call to [`GameSession::step`] hands back for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepReport {
    pub tick: u64,
    pub state: GameState,
    pub score: u32,
    pub events: Vec<GameEvent>,
    pub entities: Vec<Renderable>,
}

pub struct GameSession<R = StdRng> {
    kind: GameKind,
    config: GameConfig,
    rules: Box<dyn Game>,
    store: EntityStore,
    input: InputLatch,
    rng: R,
    state: GameState,
    score: u32,
    tick: u64,
    round: u32,
}

impl GameSession<StdRng> {
    /// Validate `config` and build a session whose randomness is fully
    /// determined by `seed`.
    pub fn initialize(kind: GameKind, config: GameConfig, seed: u64) -> Result<Self, CoreError> {
        Self::with_rng(kind, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> GameSession<R> {
    pub fn with_rng(kind: GameKind, config: GameConfig, rng: R) -> Result<Self, CoreError> {
        config.validate()?;

        let mut session = Self {
            kind,
            config,
            rules: kind.rules(),
            store: EntityStore::new(),
            input: InputLatch::new(),
            rng,
            state: GameState::NotStarted,
            score: 0,
            tick: 0,
            round: 0,
        };
        session.rules.reset(&mut session.store, &session.config);
        info!(game = %kind, "session initialized");
        Ok(session)
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of steps taken since the session was created.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn entities(&self) -> &EntityStore {
        &self.store
    }

    /// Direct store access for scripted setups.
    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Latch one logical input; it takes effect on the next step.
    pub fn on_logical_input(&mut self, action: Action, pressed: bool) {
        self.input.on_input(action, pressed);
    }

    /// Drop every held flag and pending edge, e.g. when the front end stops
    /// receiving key events.
    pub fn release_inputs(&mut self) {
        self.input.release_all();
    }

    pub fn renderable_entities(&self) -> Vec<Renderable> {
        self.store.snapshot()
    }

    /// Advance by one tick of `dt` seconds.  Velocities are per nominal tick,
    /// so they are scaled by `dt / tick_interval_secs`; the loop driver always
    /// passes the nominal interval, making the scale exactly one.
    pub fn step(&mut self, dt: f32) -> Result<StepReport, CoreError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CoreError::InvalidStep { dt });
        }
        let scale = dt / self.config.tick_interval_secs;

        self.store.sweep();
        let mut events = Vec::new();

        match self.state {
            GameState::NotStarted | GameState::GameOver => {
                if self.input.take(Action::Start) {
                    self.start_round();
                    events.push(GameEvent::Started { round: self.round });
                }
            }
            GameState::Running => self.run_phases(scale, &mut events),
        }

        // Edges not consumed this tick are gone; only held flags carry over.
        self.input.discard_pending();
        self.store.sweep();
        self.tick += 1;

        Ok(StepReport {
            tick: self.tick,
            state: self.state,
            score: self.score,
            events,
            entities: self.store.snapshot(),
        })
    }

    fn start_round(&mut self) {
        self.store.clear();
        self.score = 0;
        self.round += 1;
        self.rules.reset(&mut self.store, &self.config);
        self.state = GameState::Running;
        info!(game = %self.kind, round = self.round, tick = self.tick, "round started");
    }

    fn run_phases(&mut self, scale: f32, events: &mut Vec<GameEvent>) {
        // Start while running is a no-op.
        self.input.take(Action::Start);

        let rules = self.rules.as_mut();
        let store = &mut self.store;
        let config = &self.config;

        // ── 1. Input → velocity ──────────────────────────────────────────────
        rules.apply_input(store, &mut self.input, config);
        // ── 2. Player ────────────────────────────────────────────────────────
        rules.integrate_player(store, config, scale);
        // ── 3. Spawning ──────────────────────────────────────────────────────
        rules.spawn(store, config, &mut self.rng);
        // ── 4. Everything else moves ─────────────────────────────────────────
        rules.advance(store, scale);
        // ── 5. Off-screen pruning ────────────────────────────────────────────
        let mut points = rules.prune(store, config);
        // ── 6. Collision checks ──────────────────────────────────────────────
        let contacts = rules.detect(store, config);
        // ── 7. Consequences ──────────────────────────────────────────────────
        let outcome = rules.resolve(&contacts, store, config, &mut self.rng);

        points += outcome.scored;
        if points > 0 {
            self.score += points;
            events.push(GameEvent::Scored { points });
            debug!(points, score = self.score, "scored");
        }

        if let Some(cause) = outcome.death {
            self.store.clear();
            self.state = GameState::GameOver;
            events.push(GameEvent::GameOver { cause });
            info!(
                game = %self.kind,
                round = self.round,
                tick = self.tick,
                score = self.score,
                ?cause,
                "game over"
            );
        }
    }
}
