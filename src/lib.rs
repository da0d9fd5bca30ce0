//! Headless core for three small arcade games: a helicopter side-scroller,
//! a grid snake and a vertical shooter.
//!
//! The simulation is a fixed-timestep state machine over plain entity data.
//! Drawing, windowing and raw keyboard handling belong to the caller (see the
//! `arcade_loop` binary for a terminal front end).

pub mod collision;
pub mod config;
pub mod driver;
pub mod entities;
pub mod error;
pub mod games;
pub mod input;
pub mod replay;
pub mod session;
pub mod store;

pub use config::{ConfigOverrides, GameConfig};
pub use driver::{FixedStep, LoopDriver, StepPlan};
pub use entities::{Direction, Entity, EntityId, EntityKind, GameState, Rect, Renderable, Vec2};
pub use error::{ConfigError, CoreError};
pub use games::GameKind;
pub use input::{Action, InputLatch};
pub use session::{GameEvent, GameSession, StepReport};
pub use store::EntityStore;
