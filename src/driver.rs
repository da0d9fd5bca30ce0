//! Fixed-timestep loop driver.
//!
//! Measured wall-clock time only decides *how many* steps are due.  Every
//! step is handed the nominal interval, so host jitter never reaches the
//! simulation.

use std::time::Duration;

use rand::RngCore;
use tracing::warn;

use crate::error::CoreError;
use crate::session::{GameSession, StepReport};

/// Upper bound on catch-up steps after a long stall.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks: u32,
    /// Time that was owed but discarded because of the per-frame cap.
    pub dropped_backlog: Duration,
}

#[derive(Clone, Debug)]
pub struct FixedStep {
    dt: Duration,
    accumulator: Duration,
    max_ticks_per_frame: u32,
}

impl FixedStep {
    /// Fails unless the interval is a positive, representable duration.
    pub fn new(tick_interval_secs: f32) -> Result<Self, CoreError> {
        let dt = Duration::try_from_secs_f32(tick_interval_secs)
            .ok()
            .filter(|dt| !dt.is_zero())
            .ok_or(CoreError::InvalidStep {
                dt: tick_interval_secs,
            })?;
        Ok(Self {
            dt,
            accumulator: Duration::ZERO,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
        })
    }

    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    pub fn dt(&self) -> Duration {
        self.dt
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Add `elapsed` to the accumulator and take out as many whole ticks as
    /// the cap allows.  A backlog still owed after that is dropped.
    pub fn plan(&mut self, elapsed: Duration) -> StepPlan {
        let mut accumulator = self.accumulator.saturating_add(elapsed);
        let mut ticks = 0u32;

        while accumulator >= self.dt && ticks < self.max_ticks_per_frame {
            accumulator = accumulator.saturating_sub(self.dt);
            ticks += 1;
        }

        let dropped_backlog = if accumulator >= self.dt {
            std::mem::replace(&mut accumulator, Duration::ZERO)
        } else {
            Duration::ZERO
        };

        self.accumulator = accumulator;
        StepPlan {
            ticks,
            dropped_backlog,
        }
    }

    /// Time left until the next tick is due.
    pub fn until_next_tick(&self) -> Duration {
        self.dt.saturating_sub(self.accumulator)
    }
}

/// Steps a session at its configured cadence.  Holds timing state only.
#[derive(Clone, Debug)]
pub struct LoopDriver {
    clock: FixedStep,
    nominal_dt: f32,
}

impl LoopDriver {
    pub fn new(tick_interval_secs: f32) -> Result<Self, CoreError> {
        Ok(Self {
            clock: FixedStep::new(tick_interval_secs)?,
            nominal_dt: tick_interval_secs,
        })
    }

    pub fn for_session<R: RngCore>(session: &GameSession<R>) -> Result<Self, CoreError> {
        Self::new(session.config().tick_interval_secs)
    }

    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.clock = self.clock.with_max_ticks_per_frame(max);
        self
    }

    pub fn nominal_dt(&self) -> f32 {
        self.nominal_dt
    }

    pub fn until_next_tick(&self) -> Duration {
        self.clock.until_next_tick()
    }

    /// Account for `elapsed` wall-clock time and run every step that is due.
    /// Returns the report of the last step, or `None` if none was due.
    pub fn pump<R: RngCore>(
        &mut self,
        session: &mut GameSession<R>,
        elapsed: Duration,
    ) -> Result<Option<StepReport>, CoreError> {
        let plan = self.clock.plan(elapsed);
        if !plan.dropped_backlog.is_zero() {
            warn!(
                dropped_ms = plan.dropped_backlog.as_millis() as u64,
                "simulation fell behind; backlog dropped"
            );
        }

        let mut last = None;
        for _ in 0..plan.ticks {
            last = Some(session.step(self.nominal_dt)?);
        }
        Ok(last)
    }
}
