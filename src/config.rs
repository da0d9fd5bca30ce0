//! Session configuration: screen size, tick rate, physics and spawn tuning.
//!
//! Each game has a preset tuned to its classic feel; a JSON document of
//! optional overrides can be layered on top.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::GameKind;

/// Longest accepted tick.  Anything slower is not a game loop.
pub const MAX_TICK_INTERVAL_SECS: f32 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Nominal seconds per simulation step.
    pub tick_interval_secs: f32,
    /// Downward acceleration, units per tick².
    pub gravity: Option<f32>,
    /// Upward speed set by a thrust, units per tick.
    pub thrust_velocity: Option<f32>,
    /// Speed of obstacles / enemies, units per tick.
    pub obstacle_speed: Option<f32>,
    pub spawn_probability_per_tick: f64,
}

impl GameConfig {
    pub fn helicopter() -> Self {
        Self {
            screen_width: 600.0,
            screen_height: 400.0,
            tick_interval_secs: 1.0 / 60.0,
            gravity: Some(0.05),
            thrust_velocity: Some(1.8),
            obstacle_speed: Some(2.0),
            spawn_probability_per_tick: 0.02,
        }
    }

    pub fn snake() -> Self {
        Self {
            screen_width: 640.0,
            screen_height: 480.0,
            tick_interval_secs: 1.0 / 10.0,
            gravity: None,
            thrust_velocity: None,
            obstacle_speed: None,
            spawn_probability_per_tick: 0.0,
        }
    }

    pub fn shooter() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            tick_interval_secs: 1.0 / 60.0,
            gravity: None,
            thrust_velocity: None,
            obstacle_speed: Some(2.0),
            // One top-up roll per second on average.
            spawn_probability_per_tick: 1.0 / 60.0,
        }
    }

    pub fn preset(kind: GameKind) -> Self {
        match kind {
            GameKind::Helicopter => Self::helicopter(),
            GameKind::Snake => Self::snake(),
            GameKind::Shooter => Self::shooter(),
        }
    }

    /// Preset for `kind` with the overrides in the JSON file at `path`.
    pub fn load(kind: GameKind, path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides = ConfigOverrides::from_json(&text)?;
        let config = overrides.apply(Self::preset(kind));
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.screen_width) || !positive(self.screen_height) {
            return Err(ConfigError::NonPositiveScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if !positive(self.tick_interval_secs) {
            return Err(ConfigError::NonPositiveTickInterval(self.tick_interval_secs));
        }
        if self.tick_interval_secs > MAX_TICK_INTERVAL_SECS {
            return Err(ConfigError::TickIntervalTooLong {
                secs: self.tick_interval_secs,
                max: MAX_TICK_INTERVAL_SECS,
            });
        }
        if !(0.0..=1.0).contains(&self.spawn_probability_per_tick) {
            return Err(ConfigError::SpawnProbabilityOutOfRange(
                self.spawn_probability_per_tick,
            ));
        }

        let physics = [
            ("gravity", self.gravity),
            ("thrust_velocity", self.thrust_velocity),
            ("obstacle_speed", self.obstacle_speed),
        ];
        for (field, value) in physics {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidPhysics { field, value });
                }
            }
        }
        Ok(())
    }

    pub fn gravity_or(&self, default: f32) -> f32 {
        self.gravity.unwrap_or(default)
    }

    pub fn thrust_or(&self, default: f32) -> f32 {
        self.thrust_velocity.unwrap_or(default)
    }

    pub fn obstacle_speed_or(&self, default: f32) -> f32 {
        self.obstacle_speed.unwrap_or(default)
    }
}

/// Every field optional; unset fields keep the preset's value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub screen_width: Option<f32>,
    pub screen_height: Option<f32>,
    pub tick_interval_secs: Option<f32>,
    pub gravity: Option<f32>,
    pub thrust_velocity: Option<f32>,
    pub obstacle_speed: Option<f32>,
    pub spawn_probability_per_tick: Option<f64>,
}

impl ConfigOverrides {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn apply(&self, base: GameConfig) -> GameConfig {
        GameConfig {
            screen_width: self.screen_width.unwrap_or(base.screen_width),
            screen_height: self.screen_height.unwrap_or(base.screen_height),
            tick_interval_secs: self.tick_interval_secs.unwrap_or(base.tick_interval_secs),
            gravity: self.gravity.or(base.gravity),
            thrust_velocity: self.thrust_velocity.or(base.thrust_velocity),
            obstacle_speed: self.obstacle_speed.or(base.obstacle_speed),
            spawn_probability_per_tick: self
                .spawn_probability_per_tick
                .unwrap_or(base.spawn_probability_per_tick),
        }
    }
}
