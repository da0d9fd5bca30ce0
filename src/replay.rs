//! Scripted input replay.
//!
//! A script is a list of logical inputs stamped with the step index they
//! arrive before.  Replaying the same script against the same seed yields the
//! same reports, step for step.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::input::Action;
use crate::session::{GameSession, StepReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Index of the step this input is latched before (0 = before the first step).
    pub tick: u64,
    pub action: Action,
    #[serde(default = "pressed_by_default")]
    pub pressed: bool,
}

fn pressed_by_default() -> bool {
    true
}

impl ScriptedInput {
    pub fn press(tick: u64, action: Action) -> Self {
        Self {
            tick,
            action,
            pressed: true,
        }
    }

    pub fn release(tick: u64, action: Action) -> Self {
        Self {
            tick,
            action,
            pressed: false,
        }
    }
}

pub fn parse_script(text: &str) -> serde_json::Result<Vec<ScriptedInput>> {
    serde_json::from_str(text)
}

/// Run `steps` nominal steps, feeding `inputs` as their ticks come up and
/// handing each report to `on_report` as soon as it exists.  Inputs are
/// applied in script order; the slice does not need to be sorted.  The first
/// error from either the session or the callback stops the run.
pub fn replay<R, E, F>(
    session: &mut GameSession<R>,
    inputs: &[ScriptedInput],
    steps: u64,
    mut on_report: F,
) -> Result<(), E>
where
    R: RngCore,
    E: From<CoreError>,
    F: FnMut(StepReport) -> Result<(), E>,
{
    let dt = session.config().tick_interval_secs;
    for index in 0..steps {
        for input in inputs.iter().filter(|i| i.tick == index) {
            session.on_logical_input(input.action, input.pressed);
        }
        on_report(session.step(dt)?)?;
    }
    Ok(())
}

/// [`replay`] collected into a vector.  Keeps every report, so meant for
/// short runs.
pub fn run_script<R: RngCore>(
    session: &mut GameSession<R>,
    inputs: &[ScriptedInput],
    steps: u64,
) -> Result<Vec<StepReport>, CoreError> {
    let mut reports = Vec::new();
    replay(session, inputs, steps, |report| {
        reports.push(report);
        Ok::<_, CoreError>(())
    })?;
    Ok(reports)
}
