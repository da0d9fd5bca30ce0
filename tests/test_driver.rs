use std::time::Duration;

use arcade_loop::config::GameConfig;
use arcade_loop::driver::*;
use arcade_loop::error::CoreError;
use arcade_loop::games::GameKind;
use arcade_loop::input::Action;
use arcade_loop::session::GameSession;

fn helicopter_session(seed: u64) -> GameSession {
    GameSession::initialize(GameKind::Helicopter, GameConfig::helicopter(), seed).unwrap()
}

// ── FixedStep::plan ───────────────────────────────────────────────────────────

#[test]
fn whole_ticks_are_planned() {
    let mut clock = FixedStep::new(1.0 / 60.0).unwrap();
    let dt = clock.dt();
    let plan = clock.plan(dt * 3);
    assert_eq!(plan.ticks, 3);
    assert_eq!(plan.dropped_backlog, Duration::ZERO);
    assert_eq!(clock.accumulated(), Duration::ZERO);
}

#[test]
fn short_frames_accumulate() {
    let mut clock = FixedStep::new(0.1).unwrap();
    let dt = clock.dt();
    assert_eq!(clock.plan(dt * 3 / 4).ticks, 0);
    assert_eq!(clock.plan(dt * 3 / 4).ticks, 1);
    assert!(clock.accumulated() < dt);
    assert!(clock.accumulated() > Duration::ZERO);
}

#[test]
fn zero_elapsed_plans_nothing() {
    let mut clock = FixedStep::new(1.0 / 60.0).unwrap();
    assert_eq!(clock.plan(Duration::ZERO).ticks, 0);
}

#[test]
fn catch_up_is_capped_and_backlog_dropped() {
    let mut clock = FixedStep::new(1.0 / 60.0).unwrap().with_max_ticks_per_frame(4);
    let dt = clock.dt();
    let plan = clock.plan(dt * 10);
    assert_eq!(plan.ticks, 4);
    assert_eq!(plan.dropped_backlog, dt * 6);
    assert_eq!(clock.accumulated(), Duration::ZERO);
}

#[test]
fn partial_tick_survives_the_cap() {
    let mut clock = FixedStep::new(1.0 / 60.0).unwrap().with_max_ticks_per_frame(4);
    let dt = clock.dt();
    let plan = clock.plan(dt * 4 + dt / 2);
    assert_eq!(plan.ticks, 4);
    assert_eq!(plan.dropped_backlog, Duration::ZERO);
    assert_eq!(clock.accumulated(), dt / 2);
}

#[test]
fn cap_is_at_least_one() {
    let mut clock = FixedStep::new(1.0 / 60.0).unwrap().with_max_ticks_per_frame(0);
    let dt = clock.dt();
    assert_eq!(clock.plan(dt * 2).ticks, 1);
}

#[test]
fn until_next_tick_counts_down() {
    let mut clock = FixedStep::new(0.1).unwrap();
    let dt = clock.dt();
    assert_eq!(clock.until_next_tick(), dt);
    clock.plan(dt / 4);
    assert_eq!(clock.until_next_tick(), dt - dt / 4);
}

#[test]
fn unrepresentable_intervals_are_rejected() {
    for secs in [0.0, -0.1, f32::NAN, f32::INFINITY, 1e20] {
        assert!(
            matches!(FixedStep::new(secs), Err(CoreError::InvalidStep { .. })),
            "{secs}"
        );
    }
    assert!(LoopDriver::new(1e20).is_err());
}

// ── LoopDriver::pump ──────────────────────────────────────────────────────────

#[test]
fn driver_uses_the_session_interval() {
    let session = GameSession::initialize(GameKind::Snake, GameConfig::snake(), 1).unwrap();
    let driver = LoopDriver::for_session(&session).unwrap();
    assert_eq!(driver.nominal_dt(), 0.1);
}

#[test]
fn pump_runs_due_steps() {
    let mut session = helicopter_session(1);
    let mut driver = LoopDriver::for_session(&session).unwrap();
    let dt = Duration::from_secs_f32(driver.nominal_dt());

    assert!(driver.pump(&mut session, Duration::ZERO).unwrap().is_none());
    let report = driver.pump(&mut session, dt * 3).unwrap().unwrap();
    assert_eq!(report.tick, 3);
    assert_eq!(session.tick(), 3);
}

#[test]
fn pump_respects_the_cap() {
    let mut session = helicopter_session(1);
    let mut driver = LoopDriver::for_session(&session).unwrap().with_max_ticks_per_frame(2);
    let dt = Duration::from_secs_f32(driver.nominal_dt());
    driver.pump(&mut session, dt * 50).unwrap();
    assert_eq!(session.tick(), 2);
}

#[test]
fn frame_jitter_does_not_change_the_simulation() {
    let mut driven = helicopter_session(77);
    let mut stepped = helicopter_session(77);
    driven.on_logical_input(Action::Start, true);
    stepped.on_logical_input(Action::Start, true);

    let mut driver = LoopDriver::for_session(&driven).unwrap();
    let dt = Duration::from_secs_f32(driver.nominal_dt());
    let frames = [dt * 3 / 4, dt * 5 / 4, dt / 3, dt * 2, dt, dt * 7 / 3];
    for frame in frames.iter().cycle().take(120) {
        driver.pump(&mut driven, *frame).unwrap();
    }

    let nominal = stepped.config().tick_interval_secs;
    for _ in 0..driven.tick() {
        stepped.step(nominal).unwrap();
    }
    assert!(driven.tick() > 100);
    assert_eq!(driven.state(), stepped.state());
    assert_eq!(driven.renderable_entities(), stepped.renderable_entities());
}
