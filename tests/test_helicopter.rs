use arcade_loop::config::GameConfig;
use arcade_loop::entities::*;
use arcade_loop::games::helicopter::*;
use arcade_loop::games::{DeathCause, GameKind};
use arcade_loop::input::Action;
use arcade_loop::session::{GameEvent, GameSession, StepReport};
use arcade_loop::store::EntityStore;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Helicopter config with no random obstacles.
fn quiet_config() -> GameConfig {
    GameConfig {
        spawn_probability_per_tick: 0.0,
        ..GameConfig::helicopter()
    }
}

fn started(config: GameConfig) -> GameSession {
    let mut session = GameSession::initialize(GameKind::Helicopter, config, 42).unwrap();
    session.on_logical_input(Action::Start, true);
    step(&mut session);
    assert_eq!(session.state(), GameState::Running);
    session
}

fn step(session: &mut GameSession) -> StepReport {
    let dt = session.config().tick_interval_secs;
    session.step(dt).unwrap()
}

fn player(session: &GameSession) -> Entity {
    session.entities().first(EntityKind::Player).cloned().unwrap()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── Start position ────────────────────────────────────────────────────────────

#[test]
fn player_starts_centred() {
    let session = started(quiet_config());
    let p = player(&session);
    assert_eq!(p.position, Vec2::new(275.0, 185.0));
    assert_eq!(p.size, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT));
    assert_eq!(p.velocity, Vec2::ZERO);
}

// ── Physics ───────────────────────────────────────────────────────────────────

#[test]
fn gravity_accelerates_the_player_down() {
    let mut session = started(quiet_config());
    step(&mut session);
    let p = player(&session);
    assert!(approx(p.velocity.y, -0.05));
    assert!(approx(p.position.y, 184.95));

    step(&mut session);
    let p = player(&session);
    assert!(approx(p.velocity.y, -0.10));
    assert!(approx(p.position.y, 184.85));
}

#[test]
fn thrust_sets_upward_velocity() {
    let mut session = started(quiet_config());
    session.on_logical_input(Action::Thrust, true);
    step(&mut session);
    let p = player(&session);
    assert!(approx(p.velocity.y, 1.75));
    assert!(approx(p.position.y, 186.75));
}

#[test]
fn holding_thrust_does_not_repeat_it() {
    let mut session = started(quiet_config());
    session.on_logical_input(Action::Thrust, true);
    step(&mut session);
    step(&mut session);
    assert!(approx(player(&session).velocity.y, 1.70));
}

#[test]
fn player_x_never_changes() {
    let mut session = started(quiet_config());
    for i in 0..50 {
        if i % 10 == 0 {
            session.on_logical_input(Action::Thrust, true);
        }
        step(&mut session);
    }
    assert_eq!(player(&session).position.x, 275.0);
}

// ── Obstacle pairs ────────────────────────────────────────────────────────────

#[test]
fn spawn_pair_geometry() {
    let config = GameConfig::helicopter();
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let mut store = EntityStore::new();
        Helicopter::spawn_pair(&mut store, &config, &mut rng);

        let halves: Vec<&Entity> = store.for_each(EntityKind::Obstacle).collect();
        assert_eq!(halves.len(), 2);
        let (top, bottom) = (halves[0], halves[1]);

        assert_eq!(top.position.x, 600.0);
        assert_eq!(bottom.position.x, 600.0);
        assert_eq!(top.size.x, OBSTACLE_WIDTH);
        assert_eq!(top.rect().top(), 400.0);
        assert_eq!(bottom.position.y, 0.0);
        assert_eq!(top.velocity, Vec2::new(-2.0, 0.0));
        assert_eq!(bottom.velocity, top.velocity);
        assert_eq!(top.group, Some(top.id));
        assert_eq!(bottom.group, Some(top.id));

        let gap = 400.0 - top.size.y - bottom.size.y;
        assert!((150.0..=250.0).contains(&gap), "gap {gap}");
    }
}

#[test]
fn pair_spawns_and_moves_on_the_same_tick() {
    let config = GameConfig {
        spawn_probability_per_tick: 1.0,
        ..GameConfig::helicopter()
    };
    let mut session = started(config);
    step(&mut session);
    let xs: Vec<f32> = session
        .entities()
        .for_each(EntityKind::Obstacle)
        .map(|e| e.position.x)
        .collect();
    assert_eq!(xs, vec![598.0, 598.0]);
}

#[test]
fn obstacle_speed_comes_from_config() {
    let config = GameConfig {
        obstacle_speed: Some(5.0),
        ..GameConfig::helicopter()
    };
    let mut store = EntityStore::new();
    Helicopter::spawn_pair(&mut store, &config, &mut seeded_rng());
    assert!(store
        .for_each(EntityKind::Obstacle)
        .all(|e| e.velocity == Vec2::new(-5.0, 0.0)));
}

// ── Scoring and pruning ───────────────────────────────────────────────────────

#[test]
fn passing_an_obstacle_scores_and_prunes_it() {
    let config = GameConfig {
        gravity: Some(0.0),
        ..quiet_config()
    };
    let mut session = started(config);
    let id = session.entities_mut().spawn(
        Entity::new(EntityKind::Obstacle, Vec2::new(600.0, 0.0), Vec2::new(1.0, 1.0))
            .with_velocity(Vec2::new(-2.0, 0.0)),
    );

    for _ in 0..300 {
        step(&mut session);
    }
    assert_eq!(session.entities().get(id).map(|e| e.position.x), Some(0.0));
    assert_eq!(session.score(), 0);

    let report = step(&mut session);
    assert!(session.entities().get(id).is_none());
    assert!(report.entities.iter().all(|r| r.kind != EntityKind::Obstacle));
    assert_eq!(report.score, 1);
    assert_eq!(report.events, vec![GameEvent::Scored { points: 1 }]);

    let report = step(&mut session);
    assert!(report.entities.iter().all(|r| r.kind != EntityKind::Obstacle));
}

#[test]
fn a_pair_scores_once() {
    let config = GameConfig {
        gravity: Some(0.0),
        ..quiet_config()
    };
    let mut session = started(config);
    let mut rng = seeded_rng();
    Helicopter::spawn_pair(session.entities_mut(), &quiet_config(), &mut rng);

    // Park the player in the middle of the gap.
    let store = session.entities();
    let halves: Vec<&Entity> = store.for_each(EntityKind::Obstacle).collect();
    let gap_bottom = halves[1].rect().top();
    let gap_top = halves[0].position.y;
    let y = gap_bottom + (gap_top - gap_bottom - PLAYER_HEIGHT) / 2.0;
    if let Some(p) = session.entities_mut().first_mut(EntityKind::Player) {
        p.position.y = y;
    }

    let mut scores = Vec::new();
    for _ in 0..400 {
        let report = step(&mut session);
        assert_eq!(report.state, GameState::Running);
        scores.push(report.score);
    }
    assert_eq!(scores.last(), Some(&1));
    assert_eq!(
        scores.iter().filter(|&&s| s == 0).count(),
        315,
        "the pair is fully off screen after 316 ticks"
    );
    assert_eq!(session.entities().count(EntityKind::Obstacle), 0);
}

// ── Death ─────────────────────────────────────────────────────────────────────

#[test]
fn touching_an_obstacle_ends_the_round() {
    let mut session = started(quiet_config());
    session.entities_mut().spawn(
        Entity::new(EntityKind::Obstacle, Vec2::new(300.0, 150.0), Vec2::new(30.0, 100.0))
            .with_velocity(Vec2::new(-2.0, 0.0)),
    );
    let report = step(&mut session);
    assert_eq!(report.state, GameState::GameOver);
    assert_eq!(
        report.events,
        vec![GameEvent::GameOver {
            cause: DeathCause::Obstacle
        }]
    );
    assert!(report.entities.is_empty());
    assert!(session.entities().is_empty());
}

#[test]
fn edge_contact_with_an_obstacle_is_survivable() {
    let config = GameConfig {
        gravity: Some(0.0),
        ..quiet_config()
    };
    let mut session = started(config);
    // Stationary obstacle whose top edge meets the player's bottom edge.
    session.entities_mut().spawn(Entity::new(
        EntityKind::Obstacle,
        Vec2::new(275.0, 85.0),
        Vec2::new(30.0, 100.0),
    ));
    let report = step(&mut session);
    assert_eq!(report.state, GameState::Running);
}

#[test]
fn falling_off_the_screen_ends_the_round() {
    let mut session = started(quiet_config());
    let mut last = None;
    for _ in 0..200 {
        let report = step(&mut session);
        if report.state == GameState::GameOver {
            last = Some(report);
            break;
        }
    }
    let report = last.expect("player should have fallen off the screen");
    assert_eq!(
        report.events,
        vec![GameEvent::GameOver {
            cause: DeathCause::OutOfBounds
        }]
    );
}
