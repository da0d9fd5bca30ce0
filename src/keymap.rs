//! Raw terminal keys → logical actions.  The core never sees a `KeyCode`.

use crossterm::event::{KeyCode, KeyModifiers};

use arcade_loop::{Action, GameKind};

type KeyTable = &'static [(KeyCode, Action)];

const HELICOPTER: KeyTable = &[
    (KeyCode::Char(' '), Action::Start),
    (KeyCode::Up, Action::Thrust),
    (KeyCode::Char('w'), Action::Thrust),
];

const SNAKE: KeyTable = &[
    (KeyCode::Char(' '), Action::Start),
    (KeyCode::Up, Action::MoveUp),
    (KeyCode::Down, Action::MoveDown),
    (KeyCode::Left, Action::MoveLeft),
    (KeyCode::Right, Action::MoveRight),
    (KeyCode::Char('w'), Action::MoveUp),
    (KeyCode::Char('s'), Action::MoveDown),
    (KeyCode::Char('a'), Action::MoveLeft),
    (KeyCode::Char('d'), Action::MoveRight),
];

// Space both starts a round and fires; the session ignores whichever does
// not apply to the current state.
const SHOOTER: KeyTable = &[
    (KeyCode::Char(' '), Action::Start),
    (KeyCode::Char(' '), Action::Fire),
    (KeyCode::Left, Action::MoveLeft),
    (KeyCode::Right, Action::MoveRight),
    (KeyCode::Char('a'), Action::MoveLeft),
    (KeyCode::Char('d'), Action::MoveRight),
];

pub fn table(kind: GameKind) -> KeyTable {
    match kind {
        GameKind::Helicopter => HELICOPTER,
        GameKind::Snake => SNAKE,
        GameKind::Shooter => SHOOTER,
    }
}

/// Letters are matched case-insensitively.
pub fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

pub fn actions_for(kind: GameKind, code: KeyCode) -> impl Iterator<Item = Action> {
    let code = normalize(code);
    table(kind)
        .iter()
        .filter(move |(key, _)| *key == code)
        .map(|&(_, action)| action)
}

pub fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match normalize(code) {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// One-line controls hint for the bottom row.
pub fn hint(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Helicopter => "SPACE : Start   ↑ / W : Thrust   Q : Quit",
        GameKind::Snake => "SPACE : Start   ← ↑ → ↓ / WASD : Turn   Q : Quit",
        GameKind::Shooter => "← → / A D : Move   SPACE : Start / Shoot   Q : Quit",
    }
}
